//! Profile commands.

use crate::error::CliResult;
use crate::profile::ProfileStore;

/// List exported event ids, oldest first.
pub fn show(profile: &ProfileStore) -> CliResult<()> {
    if profile.is_empty() {
        println!("No exported events recorded.");
        return Ok(());
    }
    for id in profile.ids() {
        println!("{}", id);
    }
    println!();
    println!("{} exported event(s) in {}", profile.len(), profile.path().display());
    Ok(())
}

/// Forget all exported event ids.
pub fn clear(profile: &mut ProfileStore) -> CliResult<()> {
    let count = profile.len();
    profile.clear();
    profile.save()?;
    println!("Removed {} exported event id(s).", count);
    Ok(())
}

/// Show the profile file path.
pub fn path(profile: &ProfileStore) -> CliResult<()> {
    println!("profile: {}", profile.path().display());
    Ok(())
}
