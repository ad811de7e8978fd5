//! Text normalization for the legacy device.
//!
//! The target phone renders only a small ASCII subset in event titles. This
//! module transliterates the common European letters to ASCII and strips
//! everything else the device cannot display.

/// Transliteration table applied before filtering.
///
/// German umlauts and the sharp s become digraphs, other accented letters
/// fall back to their base letter. Case follows the source letter.
const TRANSLITERATIONS: &[(char, &str)] = &[
    ('ä', "ae"),
    ('ö', "oe"),
    ('ü', "ue"),
    ('Ä', "Ae"),
    ('Ö', "Oe"),
    ('Ü', "Ue"),
    ('ß', "ss"),
    ('à', "a"),
    ('á', "a"),
    ('â', "a"),
    ('À', "A"),
    ('Á', "A"),
    ('Â', "A"),
    ('ç', "c"),
    ('Ç', "C"),
    ('è', "e"),
    ('é', "e"),
    ('ê', "e"),
    ('ë', "e"),
    ('È', "E"),
    ('É', "E"),
    ('Ê', "E"),
    ('Ë', "E"),
    ('î', "i"),
    ('ï', "i"),
    ('Î', "I"),
    ('Ï', "I"),
    ('ñ', "n"),
    ('Ñ', "N"),
    ('ô', "o"),
    ('Ô', "O"),
    ('ù', "u"),
    ('û', "u"),
    ('Ù', "U"),
    ('Û', "U"),
];

/// Punctuation kept verbatim in addition to letters, digits and whitespace.
const ALLOWED_PUNCTUATION: &[char] = &['.', '!', '?', '-', ':', '(', ')', ',', '/'];

/// Returns the ASCII replacement for a transliterated character, if any.
fn transliterate(c: char) -> Option<&'static str> {
    TRANSLITERATIONS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

/// Returns true if the device can display this character as-is.
pub fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(&c)
}

/// Normalizes text for the legacy device.
///
/// 1. Transliterates accented letters (`ü` -> `ue`, `é` -> `e`, ...).
/// 2. Removes every character outside the allow-list: ASCII letters,
///    digits, whitespace and `. ! ? - : ( ) , /`.
/// 3. Trims leading and trailing whitespace.
///
/// Never fails; any input yields some (possibly empty) output.
///
/// # Example
///
/// ```
/// use coca_core::normalize::normalize_text;
///
/// assert_eq!(normalize_text("  Grüße aus München!  "), "Gruesse aus Muenchen!");
/// ```
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if let Some(replacement) = transliterate(c) {
            out.push_str(replacement);
        } else if is_allowed(c) {
            out.push(c);
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn umlauts_become_digraphs() {
        assert_eq!(normalize_text("Äpfel über Öl"), "Aepfel ueber Oel");
        assert_eq!(normalize_text("Straße"), "Strasse");
    }

    #[test]
    fn accents_fall_back_to_base_letter() {
        assert_eq!(normalize_text("Déjà vu: Lunch!"), "Deja vu: Lunch!");
        assert_eq!(normalize_text("Façade Señor"), "Facade Senor");
    }

    #[test]
    fn strips_disallowed_characters() {
        assert_eq!(normalize_text("Call @ 5pm #sync"), "Call  5pm sync");
        assert_eq!(normalize_text("a_b;c=d\"e'"), "abcde");
        assert_eq!(normalize_text("Meet 🎉 now"), "Meet  now");
    }

    #[test]
    fn keeps_allowed_punctuation() {
        let text = "Q3 review: (draft) 1/2, done? yes! - ok.";
        assert_eq!(normalize_text(text), text);
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(normalize_text("   padded\t"), "padded");
        assert_eq!(normalize_text("  @@  "), "");
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn output_is_always_allowed() {
        let inputs = ["Ünïcödé ✓ — test", "tab\there", "x\u{00A0}y", "日本語"];
        for input in inputs {
            let out = normalize_text(input);
            assert!(out.chars().all(is_allowed), "unexpected char in {out:?}");
        }
    }
}
