//! Representative-name normalization
//!
//! Produces the join key used to match names typed differently across
//! exports ("ŞAHİN Kalyuncu" and "sahin kalyoncu" map to the same key).

/// Misspellings fixed after folding: (wrong, right)
const KNOWN_TYPOS: &[(&str, &str)] = &[("kalyuncu", "kalyoncu")];

/// Combining dot above, left behind when 'İ' is lowercased
const COMBINING_DOT_ABOVE: char = '\u{0307}';

/// Normalize a representative name into a case/diacritic-folded key.
///
/// Total: blank input yields an empty string. Idempotent.
pub fn normalize(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .chars()
        .filter(|c| *c != COMBINING_DOT_ABOVE)
        .map(fold_char)
        .collect();

    let mut key = folded.trim().to_string();
    for (wrong, right) in KNOWN_TYPOS {
        if key.contains(wrong) {
            key = key.replace(wrong, right);
        }
    }
    key
}

/// Normalize an optional cell value; `None` yields an empty key
pub fn normalize_opt(name: Option<&str>) -> String {
    name.map(normalize).unwrap_or_default()
}

fn fold_char(c: char) -> char {
    match c {
        'ı' => 'i',
        'ş' => 's',
        'ç' => 'c',
        'ğ' => 'g',
        'ö' => 'o',
        'ü' => 'u',
        other => other,
    }
}
