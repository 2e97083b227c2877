//! Search-text canonicalization.
//!
//! Folds case and unifies Arabic letter variants that casual typists use
//! interchangeably, so that a query and an entry spelled differently still
//! compare equal. No morphological analysis is attempted.

/// Canonicalizes `text` for substring matching.
///
/// Lowercases, collapses alef variants to plain alef, taa marbuta to haa,
/// alef maksura and Farsi yeh to yaa, and drops Arabic diacritics and the
/// tatweel. Total and idempotent.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter_map(fold_arabic)
        .collect()
}

fn fold_arabic(c: char) -> Option<char> {
    match c {
        // hamza above/below, madda, wasla
        'أ' | 'إ' | 'آ' | 'ٱ' => Some('ا'),
        'ة' => Some('ه'),
        'ى' | 'ی' => Some('ي'),
        '\u{0640}' => None,
        c if is_arabic_diacritic(c) => None,
        c => Some(c),
    }
}

fn is_arabic_diacritic(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}')
}
