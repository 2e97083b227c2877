//! Phone number cleanup for call and WhatsApp actions.

/// Numbers with fewer digits than this cannot be dialed and disable the
/// corresponding action.
pub const MIN_PHONE_DIGITS: usize = 8;

/// Keeps only ASCII digits and `+`.
#[must_use]
pub fn to_dialable(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Dialable form of `raw`, or `None` when too few digits remain.
#[must_use]
pub fn dial_number(raw: &str) -> Option<String> {
    let dialable = to_dialable(raw);
    let digits = dialable.chars().filter(char::is_ascii_digit).count();
    (digits >= MIN_PHONE_DIGITS).then_some(dialable)
}

/// International digit string for a WhatsApp deep link.
///
/// A leading `00` international prefix is dropped and the rest passes
/// through whatever its country. Otherwise local numbers carrying a trunk
/// `0` get it replaced by `country_code`, and numbers already starting with
/// the country code pass through. Returns `None` for numbers shorter than
/// [`MIN_PHONE_DIGITS`].
///
/// A national number whose trunk `0` was lost upstream (spreadsheets store
/// phones as numbers) cannot be told apart from an international one and
/// passes through unchanged.
#[must_use]
pub fn to_whatsapp(raw: &str, country_code: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < MIN_PHONE_DIGITS {
        return None;
    }

    if let Some(international) = digits.strip_prefix("00") {
        return Some(international.to_string());
    }
    if digits.starts_with(country_code) {
        return Some(digits);
    }
    match digits.strip_prefix('0') {
        Some(national) => Some(format!("{country_code}{national}")),
        None => Some(digits),
    }
}
