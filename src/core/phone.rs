//! Phone number normalization for messaging links.
//!
//! Numbers in the sheet are entered in every local variant (`01815-128906`,
//! `+880 1815128906`, `1815128906` after the sheet drops the leading zero). A link
//! needs the full international form: country code followed by the subscriber
//! digits, nothing else.

/// Normalizes a raw phone number to `country_code + local_digits` digits.
///
/// Accepted shapes after stripping every non-digit:
/// - already international (`880` + 10 digits, including `+88 01…`)
/// - international with a stray trunk zero (`880` + `0` + 10 digits)
/// - national with trunk zero (`0` + 10 digits)
/// - bare subscriber digits (10 digits)
///
/// Returns `None` for anything else. Normalizing a normalized number returns it
/// unchanged.
#[must_use]
pub fn normalize(raw: &str, country_code: &str, local_digits: usize) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() || local_digits == 0 {
        return None;
    }

    let full_len = country_code.len() + local_digits;

    let local = if digits.len() == full_len && digits.starts_with(country_code) {
        &digits[country_code.len()..]
    } else if digits.len() == full_len + 1
        && digits.starts_with(country_code)
        && digits[country_code.len()..].starts_with('0')
    {
        &digits[country_code.len() + 1..]
    } else if digits.len() == local_digits + 1 && digits.starts_with('0') {
        &digits[1..]
    } else if digits.len() == local_digits {
        digits.as_str()
    } else {
        return None;
    };

    // A national number never starts with the trunk zero once it is stripped.
    if local.starts_with('0') {
        return None;
    }

    let normalized = format!("{country_code}{local}");
    (normalized.len() == full_len).then_some(normalized)
}
