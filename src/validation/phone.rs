use super::ValidationError;

const MIN_DIGITS: usize = 8;
const MAX_DIGITS: usize = 15;

/// Normalize a user supplied phone number to `+<8..15 digits>`.
///
/// Every non-digit is dropped first, so a leading `+` is ignored. A `00`
/// international prefix is removed, otherwise a single `0` trunk prefix is.
/// Missing or blank input means "no phone" and yields `Ok(None)`.
pub fn normalize(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let raw = match raw.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return Ok(None),
    };

    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let digits = if let Some(rest) = digits.strip_prefix("00") {
        rest
    } else if let Some(rest) = digits.strip_prefix('0') {
        rest
    } else {
        digits.as_str()
    };

    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(Some(format!("+{digits}")))
}
