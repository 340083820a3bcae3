//! Raw candidate text to canonical score.
//!
//! Strategies hand over free text ("85%", "85", whatever an OCR pass or a
//! query parameter carried). This module either produces an integer in
//! [0, 100] or rejects the candidate. Out-of-range values are rejected,
//! never clamped, so a corrupted OCR read like "850%" cannot submit a
//! bogus record.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// No digits in the candidate, or non-digit characters besides a
    /// single trailing percent sign.
    #[error("not a recognizable score")]
    InvalidScoreFormat,
    /// Parsed fine but falls outside [0, 100].
    #[error("score {0} is outside 0-100")]
    OutOfRange(u32),
}

/// Parses a raw candidate into a canonical 0-100 score.
///
/// Accepts optional surrounding whitespace and one trailing `%`. Anything
/// else — empty input, embedded text, signs, decimals — is rejected as
/// `InvalidScoreFormat`. Values above 100 are rejected as `OutOfRange`.
pub fn normalize(raw: &str) -> Result<u8, NormalizeError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(NormalizeError::InvalidScoreFormat);
    }

    let value: u32 = digits
        .parse()
        .map_err(|_| NormalizeError::InvalidScoreFormat)?;
    if value > 100 {
        return Err(NormalizeError::OutOfRange(value));
    }
    Ok(value as u8)
}

/// Manual-entry presentation rule: append `%` when the user left it off.
/// The result is what gets stored as the attempt's `raw_score`.
pub fn percentify(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.ends_with('%') {
        trimmed.to_string()
    } else {
        format!("{}%", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_percent_forms() {
        assert_eq!(normalize("85%"), Ok(85));
        assert_eq!(normalize("85"), Ok(85));
        assert_eq!(normalize(" 100% "), Ok(100));
        assert_eq!(normalize("0"), Ok(0));
        assert_eq!(normalize("007"), Ok(7));
    }

    #[test]
    fn whole_in_range_grid() {
        // Every string matching ^\d{1,3}%?$ with value in [0,100] succeeds.
        for value in 0..=100u32 {
            assert_eq!(normalize(&format!("{value}")), Ok(value as u8));
            assert_eq!(normalize(&format!("{value}%")), Ok(value as u8));
        }
    }

    #[test]
    fn rejects_out_of_range_without_clamping() {
        assert_eq!(normalize("101"), Err(NormalizeError::OutOfRange(101)));
        assert_eq!(normalize("850%"), Err(NormalizeError::OutOfRange(850)));
        assert_eq!(normalize("999%"), Err(NormalizeError::OutOfRange(999)));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "%", "  ", "abc", "8a5", "85%%", "-5", "8.5", "85 %x", "Your score was 85%"] {
            assert_eq!(normalize(bad), Err(NormalizeError::InvalidScoreFormat), "input {bad:?}");
        }
    }

    #[test]
    fn percent_with_inner_space_is_accepted() {
        // "85 %" strips the suffix then trims the gap.
        assert_eq!(normalize("85 %"), Ok(85));
    }

    #[test]
    fn percentify_appends_once() {
        assert_eq!(percentify("85"), "85%");
        assert_eq!(percentify("85%"), "85%");
        assert_eq!(percentify(" 92 "), "92%");
    }
}
