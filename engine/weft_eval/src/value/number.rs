//! Decimal parsing and canonical formatting.
//!
//! Numbers are decimal throughout; the string form never carries
//! insignificant trailing zeros and zero always prints as `"0"`.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse the numeric form of a string.
///
/// Accepts plain decimal notation and scientific notation. Returns `None`
/// when the text has no numeric form - the caller turns that into the
/// undefined number, not an error.
pub(crate) fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .ok()
        .or_else(|| Decimal::from_scientific(trimmed).ok())
}

/// Canonical string form of a number.
pub(crate) fn format_decimal(value: &Decimal) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_plain_and_scientific() {
        assert_eq!(parse_decimal("42"), Some(Decimal::from(42)));
        assert_eq!(parse_decimal(" -3.5 "), Decimal::from_str("-3.5").ok());
        assert_eq!(parse_decimal("1.5e3"), Some(Decimal::from(1500)));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("12ab"), None);
    }

    #[test]
    fn test_format_strips_trailing_zeros() {
        assert_eq!(format_decimal(&Decimal::new(2500, 3)), "2.5");
        assert_eq!(format_decimal(&Decimal::new(100, 2)), "1");
        assert_eq!(format_decimal(&Decimal::new(0, 2)), "0");
        assert_eq!(format_decimal(&Decimal::from(-7)), "-7");
    }
}
