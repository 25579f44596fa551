//! Lenient parsing of amount form input

use crate::vault::validation::ParsedAmount;
use shared::amount::{Amount, ParseAmountError, DECIMALS};

/// Drop everything except ASCII digits and `.`.
pub fn sanitize_amount_input(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Parse whatever the user typed into an amount.
///
/// Non-numeric characters are stripped first, then the longest numeric prefix
/// is read: `"1.2.3"` is `1.2`, `""` is `0`, `"-5"` is `5`. Fractional digits
/// beyond the internal precision are truncated. Only a value too large to
/// represent is [`ParsedAmount::Invalid`].
pub fn parse_amount(raw: &str) -> ParsedAmount {
    let clean = sanitize_amount_input(raw);

    let mut parts = clean.splitn(3, '.');
    let int_digits = parts.next().unwrap_or("");
    let frac_digits = parts.next().unwrap_or("");
    let frac_digits = &frac_digits[..frac_digits.len().min(DECIMALS as usize)];

    match Amount::from_parts(int_digits, frac_digits) {
        Ok(amount) => ParsedAmount::Value(amount),
        Err(ParseAmountError::Overflow) => ParsedAmount::Invalid,
        // Sanitized text only holds digits, so nothing else can fail.
        Err(_) => ParsedAmount::Value(Amount::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(raw: &str) -> String {
        match parse_amount(raw) {
            ParsedAmount::Value(amount) => amount.to_string(),
            ParsedAmount::Invalid => "invalid".to_string(),
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_amount_input("$1,234.50 USDC"), "1234.50");
        assert_eq!(sanitize_amount_input("-5"), "5");
    }

    #[test]
    fn test_longest_prefix() {
        assert_eq!(value("1.2.3"), "1.2");
        assert_eq!(value(""), "0");
        assert_eq!(value("."), "0");
        assert_eq!(value("-5"), "5");
        assert_eq!(value("abc"), "0");
        assert_eq!(value(".5"), "0.5");
        assert_eq!(value("12,450"), "12450");
        assert_eq!(value("007.10"), "7.1");
    }

    #[test]
    fn test_truncates_extra_decimals() {
        assert_eq!(value("0.1234567891"), "0.123456789");
    }

    #[test]
    fn test_overflow_is_invalid() {
        assert_eq!(value(&"9".repeat(40)), "invalid");
    }
}
