//! # Shared Display Formatting
//!
//! Pure functions that turn raw magnitudes and addresses into display strings.
//! Formatting is only ever applied at the presentation boundary; internal state
//! keeps full [`Amount`] precision.
//!
//! ## Address Formatting
//!
//! - [`format_address`] - Format address with ellipsis (first N and last M characters)
//! - [`truncate_address`] - `format_address` with the wallet-button defaults (6 and 4)
//!
//! ## Number Formatting
//!
//! - [`format_number`] - Fixed decimals with comma grouping (`12,450.00`)
//! - [`format_usd`] - Compact dollar figure (`$2.1M`, `$800K`, `$12.34`)
//! - [`format_percent`] - Percentage with fixed decimals (`8.4%`)

use crate::amount::Amount;

/// Format an address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18";
/// assert_eq!(format_address(addr, 6, 4), "0x742d...bD18");
/// assert_eq!(format_address("short", 4, 4), "short");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    if address_len <= prefix_len + suffix_len
        || prefix_len >= address_len
        || suffix_len >= address_len
        || !address.is_ascii()
    {
        return address.to_string();
    }

    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Shorten an address for the connected-wallet button (`0x742d...bD18`).
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}

/// Format an amount with `decimals` fractional digits and comma grouping.
///
/// # Examples
///
/// ```rust
/// use shared::{amount::Amount, utils::format_number};
///
/// let value: Amount = "1234567.891".parse().unwrap();
/// assert_eq!(format_number(value, 2), "1,234,567.89");
/// ```
pub fn format_number(value: Amount, decimals: u32) -> String {
    let fixed = value.to_fixed(decimals);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (integer_part, decimal_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut grouped = String::with_capacity(integer_part.len() + integer_part.len() / 3);
    for (i, ch) in integer_part.chars().enumerate() {
        if i > 0 && (integer_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if decimal_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{decimal_part}")
    }
}

/// Compact dollar figure: millions with one decimal, thousands with none,
/// otherwise cents.
pub fn format_usd(value: Amount) -> String {
    let million = Amount::from_int(1_000_000);
    let thousand = Amount::from_int(1_000);

    if value >= million {
        let scaled = value.checked_div(million).unwrap_or(value);
        format!("${}M", scaled.to_fixed(1))
    } else if value >= thousand {
        let scaled = value.checked_div(thousand).unwrap_or(value);
        format!("${}K", scaled.to_fixed(0))
    } else {
        format!("${}", value.to_fixed(2))
    }
}

/// Format a percentage value (`8.4` → `"8.4%"` with one decimal).
pub fn format_percent(pct: Amount, decimals: u32) -> String {
    format!("{}%", pct.to_fixed(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn test_format_address() {
        let addr = "0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18";
        assert_eq!(format_address(addr, 6, 4), "0x742d...bD18");
        assert_eq!(format_address(addr, 4, 4), "0x74...bD18");
        assert_eq!(format_address(addr, 2, 2), "0x...18");
    }

    #[test]
    fn test_format_address_short() {
        assert_eq!(format_address("short", 4, 4), "short");
        assert_eq!(format_address("abc", 4, 4), "abc");
        assert_eq!(truncate_address(""), "");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(amt("1234567.89"), 2), "1,234,567.89");
        assert_eq!(format_number(amt("100"), 2), "100.00");
        assert_eq!(format_number(amt("999.995"), 2), "1,000.00");
        assert_eq!(format_number(amt("1.0136"), 4), "1.0136");
        assert_eq!(format_number(amt("-12450"), 0), "-12,450");
        assert_eq!(format_number(amt("123456"), 0), "123,456");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(amt("2100000")), "$2.1M");
        assert_eq!(format_usd(amt("800000")), "$800K");
        assert_eq!(format_usd(amt("180000")), "$180K");
        assert_eq!(format_usd(amt("12.5")), "$12.50");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(amt("8.4"), 1), "8.4%");
        assert_eq!(format_percent(amt("0.6"), 1), "0.6%");
    }
}
