//! # Amounts
//!
//! [`Amount`] wraps a [`rust_decimal::Decimal`] and pins the rules the vault
//! relies on: products and quotients are rounded to [`DECIMALS`] fractional
//! digits (half away from zero), overflow yields `None`, and form text is
//! parsed strictly.
//!
//! ```rust
//! use shared::amount::Amount;
//!
//! let deposit: Amount = "500".parse().unwrap();
//! let price: Amount = "1.0136".parse().unwrap();
//! let shares = deposit.checked_div(price).unwrap();
//! assert_eq!(shares.to_fixed(2), "493.29");
//! ```
//!
//! ## Wire Format
//!
//! Amounts serialize as decimal strings (`"1.0136"`) through `rust_decimal`'s
//! `serde-str` support, so no precision is lost to JSON number parsing.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fractional digits kept after multiplication and division.
pub const DECIMALS: u32 = 9;

/// Signed decimal amount of the base asset, shares, or a price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// `num × 10^-scale`, e.g. `Amount::new(10_136, 4)` is `1.0136`.
    ///
    /// # Panics
    ///
    /// If `scale` exceeds 28.
    pub fn new(num: i64, scale: u32) -> Self {
        Amount(Decimal::new(num, scale))
    }

    /// Whole-number amount.
    pub fn from_int(value: i64) -> Self {
        Amount(Decimal::new(value, 0))
    }

    /// Build from already-split digit strings (`"123"`, `"45"` → `123.45`).
    ///
    /// Both parts must be ASCII digits; the fraction must not exceed [`DECIMALS`]
    /// digits. Either part may be empty.
    pub fn from_parts(int_digits: &str, frac_digits: &str) -> Result<Self, ParseAmountError> {
        if !int_digits.bytes().all(|b| b.is_ascii_digit())
            || !frac_digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ParseAmountError::InvalidDigit);
        }
        if frac_digits.len() > DECIMALS as usize {
            return Err(ParseAmountError::TooManyDecimals);
        }

        let int_digits = if int_digits.is_empty() { "0" } else { int_digits };
        let text = if frac_digits.is_empty() {
            int_digits.to_string()
        } else {
            format!("{int_digits}.{frac_digits}")
        };
        Decimal::from_str_exact(&text)
            .map(Amount)
            .map_err(|_| ParseAmountError::Overflow)
    }

    /// The underlying decimal.
    pub fn decimal(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        !self.0.is_zero() && self.0.is_sign_positive()
    }

    pub fn is_negative(self) -> bool {
        !self.0.is_zero() && self.0.is_sign_negative()
    }

    pub fn abs(self) -> Amount {
        Amount(self.0.abs())
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    pub fn saturating_sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }

    /// `self × rhs`, rounded to [`DECIMALS`].
    pub fn checked_mul(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_mul(rhs.0).map(|product| Amount(product).round_dp(DECIMALS))
    }

    /// `self ÷ rhs`, rounded to [`DECIMALS`]. `None` on division by zero.
    pub fn checked_div(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_div(rhs.0).map(|quotient| Amount(quotient).round_dp(DECIMALS))
    }

    /// Round to `dp` fractional digits, half away from zero.
    pub fn round_dp(self, dp: u32) -> Amount {
        Amount(self.0.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Drop everything past `dp` fractional digits.
    pub fn trunc_dp(self, dp: u32) -> Amount {
        Amount(self.0.round_dp_with_strategy(dp, RoundingStrategy::ToZero))
    }

    /// Render with exactly `dp` fractional digits (no grouping separators).
    pub fn to_fixed(self, dp: u32) -> String {
        let mut rounded = self.round_dp(dp).0;
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        rounded.rescale(dp);
        rounded.to_string()
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(Decimal::from(value))
    }
}

impl fmt::Display for Amount {
    /// Shortest exact decimal text: trailing fractional zeros are dropped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.normalize(), f)
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Strict decimal parser: optional `-`, digits, optional `.` and up to nine digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (int_digits, frac_digits) = body.split_once('.').unwrap_or((body, ""));
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(ParseAmountError::Empty);
        }

        let value = Amount::from_parts(int_digits, frac_digits)?;
        Ok(if negative { Amount(-value.0) } else { value })
    }
}

// region:    --- Error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidDigit,
    TooManyDecimals,
    Overflow,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(fmt, "amount is empty"),
            ParseAmountError::InvalidDigit => write!(fmt, "amount contains a non-digit character"),
            ParseAmountError::TooManyDecimals => {
                write!(fmt, "amount has more than {DECIMALS} fractional digits")
            }
            ParseAmountError::Overflow => write!(fmt, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(amt("500").to_string(), "500");
        assert_eq!(amt("1.0136").to_string(), "1.0136");
        assert_eq!(amt(".5").to_string(), "0.5");
        assert_eq!(amt("-12.50").to_string(), "-12.5");
        assert_eq!(amt("0").to_string(), "0");
        assert_eq!(amt("007.10").to_string(), "7.1");
        assert_eq!(Amount::new(10_136, 4), amt("1.0136"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<Amount>(), Err(ParseAmountError::Empty));
        assert_eq!(".".parse::<Amount>(), Err(ParseAmountError::Empty));
        assert_eq!("1.2.3".parse::<Amount>(), Err(ParseAmountError::InvalidDigit));
        assert_eq!("1e5".parse::<Amount>(), Err(ParseAmountError::InvalidDigit));
        assert_eq!("1_000".parse::<Amount>(), Err(ParseAmountError::InvalidDigit));
        assert_eq!("1.0000000001".parse::<Amount>(), Err(ParseAmountError::TooManyDecimals));
        assert_eq!(
            "999999999999999999999999999999999999".parse::<Amount>(),
            Err(ParseAmountError::Overflow)
        );
    }

    #[test]
    fn test_out_of_range_never_panics() {
        assert_eq!(
            "170141183460469231731687303715.884105727".parse::<Amount>(),
            Err(ParseAmountError::Overflow)
        );

        let max = Amount::from(Decimal::MAX);
        assert_eq!(max.to_fixed(0), "79228162514264337593543950335");
        assert_eq!(max.checked_add(Amount::from_int(1)), None);
        assert_eq!(max.checked_mul(Amount::from_int(2)), None);
        assert_eq!(max.checked_div(amt("0.5")), None);
    }

    #[test]
    fn test_share_math() {
        let shares = amt("500").checked_div(amt("1.0136")).unwrap();
        assert_eq!(shares.to_fixed(6), "493.291239");
        assert_eq!(shares.to_string(), "493.291239148");

        let back = shares.checked_mul(amt("1.0136")).unwrap();
        let drift = back.checked_sub(amt("500")).unwrap().abs();
        assert!(drift <= Amount::new(1, 6), "drift {drift}");
    }

    #[test]
    fn test_div_by_zero() {
        assert_eq!(amt("1").checked_div(Amount::ZERO), None);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(amt("2.345").to_fixed(2), "2.35");
        assert_eq!(amt("-2.345").to_fixed(2), "-2.35");
        assert_eq!(amt("2.344").to_fixed(2), "2.34");
        assert_eq!(amt("7").to_fixed(4), "7.0000");
        assert_eq!(amt("0.99999").to_fixed(0), "1");
        assert_eq!(amt("-0.001").to_fixed(2), "0.00");
        assert_eq!(amt("12450.5159").trunc_dp(2), amt("12450.51"));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&amt("1.0136")).unwrap();
        assert_eq!(json, "\"1.0136\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amt("1.0136"));
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
    }
}
