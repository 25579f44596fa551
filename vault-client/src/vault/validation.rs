//! # Validation Engine
//!
//! Turns a parsed amount plus the current quote into a [`ValidationVerdict`].
//! Pure and re-entrant: the same inputs always give the same verdict and the
//! quote is never touched.
//!
//! ## Rules (first match wins)
//!
//! | # | Applies to | Condition | Severity | Message |
//! |---|---|---|---|---|
//! | 1 | both | `amount <= 0` | None | (none) |
//! | 2 | deposit | `amount < min_deposit` | Error | minimum deposit is {min} USDC |
//! | 3 | deposit | `amount > wallet_balance` | Error | insufficient wallet balance |
//! | 4 | deposit | `amount > remaining_cap` | Warning | exceeds vault cap; max additional = {remaining} USDC |
//! | 5 | withdraw | `amount > user_value` | Error | exceeds withdrawable balance |
//!
//! An amount whose share conversion is out of range is reported like
//! unparseable input. Severity is styling only. Every verdict other than a clean pass disables
//! submission, including the rule 4 warning.

use crate::vault::quote::QuoteModel;
use shared::{format_number, ActionKind, Amount};

/// Styling class of a verdict, independent of gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    None,
    Warning,
    Error,
}

/// Result of parsing raw form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedAmount {
    Value(Amount),
    /// The digits did not fit the decimal range
    Invalid,
}

impl ParsedAmount {
    pub fn value(&self) -> Option<Amount> {
        match self {
            ParsedAmount::Value(amount) => Some(*amount),
            ParsedAmount::Invalid => None,
        }
    }
}

/// Live preview of what an action would move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preview {
    /// Shares minted for the deposited amount
    Deposit { shares: Amount },
    /// Shares burned and base asset received (1:1 at the current share price)
    Withdraw { burn_shares: Amount, receive: Amount },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub severity: Severity,
    /// Empty when there is nothing to say
    pub message: String,
    pub preview: Option<Preview>,
}

impl ValidationVerdict {
    /// Nothing entered (or nothing to validate against yet).
    pub fn empty() -> Self {
        Self::default()
    }

    fn pass(preview: Preview) -> Self {
        Self { is_valid: true, severity: Severity::None, message: String::new(), preview: Some(preview) }
    }

    fn fail(severity: Severity, message: impl Into<String>, preview: Option<Preview>) -> Self {
        Self { is_valid: false, severity, message: message.into(), preview }
    }
}

/// Validate `parsed` as a `kind` action against `quote`.
pub fn validate(kind: ActionKind, parsed: ParsedAmount, quote: &QuoteModel) -> ValidationVerdict {
    let amount = match parsed {
        ParsedAmount::Value(amount) => amount,
        ParsedAmount::Invalid => {
            return ValidationVerdict::fail(Severity::Error, "amount is not a valid number", None)
        }
    };

    if !amount.is_positive() {
        return ValidationVerdict::empty();
    }

    let Some(shares) = quote.shares_for(amount) else {
        return ValidationVerdict::fail(Severity::Error, "amount is not a valid number", None);
    };
    let q = quote.snapshot();

    match kind {
        ActionKind::Deposit => {
            let preview = Some(Preview::Deposit { shares });
            let remaining = quote.remaining_cap();

            if amount < q.min_deposit {
                ValidationVerdict::fail(
                    Severity::Error,
                    format!("minimum deposit is {} USDC", q.min_deposit),
                    preview,
                )
            } else if amount > q.wallet_balance {
                ValidationVerdict::fail(
                    Severity::Error,
                    format!(
                        "insufficient wallet balance: you only have {} USDC",
                        format_number(q.wallet_balance, 2)
                    ),
                    preview,
                )
            } else if amount > remaining {
                ValidationVerdict::fail(
                    Severity::Warning,
                    format!("exceeds vault cap; max additional = {remaining} USDC"),
                    preview,
                )
            } else {
                ValidationVerdict::pass(Preview::Deposit { shares })
            }
        }
        ActionKind::Withdraw => {
            let preview = Preview::Withdraw { burn_shares: shares, receive: amount };
            let available = quote.user_value();

            if amount > available {
                ValidationVerdict::fail(
                    Severity::Error,
                    format!(
                        "exceeds withdrawable balance: you can withdraw up to {} USDC",
                        format_number(available, 2)
                    ),
                    Some(preview),
                )
            } else {
                ValidationVerdict::pass(preview)
            }
        }
    }
}
