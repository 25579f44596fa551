//! # Vault Quote Model
//!
//! Read-only projection of the current [`VaultQuote`] snapshot: share
//! conversions, remaining cap, and the user's position value.
//!
//! The model has exactly two writers, both inside
//! [`SessionState`](crate::app::SessionState): a chain refresh ([`QuoteModel::replace`])
//! and a settlement ([`QuoteModel::apply_receipt`]). Everything else only reads.

use crate::core::error::{AppError, LifecycleError, Result};
use shared::{ActionKind, Amount, TransactionReceipt, VaultQuote, VaultStats};

/// Current quote snapshot plus derived conversions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteModel {
    quote: VaultQuote,
    /// `user_shares × share_price`, fixed when the snapshot is accepted
    user_value: Amount,
}

impl QuoteModel {
    /// Wrap a snapshot after checking its invariants.
    pub fn new(quote: VaultQuote) -> Result<Self> {
        let user_value = checked_value(&quote).map_err(AppError::Chain)?;
        Ok(Self { quote, user_value })
    }

    /// The raw snapshot.
    pub fn snapshot(&self) -> &VaultQuote {
        &self.quote
    }

    pub fn share_price(&self) -> Amount {
        self.quote.share_price
    }

    /// `amount / share_price`. Zero for zero (and for non-positive input),
    /// `None` when the result is out of range.
    pub fn shares_for(&self, amount: Amount) -> Option<Amount> {
        if !amount.is_positive() {
            return Some(Amount::ZERO);
        }
        amount.checked_div(self.quote.share_price)
    }

    /// `shares × share_price`. Zero for zero (and for non-positive input),
    /// `None` when the result is out of range.
    pub fn amount_for(&self, shares: Amount) -> Option<Amount> {
        if !shares.is_positive() {
            return Some(Amount::ZERO);
        }
        shares.checked_mul(self.quote.share_price)
    }

    /// Principal the vault still accepts.
    pub fn remaining_cap(&self) -> Amount {
        self.quote
            .deposit_cap
            .saturating_sub(self.quote.deposit_cap_used)
            .max(Amount::ZERO)
    }

    /// Value of the user's shares in the base asset.
    pub fn user_value(&self) -> Amount {
        self.user_value
    }

    /// User's share of total value locked, in percent.
    pub fn share_of_tvl(&self, stats: &VaultStats) -> Amount {
        if !stats.tvl.is_positive() {
            return Amount::ZERO;
        }
        self.user_value()
            .checked_mul(Amount::from_int(100))
            .and_then(|scaled| scaled.checked_div(stats.tvl))
            .unwrap_or(Amount::ZERO)
    }

    /// Swap in a fresh snapshot from the chain reader. The old snapshot is
    /// kept if the new one is inconsistent.
    pub fn replace(&mut self, quote: VaultQuote) -> Result<()> {
        *self = Self::new(quote)?;
        Ok(())
    }

    /// Shares moved by settling `amount` of `kind`.
    pub fn share_delta(&self, _kind: ActionKind, amount: Amount) -> Option<Amount> {
        self.shares_for(amount)
    }

    /// Fold a settled receipt into the snapshot.
    ///
    /// Checks the post-settlement snapshot against the invariants first; on
    /// failure nothing changes and the reason is returned for `Rejected`.
    pub fn apply_receipt(&mut self, receipt: &TransactionReceipt) -> std::result::Result<(), LifecycleError> {
        let q = &self.quote;
        let overflow = || LifecycleError::Unknown("amount overflow".to_string());

        let next = match receipt.kind {
            ActionKind::Deposit => {
                if receipt.amount > q.wallet_balance {
                    return Err(LifecycleError::InsufficientFunds);
                }
                let cap_used = q.deposit_cap_used.checked_add(receipt.amount).ok_or_else(overflow)?;
                if cap_used > q.deposit_cap {
                    return Err(LifecycleError::CapExceeded);
                }
                VaultQuote {
                    user_shares: q.user_shares.checked_add(receipt.shares).ok_or_else(overflow)?,
                    wallet_balance: q.wallet_balance.saturating_sub(receipt.amount),
                    deposit_cap_used: cap_used,
                    ..q.clone()
                }
            }
            ActionKind::Withdraw => {
                if receipt.amount > self.user_value() {
                    return Err(LifecycleError::InsufficientFunds);
                }
                VaultQuote {
                    // Burning the full position can round one 10^-9 step past the balance.
                    user_shares: q.user_shares.saturating_sub(receipt.shares).max(Amount::ZERO),
                    wallet_balance: q.wallet_balance.checked_add(receipt.amount).ok_or_else(overflow)?,
                    deposit_cap_used: q.deposit_cap_used.saturating_sub(receipt.amount).max(Amount::ZERO),
                    ..q.clone()
                }
            }
        };

        let user_value = checked_value(&next).map_err(LifecycleError::Unknown)?;
        self.quote = next;
        self.user_value = user_value;
        Ok(())
    }
}

/// Snapshot invariants plus a representable position value.
fn checked_value(quote: &VaultQuote) -> std::result::Result<Amount, String> {
    quote.check()?;
    quote
        .user_shares
        .checked_mul(quote.share_price)
        .ok_or_else(|| format!("position value of {} shares is out of range", quote.user_shares))
}
