//! # Display Projection
//!
//! Strings the presentation layer shows, derived from session state. Amounts
//! keep full precision everywhere else; rounding to 2 or 4 decimals happens
//! only here.
//!
//! ```text
//! QuoteModel + VaultStats ──► DepositPanel / PortfolioPanel / WithdrawPanel
//! VaultStats              ──► VaultInfoPanel / allocation_legend
//! ConnectionState         ──► wallet_button_label
//! LifecyclePhase          ──► action_button_label / TxResult
//! ValidationVerdict       ──► PreviewText
//! ```

use crate::config::ChainConfig;
use crate::vault::{ConnectionState, LifecyclePhase, Preview, QuoteModel, Severity, ValidationVerdict};
use shared::{
    format_number, format_percent, format_usd, truncate_address, ActionKind, Amount, UserEarnings, VaultStats,
};

const ASSET: &str = "USDC";
const SHARE: &str = "yrUSDC";
const PLACEHOLDER: &str = "--";

fn usdc(amount: Amount) -> String {
    format!("{} {ASSET}", format_number(amount, 2))
}

fn shares(amount: Amount) -> String {
    format!("{} {SHARE}", format_number(amount, 2))
}

// region:    --- Panels

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositPanel {
    pub wallet_balance: String,
    pub share_price: String,
    pub apy: String,
    pub cap_info: String,
}

impl DepositPanel {
    pub fn new(quote: &QuoteModel, stats: &VaultStats) -> Self {
        let q = quote.snapshot();
        Self {
            wallet_balance: format!("Wallet balance: {}", usdc(q.wallet_balance)),
            share_price: format!("{} {ASSET} per {SHARE}", format_number(q.share_price, 4)),
            apy: format_percent(stats.net_apy, 1),
            cap_info: format!(
                "Vault deposit cap: {} remaining. Minimum deposit: {} {ASSET}.",
                format_usd(quote.remaining_cap()),
                q.min_deposit
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioPanel {
    pub value: String,
    /// `+$164.20 earned (+1.32%)`, absent when earnings are unknown
    pub earned: Option<String>,
    /// `since your first deposit on Jan 12, 2026`
    pub since: Option<String>,
    pub shares: String,
    pub share_price: String,
    pub apy: String,
    pub share_of_tvl: String,
    pub allocation: Vec<AllocationItem>,
}

impl PortfolioPanel {
    pub fn new(quote: &QuoteModel, stats: &VaultStats) -> Self {
        let q = quote.snapshot();
        Self {
            value: format!("${}", format_number(quote.user_value(), 2)),
            earned: stats.earnings.as_ref().map(earned_line),
            since: stats
                .earnings
                .as_ref()
                .map(|e| format!("since your first deposit on {}", e.first_deposit.format("%b %-d, %Y"))),
            shares: shares(q.user_shares),
            share_price: format!("{} {ASSET}", format_number(q.share_price, 4)),
            apy: format_percent(stats.net_apy, 1),
            share_of_tvl: format_percent(quote.share_of_tvl(stats), 1),
            allocation: allocation_legend(stats),
        }
    }
}

fn earned_line(earnings: &UserEarnings) -> String {
    format!(
        "+${} earned (+{})",
        format_number(earnings.earned, 2),
        format_percent(earnings.earned_pct, 2)
    )
}

/// Vault overview: headline stats plus where the capital sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultInfoPanel {
    pub tvl: String,
    pub apy: String,
    pub depositors: String,
    pub yield_paid: String,
    /// Truncated contract address
    pub vault_address: Option<String>,
    pub allocation: Vec<AllocationItem>,
}

impl VaultInfoPanel {
    pub fn new(stats: &VaultStats) -> Self {
        Self {
            tvl: format_usd(stats.tvl),
            apy: format_percent(stats.net_apy, 1),
            depositors: format_number(Amount::from(stats.depositors), 0),
            yield_paid: format_usd(stats.yield_paid),
            vault_address: stats.vault_address.as_deref().map(truncate_address),
            allocation: allocation_legend(stats),
        }
    }
}

/// One segment of the allocation bar and its legend entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationItem {
    pub name: String,
    /// Segment width in percent of the bar
    pub width: Amount,
    /// `32%`
    pub pct: String,
    /// `$1.3M`
    pub balance: String,
    /// `6.8%`
    pub apy: String,
    pub address: Option<String>,
}

/// Allocation bar segments, in the order the reader reported them.
pub fn allocation_legend(stats: &VaultStats) -> Vec<AllocationItem> {
    stats
        .allocations
        .iter()
        .map(|a| AllocationItem {
            name: a.name.clone(),
            width: a.pct.max(Amount::ZERO),
            pct: format!("{}%", a.pct),
            balance: format_usd(a.balance),
            apy: format_percent(a.apy, 1),
            address: a.address.as_deref().map(truncate_address),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawPanel {
    pub available: String,
    /// Share count and price behind `available`
    pub breakdown: String,
}

impl WithdrawPanel {
    pub fn new(quote: &QuoteModel) -> Self {
        let q = quote.snapshot();
        Self {
            available: format!("Available to withdraw: {}", usdc(quote.user_value())),
            breakdown: format!(
                "({} at {} {ASSET}/share)",
                shares(q.user_shares),
                format_number(q.share_price, 4)
            ),
        }
    }
}

// endregion: --- Panels

// region:    --- Forms

/// Preview line(s) under a form, `--` when there is nothing to preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewText {
    pub shares: String,
    /// Only set for withdrawals
    pub receive: Option<String>,
}

impl PreviewText {
    pub fn new(kind: ActionKind, verdict: &ValidationVerdict) -> Self {
        match (kind, verdict.preview) {
            (ActionKind::Deposit, Some(Preview::Deposit { shares: minted })) => {
                Self { shares: format!("~{}", shares(minted)), receive: None }
            }
            (ActionKind::Withdraw, Some(Preview::Withdraw { burn_shares, receive })) => Self {
                shares: format!("~{}", shares(burn_shares)),
                receive: Some(format!("~{}", usdc(receive))),
            },
            (ActionKind::Deposit, _) => Self { shares: PLACEHOLDER.to_string(), receive: None },
            (ActionKind::Withdraw, _) => {
                Self { shares: PLACEHOLDER.to_string(), receive: Some(PLACEHOLDER.to_string()) }
            }
        }
    }
}

/// Top bar wallet button.
pub fn wallet_button_label(connection: &ConnectionState) -> String {
    match connection {
        ConnectionState::Connected(address) => truncate_address(address),
        ConnectionState::Connecting => "Connecting...".to_string(),
        _ => "Connect Wallet".to_string(),
    }
}

/// Submit button text for the slot's phase.
pub fn action_button_label(kind: ActionKind, phase: &LifecyclePhase) -> &'static str {
    match phase {
        LifecyclePhase::AwaitingSignature => "Confirm in wallet...",
        LifecyclePhase::Submitted(_) => kind.pending_label(),
        _ => kind.label(),
    }
}

// endregion: --- Forms

// region:    --- Transaction Result

/// Result card shown once an action reaches a terminal phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxResult {
    pub success: bool,
    pub severity: Severity,
    pub title: String,
    pub detail: String,
    pub explorer_url: Option<String>,
}

impl TxResult {
    /// `None` unless the phase is terminal.
    pub fn from_phase(kind: ActionKind, phase: &LifecyclePhase, chain: &ChainConfig) -> Option<Self> {
        match phase {
            LifecyclePhase::Settled(receipt) => {
                let (title, detail) = match receipt.kind {
                    ActionKind::Deposit => (
                        format!("Deposited {} successfully", usdc(receipt.amount)),
                        format!("You received {}", shares(receipt.shares)),
                    ),
                    ActionKind::Withdraw => (
                        format!("Withdrew {}", usdc(receipt.amount)),
                        format!("{} burned", shares(receipt.shares)),
                    ),
                };
                Some(Self {
                    success: true,
                    severity: Severity::None,
                    title,
                    detail,
                    explorer_url: Some(chain.tx_url(&receipt.reference)),
                })
            }
            LifecyclePhase::Rejected(reason) => Some(Self {
                success: false,
                severity: reason.severity(),
                title: format!("{} failed", kind.label()),
                detail: reason.message(),
                explorer_url: None,
            }),
            _ => None,
        }
    }
}

// endregion: --- Transaction Result
