//! # Vault Data Transfer Objects
//!
//! Snapshots supplied by the chain reader and receipts produced on settlement.
//! All monetary fields are [`Amount`]s and travel as decimal strings.

use crate::amount::Amount;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of user action against the vault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Deposit,
    Withdraw,
}

impl ActionKind {
    /// All action kinds, in form order
    pub fn all() -> &'static [ActionKind] {
        &[ActionKind::Deposit, ActionKind::Withdraw]
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Deposit => "Deposit",
            ActionKind::Withdraw => "Withdraw",
        }
    }

    /// Button label while the action is pending confirmation
    pub fn pending_label(&self) -> &'static str {
        match self {
            ActionKind::Deposit => "Depositing...",
            ActionKind::Withdraw => "Withdrawing...",
        }
    }
}

/// Point-in-time view of the vault as seen by the connected account.
///
/// `user_value` is deliberately absent: it is always `user_shares × share_price`
/// and is derived by the quote model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultQuote {
    /// Underlying asset per share (USDC per yrUSDC)
    pub share_price: Amount,
    /// Maximum aggregate principal the vault accepts
    pub deposit_cap: Amount,
    /// Principal already counted against the cap
    pub deposit_cap_used: Amount,
    /// Smallest accepted deposit
    pub min_deposit: Amount,
    /// Base-asset balance available in the connected wallet
    pub wallet_balance: Amount,
    /// Vault shares held by the connected account
    pub user_shares: Amount,
}

impl VaultQuote {
    /// Check the snapshot invariants.
    pub fn check(&self) -> Result<(), String> {
        if !self.share_price.is_positive() {
            return Err(format!("share_price must be positive, got {}", self.share_price));
        }
        for (name, value) in [
            ("deposit_cap", self.deposit_cap),
            ("deposit_cap_used", self.deposit_cap_used),
            ("min_deposit", self.min_deposit),
            ("wallet_balance", self.wallet_balance),
            ("user_shares", self.user_shares),
        ] {
            if value.is_negative() {
                return Err(format!("{name} must not be negative, got {value}"));
            }
        }
        if self.deposit_cap_used > self.deposit_cap {
            return Err(format!(
                "deposit_cap_used ({}) exceeds deposit_cap ({})",
                self.deposit_cap_used, self.deposit_cap
            ));
        }
        Ok(())
    }
}

/// Vault-wide statistics shown alongside the quote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultStats {
    /// Total value locked, in the base asset
    pub tvl: Amount,
    /// Net APY as a percentage (`8.4` means 8.4%)
    pub net_apy: Amount,
    /// Number of depositing accounts
    pub depositors: u64,
    /// Cumulative yield paid out
    pub yield_paid: Amount,
    /// Vault contract address
    #[serde(default)]
    pub vault_address: Option<String>,
    /// Where the vault's capital is deployed, in display order
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    /// Yield earned by the connected account, when the reader knows it
    #[serde(default)]
    pub earnings: Option<UserEarnings>,
}

/// One strategy the vault routes capital into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Strategy name (`Aave V3`, `Idle Buffer`, ...)
    pub name: String,
    /// Share of TVL, in percent
    pub pct: Amount,
    /// Base asset deployed to the strategy
    pub balance: Amount,
    /// Strategy APY, in percent
    pub apy: Amount,
    /// Strategy contract; `None` for capital held idle in the vault
    pub address: Option<String>,
}

/// Yield earned by one account since its first deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEarnings {
    /// Earned in the base asset
    pub earned: Amount,
    /// Earned relative to principal, in percent
    pub earned_pct: Amount,
    pub first_deposit: NaiveDate,
}

/// Everything a refresh delivers in one read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSnapshot {
    pub quote: VaultQuote,
    pub stats: VaultStats,
}

/// Proof of a settled deposit or withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub kind: ActionKind,
    /// Base-asset amount moved
    pub amount: Amount,
    /// Shares minted (deposit) or burned (withdraw)
    pub shares: Amount,
    /// Transaction hash
    pub reference: String,
    pub settled_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote() -> VaultQuote {
        VaultQuote {
            share_price: "1.0136".parse().unwrap(),
            deposit_cap: Amount::from_int(1_000_000),
            deposit_cap_used: Amount::from_int(200_000),
            min_deposit: Amount::from_int(10),
            wallet_balance: Amount::from_int(12_450),
            user_shares: "12283.47".parse().unwrap(),
        }
    }

    #[test]
    fn test_quote_check() {
        assert!(quote().check().is_ok());

        let mut q = quote();
        q.share_price = Amount::ZERO;
        assert!(q.check().unwrap_err().contains("share_price"));

        let mut q = quote();
        q.deposit_cap_used = Amount::from_int(1_000_001);
        assert!(q.check().unwrap_err().contains("exceeds deposit_cap"));

        let mut q = quote();
        q.wallet_balance = Amount::from_int(-1);
        assert!(q.check().unwrap_err().contains("wallet_balance"));
    }

    #[test]
    fn test_action_kind_wire_format() {
        assert_eq!(serde_json::to_string(&ActionKind::Deposit).unwrap(), "\"deposit\"");
        let kind: ActionKind = serde_json::from_str("\"withdraw\"").unwrap();
        assert_eq!(kind, ActionKind::Withdraw);
    }

    #[test]
    fn test_snapshot_json() {
        let snapshot = VaultSnapshot { quote: quote(), stats: VaultStats::default() };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["quote"]["share_price"], "1.0136");
        assert_eq!(json["quote"]["deposit_cap"], "1000000");
    }

    #[test]
    fn test_stats_without_optional_fields() {
        let json = r#"{"tvl":"2100000","net_apy":"8.4","depositors":312,"yield_paid":"180000"}"#;
        let stats: VaultStats = serde_json::from_str(json).unwrap();
        assert!(stats.allocations.is_empty());
        assert_eq!(stats.earnings, None);
    }

    #[test]
    fn test_allocations_and_earnings_json() {
        let json = r#"{
            "tvl": "2100000", "net_apy": "8.4", "depositors": 312, "yield_paid": "180000",
            "vault_address": "0x1234...5678",
            "allocations": [
                {"name": "Aave V3", "pct": "32", "balance": "1340000", "apy": "6.8", "address": "0xaaaa...bbbb"},
                {"name": "Idle Buffer", "pct": "5", "balance": "340000", "apy": "0", "address": null}
            ],
            "earnings": {"earned": "164.20", "earned_pct": "1.32", "first_deposit": "2026-01-12"}
        }"#;
        let stats: VaultStats = serde_json::from_str(json).unwrap();

        assert_eq!(stats.allocations.len(), 2);
        assert_eq!(stats.allocations[0].pct, Amount::from_int(32));
        assert_eq!(stats.allocations[1].address, None);
        let earnings = stats.earnings.unwrap();
        assert_eq!(earnings.earned, Amount::new(16_420, 2));
        assert_eq!(earnings.first_deposit, NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
    }
}
