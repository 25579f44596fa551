//! # Data Transfer Objects (DTOs)
//!
//! Structures exchanged between the vault client core and its collaborators
//! (chain reader, presentation layer).
//!
//! ## Module Organization
//!
//! - [`vault`] - Vault snapshots, strategy allocations, earnings, action kinds, and settlement receipts
//!
//! ## Serialization Format
//!
//! - **Field naming**: snake_case (default serde behavior)
//! - **Enums**: lowercase strings via `#[serde(rename_all = "lowercase")]`
//! - **Amounts**: decimal strings, see [`crate::amount::Amount`]
//! - **Optional stats** (`vault_address`, `allocations`, `earnings`) may be omitted
//!
//! ## Example JSON
//!
//! ```text
//! {
//!   "quote": {
//!     "share_price": "1.0136",
//!     "deposit_cap": "1000000",
//!     "deposit_cap_used": "200000",
//!     "min_deposit": "10",
//!     "wallet_balance": "12450",
//!     "user_shares": "12283.47"
//!   },
//!   "stats": {
//!     "tvl": "2100000", "net_apy": "8.4", "depositors": 312, "yield_paid": "180000",
//!     "vault_address": "0x1234...5678",
//!     "allocations": [
//!       { "name": "Aave V3", "pct": "32", "balance": "1340000", "apy": "6.8", "address": "0xaaaa...bbbb" }
//!     ],
//!     "earnings": { "earned": "164.2", "earned_pct": "1.32", "first_deposit": "2026-01-12" }
//!   }
//! }
//! ```

pub mod vault;

pub use vault::*;
