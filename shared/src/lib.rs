//! # Shared Vault Types Library
//!
//! Types shared by the vault client core and anything that feeds it or renders it.
//!
//! ## Structure
//!
//! - **[`amount`]**: Decimal [`Amount`](amount::Amount) used for every balance and price
//! - **[`dto`]**: Data Transfer Objects
//!   - **[`dto::vault`]**: Quotes, stats, snapshots, receipts
//! - **[`utils`]**: Display formatting
//!   - **[`utils::format_number`]**: Grouped fixed-decimal numbers
//!   - **[`utils::format_usd`]**: Compact dollar figures (`$2.1M`, `$800K`)
//!   - **[`utils::truncate_address`]**: Shorten account addresses
//!
//! ## Usage
//!
//! ```rust
//! use shared::amount::Amount;
//! use shared::utils::{format_number, truncate_address};
//!
//! let balance: Amount = "12450".parse().unwrap();
//! assert_eq!(format_number(balance, 2), "12,450.00");
//! assert_eq!(
//!     truncate_address("0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18"),
//!     "0x742d...bD18"
//! );
//! ```

pub mod amount;
pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
pub use amount::Amount;
pub use dto::*;
pub use utils::*;
