//! # Utility Functions
//!
//! Shared utility functions used across the vault client.
//!
//! ## Modules
//!
//! - **[`validation`]**: Lenient parsing of amount form input
//!
//! ## Related Modules
//!
//! - [`shared::utils`]: Display formatting
//! - [`crate::vault::validation`]: Verdicts over parsed amounts

pub mod validation;

pub use validation::{parse_amount, sanitize_amount_input};
