//! # Event Handlers
//!
//! Session entry points organized by domain.

pub mod connection;
pub mod input;
pub mod transaction;
