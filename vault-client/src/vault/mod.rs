//! # Vault Domain
//!
//! Synchronous building blocks of the client core. Nothing in here awaits
//! except [`cancel::guard`]; the async orchestration lives in [`crate::app`].
//!
//! - **[`quote`]**: share conversions over the current snapshot
//! - **[`connection`]**: wallet connection state machine
//! - **[`validation`]**: input verdicts and previews
//! - **[`lifecycle`]**: per-slot transaction phases
//! - **[`cancel`]**: cancel tokens for suspension points

pub mod cancel;
pub mod connection;
pub mod lifecycle;
pub mod quote;
pub mod validation;

pub use cancel::{guard, CancelToken, Interrupted};
pub use connection::{ConnectionMachine, ConnectionState};
pub use lifecycle::{ActionRequest, LifecyclePhase, LifecycleSlot, SignedAction, SubmitOutcome};
pub use quote::QuoteModel;
pub use validation::{validate, ParsedAmount, Preview, Severity, ValidationVerdict};
