//! # Yield Vault Client - Library Root
//!
//! Client-side core of a single-asset yield vault (USDC in, yrUSDC shares out).
//! It turns user intents (connect, type an amount, deposit, withdraw) into
//! validated, cancellable transaction lifecycles, and exposes the derived
//! state a presentation layer renders.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │           Presentation layer (not in this crate)       │
//! └──────────────┬──────────────────────────▲──────────────┘
//!                │ entry points             │ SessionEvent
//! ┌──────────────▼──────────────────────────┴──────────────┐
//! │  app::Session                                          │
//! │    ├── vault::connection  (wallet state machine)       │
//! │    ├── vault::validation  (verdicts, previews)         │
//! │    ├── vault::lifecycle   (per-slot phases)            │
//! │    └── vault::quote       (share conversions)          │
//! └──────────────┬─────────────────────────────────────────┘
//!                │ Arc<dyn Trait>
//!   WalletProvider · ChainReader · SettlementService
//!                │
//!   services::simulated (demo account, mock vault, fixed latency)
//! ```
//!
//! ## Module Structure
//!
//! - **app**: [`Session`] orchestrator, handlers, session events
//! - **vault**: synchronous domain building blocks plus cancel tokens
//! - **core**: error types and the collaborator traits
//! - **services**: collaborator implementations
//! - **display**: strings the presentation layer shows
//! - **config**: [`ClientConfig`](config::ClientConfig) from environment variables
//! - **debug**: tracing setup and per-action trace ids
//! - **utils**: raw input sanitizing and parsing
//!
//! ## Concurrency
//!
//! Session state sits in `Arc<RwLock<SessionState>>` (parking_lot). Locks are
//! taken briefly and always dropped before an `.await`. Wallet authorization,
//! signing, and confirmation are raced against a cancel token and a timeout.
//!
//! ## Testing
//!
//! ```bash
//! cargo test -p vault-client
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod debug;
pub mod display;
pub mod services;
pub mod utils;
pub mod vault;

// Re-export commonly used types for convenience
pub use app::{Session, SessionEvent};
pub use core::{AppError, Result};
