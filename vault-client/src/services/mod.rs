//! # Services Module
//!
//! Implementations of the collaborator traits in [`crate::core::service`].
//!
//! ## Module Overview
//!
//! ```text
//! services/
//! └── simulated.rs - In-process wallet, chain reader, and settlement
//!                    (demo account, mock vault data, fixed latency)
//! ```
//!
//! ## Service Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       Session                           │
//! │                                                         │
//! │  Arc<dyn WalletProvider>  Arc<dyn ChainReader>          │
//! │  Arc<dyn SettlementService>                             │
//! └───────────┬──────────────────────┬──────────────────────┘
//!             │                      │
//!             ▼                      ▼
//! ┌─────────────────────┐  ┌───────────────────────────────┐
//! │  SimulatedWallet    │  │  StaticChainReader            │
//! │  - demo account     │  │  - mock vault snapshot        │
//! │  - chain switching  │  │                               │
//! └─────────────────────┘  │  SimulatedSettlement          │
//!                          │  - 1500ms signature           │
//!                          │  - 2000ms confirmation        │
//!                          └───────────────────────────────┘
//! ```
//!
//! A browser build would add an EIP-1193 provider next to `simulated`; the
//! session only sees the traits.

pub mod simulated;

pub use simulated::{SimulatedSettlement, SimulatedWallet, StaticChainReader};
