//! # Core Abstractions
//!
//! Error types and service traits shared by every other module.
//!
//! ## Modules
//!
//! - **[`error`]**: Error taxonomy (`ConnectionError`, `LifecycleError`, `AppError`, `Result<T>`)
//! - **[`service`]**: Collaborator traits for dependency injection
//!   (`WalletProvider`, `ChainReader`, `SettlementService`)
//!
//! ## Dependency Injection
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vault_client::core::service::{ChainReader, SettlementService, WalletProvider};
//!
//! // In production: real implementations
//! let wallet: Arc<dyn WalletProvider> = Arc::new(InjectedWallet::detect()?);
//!
//! // In tests: scripted implementations
//! let wallet: Arc<dyn WalletProvider> = Arc::new(SimulatedWallet::default());
//! ```

pub mod error;
pub mod service;

pub use error::{AppError, ConnectionError, LifecycleError, ProviderError, Result};
pub use service::{ChainReader, SettlementService, WalletProvider};
