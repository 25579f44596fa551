//! # Service Traits
//!
//! Seams to the collaborators the core does not own. Each is injected into
//! [`Session`](crate::app::Session) as an `Arc<dyn Trait>`, so tests swap in
//! scripted implementations and the demo binary uses
//! [`services::simulated`](crate::services::simulated).

use crate::config::ChainConfig;
use crate::core::error::{AppError, LifecycleError, ProviderError};
use crate::vault::lifecycle::{ActionRequest, SignedAction};
use async_trait::async_trait;
use shared::VaultSnapshot;

/// Injected wallet (EIP-1193 style provider).
///
/// The connection state machine depends only on the success or failure of
/// these calls, never on their transport.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the user to authorize the dapp; returns the selected account.
    async fn request_accounts(&self) -> Result<String, ProviderError>;

    /// Chain the wallet is currently on.
    async fn current_chain_id(&self) -> Result<u64, ProviderError>;

    /// Ask the wallet to switch chains.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError>;

    /// Register a chain the wallet does not know yet.
    async fn add_chain(&self, chain: &ChainConfig) -> Result<(), ProviderError>;
}

/// Read side of the vault contract.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Current quote and vault statistics as seen by `account`.
    async fn fetch_snapshot(&self, account: &str) -> Result<VaultSnapshot, AppError>;
}

/// Signing and settlement of a deposit or withdrawal.
///
/// Both calls are suspension points; the lifecycle controller races them
/// against the action's cancel token and a timeout.
#[async_trait]
pub trait SettlementService: Send + Sync {
    /// Wait for the wallet to authorize and broadcast the action.
    async fn request_signature(&self, request: &ActionRequest) -> Result<SignedAction, LifecycleError>;

    /// Wait for the broadcast transaction to be final.
    async fn await_confirmation(&self, signed: &SignedAction) -> Result<(), LifecycleError>;
}
