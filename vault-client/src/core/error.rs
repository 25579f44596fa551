//! # Common Error Types
//!
//! Consolidated error handling for the vault client core.
//!
//! ## Error Categories
//!
//! - **[`ConnectionError`]**: Wallet connection failures. Recoverable, the user may retry.
//! - **[`LifecycleError`]**: Why a submitted deposit/withdraw ended in `Rejected`.
//!   Terminal for that action only; later actions are unaffected.
//! - **[`ProviderError`]**: Raw wallet-provider outcomes, mapped into [`ConnectionError`].
//! - **[`AppError`]**: Everything an entry point can return, including invalid state
//!   transitions, blocked submissions and configuration problems.
//!
//! Input problems are never errors: the validation engine reports them as
//! [`ValidationVerdict`](crate::vault::validation::ValidationVerdict) values.
//!
//! ## Usage Pattern
//!
//! ```rust
//! use vault_client::core::error::{AppError, ConnectionError};
//!
//! let err: AppError = ConnectionError::UserRejected.into();
//! assert_eq!(err.to_string(), "Connection error: connection was cancelled");
//! ```

use crate::vault::validation::Severity;
use thiserror::Error;

/// Reasons a wallet connection attempt ends in `ConnectionFailed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// The user dismissed the wallet prompt (EIP-1193 code 4001) or aborted the attempt.
    #[error("connection was cancelled")]
    UserRejected,

    /// No injected wallet provider is available.
    #[error("no wallet provider detected")]
    NoProvider,

    /// The wallet is on a different chain and could not be switched.
    #[error("wallet is on chain {actual}, expected chain {expected}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// Anything else, including timeouts.
    #[error("connection failed: {0}")]
    Unknown(String),
}

impl ConnectionError {
    /// Message shown in the wallet modal
    pub fn message(&self) -> String {
        match self {
            ConnectionError::UserRejected => "Connection was cancelled. Try again?".to_string(),
            ConnectionError::NoProvider => {
                "No wallet detected. Please install a wallet and try again.".to_string()
            }
            ConnectionError::WrongNetwork { .. } => {
                "Please switch your wallet to the supported network.".to_string()
            }
            ConnectionError::Unknown(_) => "Could not connect. Please try again.".to_string(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ConnectionError::UserRejected => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Reasons a submitted action ends in `Rejected`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The user declined the signature or aborted while pending.
    #[error("transaction cancelled by user")]
    UserCancelled,

    /// The wallet or vault position no longer covers the amount.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Broadcast or confirmation failed, including timeouts.
    #[error("network error: {0}")]
    NetworkError(String),

    /// Settling would push the vault past its deposit cap.
    #[error("deposit cap exceeded")]
    CapExceeded,

    #[error("transaction failed: {0}")]
    Unknown(String),
}

impl LifecycleError {
    /// Message shown in the transaction result panel
    pub fn message(&self) -> String {
        match self {
            LifecycleError::UserCancelled => "Transaction cancelled.".to_string(),
            LifecycleError::InsufficientFunds => {
                "Insufficient funds to complete this transaction.".to_string()
            }
            LifecycleError::NetworkError(_) => {
                "Network error. The transaction was not confirmed.".to_string()
            }
            LifecycleError::CapExceeded => "This transaction would exceed the vault cap.".to_string(),
            LifecycleError::Unknown(_) => "Transaction failed. Please try again.".to_string(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            LifecycleError::UserCancelled => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Wallet provider failures, before they are classified for the connection machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// User rejected the request (EIP-1193 code 4001)
    #[error("user rejected the request")]
    UserRejected,

    /// The wallet does not know the requested chain (EIP-3326 code 4902)
    #[error("unrecognized chain {0}")]
    UnrecognizedChain(u64),

    /// No provider is injected
    #[error("provider unavailable")]
    Unavailable,

    #[error("provider error: {0}")]
    Other(String),
}

impl ProviderError {
    /// Map an EIP-1193 error code to a provider error.
    pub fn from_code(code: i64, message: impl Into<String>, chain_id: u64) -> Self {
        match code {
            4001 => ProviderError::UserRejected,
            4902 => ProviderError::UnrecognizedChain(chain_id),
            _ => ProviderError::Other(message.into()),
        }
    }
}

impl From<ProviderError> for ConnectionError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UserRejected => ConnectionError::UserRejected,
            ProviderError::Unavailable => ConnectionError::NoProvider,
            ProviderError::UnrecognizedChain(id) => {
                ConnectionError::Unknown(format!("chain {id} is not recognized by the wallet"))
            }
            ProviderError::Other(msg) => ConnectionError::Unknown(msg),
        }
    }
}

/// Application-wide error type returned by session entry points.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Invalid state transition (e.g. disconnecting while not connected)
    #[error("State error: {0}")]
    State(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chain reader failure or an inconsistent snapshot
    #[error("Chain error: {0}")]
    Chain(String),

    /// Submission attempted while the form's verdict does not allow it
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<lib_utils::envs::Error> for AppError {
    fn from(err: lib_utils::envs::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
