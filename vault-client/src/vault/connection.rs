//! # Connection State Machine
//!
//! Tracks whether a wallet is connected and which account is active. Deposit
//! and withdraw are only enabled while [`ConnectionState::Connected`].
//!
//! ```text
//!                 request                 authorized(addr)
//! Disconnected ────────────▶ Connecting ───────────────────▶ Connected(addr)
//!      ▲                       │    ▲                              │
//!      │ acknowledge           │    │ request (retry)              │ disconnect
//!      │               rejected│    │                              │
//!      └──── ConnectionFailed ◀┘    └──── ConnectionFailed         ▼
//!                                                             Disconnected
//! ```
//!
//! Any other transition is refused with [`AppError::State`] and leaves the
//! machine untouched.

use crate::core::error::{AppError, ConnectionError, Result};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    /// Active account address, never empty
    Connected(String),
    ConnectionFailed(ConnectionError),
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            ConnectionState::Connected(address) => Some(address),
            _ => None,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected(_) => "connected",
            ConnectionState::ConnectionFailed(_) => "failed",
        }
    }
}

/// Holds the current [`ConnectionState`] and applies transitions.
#[derive(Debug, Default)]
pub struct ConnectionMachine {
    state: ConnectionState,
}

impl ConnectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// `Disconnected | ConnectionFailed → Connecting`
    pub fn request(&mut self) -> Result<()> {
        match self.state {
            ConnectionState::Disconnected | ConnectionState::ConnectionFailed(_) => {
                self.set(ConnectionState::Connecting);
                Ok(())
            }
            _ => Err(self.refuse("request")),
        }
    }

    /// `Connecting → Connected(address)`.
    ///
    /// An empty address is treated as a failed attempt. Returns the state that
    /// was entered.
    pub fn authorized(&mut self, address: impl Into<String>) -> Result<&ConnectionState> {
        if self.state != ConnectionState::Connecting {
            return Err(self.refuse("authorized"));
        }
        let address = address.into();
        if address.trim().is_empty() {
            warn!("Wallet authorized an empty account");
            self.set(ConnectionState::ConnectionFailed(ConnectionError::Unknown(
                "wallet returned no account".to_string(),
            )));
        } else {
            self.set(ConnectionState::Connected(address));
        }
        Ok(&self.state)
    }

    /// `Connecting → ConnectionFailed(reason)`
    pub fn rejected(&mut self, reason: ConnectionError) -> Result<()> {
        if self.state != ConnectionState::Connecting {
            return Err(self.refuse("rejected"));
        }
        self.set(ConnectionState::ConnectionFailed(reason));
        Ok(())
    }

    /// `ConnectionFailed → Disconnected`
    pub fn acknowledge(&mut self) -> Result<()> {
        match self.state {
            ConnectionState::ConnectionFailed(_) => {
                self.set(ConnectionState::Disconnected);
                Ok(())
            }
            _ => Err(self.refuse("acknowledge")),
        }
    }

    /// `Connected → Disconnected`
    pub fn disconnect(&mut self) -> Result<()> {
        match self.state {
            ConnectionState::Connected(_) => {
                self.set(ConnectionState::Disconnected);
                Ok(())
            }
            _ => Err(self.refuse("disconnect")),
        }
    }

    fn set(&mut self, next: ConnectionState) {
        debug!(from = self.state.name(), to = next.name(), "Connection transition");
        self.state = next;
    }

    fn refuse(&self, event: &str) -> AppError {
        AppError::State(format!("cannot {event} while {}", self.state.name()))
    }
}
