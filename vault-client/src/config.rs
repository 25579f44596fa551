//! # Client Configuration
//!
//! Settings loaded from environment variables and validated on startup so a
//! misconfigured client fails fast instead of hanging at a suspension point.
//!
//! Unlike a process-wide singleton, a [`ClientConfig`] is handed to each
//! [`Session`](crate::app::Session), so independent sessions (and tests) can
//! run with different settings side by side.
//!
//! | Variable | Default |
//! |---|---|
//! | `VAULT_CHAIN_ID` | `8453` (Base) |
//! | `VAULT_CHAIN_NAME` | `Base` |
//! | `VAULT_RPC_URL` | `https://mainnet.base.org` |
//! | `VAULT_EXPLORER_URL` | `https://basescan.org` |
//! | `VAULT_CONNECT_TIMEOUT_MS` | `60000` |
//! | `VAULT_SIGNATURE_TIMEOUT_MS` | `120000` |
//! | `VAULT_CONFIRMATION_TIMEOUT_MS` | `180000` |
//! | `VAULT_SIM_SIGNATURE_DELAY_MS` | `1500` |
//! | `VAULT_SIM_CONFIRMATION_DELAY_MS` | `2000` |

use crate::core::error::{AppError, Result};
use lib_utils::envs::{get_env_or, get_env};
use std::time::Duration;

/// Target chain parameters, also used to register the chain with a wallet
/// that does not know it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    pub native_symbol: String,
    pub native_decimals: u8,
}

impl ChainConfig {
    /// Base mainnet
    pub fn base() -> Self {
        Self {
            chain_id: 8453,
            name: "Base".to_string(),
            rpc_url: "https://mainnet.base.org".to_string(),
            explorer_url: "https://basescan.org".to_string(),
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
        }
    }

    /// Chain id as the `0x`-prefixed hex string wallets expect.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Block explorer link for a transaction hash.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub chain: ChainConfig,

    /// Upper bound for the whole connect flow
    pub connect_timeout: Duration,

    /// Upper bound for `AwaitingSignature`
    pub signature_timeout: Duration,

    /// Upper bound for `Submitted`
    pub confirmation_timeout: Duration,

    /// Signature latency of the simulated settlement service
    pub sim_signature_delay: Duration,

    /// Confirmation latency of the simulated settlement service
    pub sim_confirmation_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::base(),
            connect_timeout: Duration::from_secs(60),
            signature_timeout: Duration::from_secs(120),
            confirmation_timeout: Duration::from_secs(180),
            sim_signature_delay: Duration::from_millis(1500),
            sim_confirmation_delay: Duration::from_millis(2000),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, defaulting anything unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let chain = ChainConfig {
            chain_id: get_env_or("VAULT_CHAIN_ID", defaults.chain.chain_id)?,
            name: get_env("VAULT_CHAIN_NAME").unwrap_or(defaults.chain.name),
            rpc_url: get_env("VAULT_RPC_URL").unwrap_or(defaults.chain.rpc_url),
            explorer_url: get_env("VAULT_EXPLORER_URL").unwrap_or(defaults.chain.explorer_url),
            native_symbol: defaults.chain.native_symbol,
            native_decimals: defaults.chain.native_decimals,
        };

        let config = Self {
            chain,
            connect_timeout: millis("VAULT_CONNECT_TIMEOUT_MS", defaults.connect_timeout)?,
            signature_timeout: millis("VAULT_SIGNATURE_TIMEOUT_MS", defaults.signature_timeout)?,
            confirmation_timeout: millis(
                "VAULT_CONFIRMATION_TIMEOUT_MS",
                defaults.confirmation_timeout,
            )?,
            sim_signature_delay: millis("VAULT_SIM_SIGNATURE_DELAY_MS", defaults.sim_signature_delay)?,
            sim_confirmation_delay: millis(
                "VAULT_SIM_CONFIRMATION_DELAY_MS",
                defaults.sim_confirmation_delay,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.chain.name.trim().is_empty() {
            return Err(AppError::Config("VAULT_CHAIN_NAME must not be empty".to_string()));
        }
        if self.chain.chain_id == 0 {
            return Err(AppError::Config("VAULT_CHAIN_ID must be non-zero".to_string()));
        }
        for (name, timeout) in [
            ("VAULT_CONNECT_TIMEOUT_MS", self.connect_timeout),
            ("VAULT_SIGNATURE_TIMEOUT_MS", self.signature_timeout),
            ("VAULT_CONFIRMATION_TIMEOUT_MS", self.confirmation_timeout),
        ] {
            if timeout.is_zero() {
                return Err(AppError::Config(format!("{name} must be greater than 0")));
            }
        }
        Ok(())
    }
}

fn millis(name: &'static str, default: Duration) -> Result<Duration> {
    let ms: u64 = get_env_or(name, default.as_millis() as u64)?;
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chain.chain_id_hex(), "0x2105");
    }

    #[test]
    fn test_tx_url() {
        let chain = ChainConfig { explorer_url: "https://basescan.org/".into(), ..ChainConfig::base() };
        assert_eq!(chain.tx_url("0xabc"), "https://basescan.org/tx/0xabc");
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ClientConfig { signature_timeout: Duration::ZERO, ..ClientConfig::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("VAULT_SIGNATURE_TIMEOUT_MS"));
    }

    #[test]
    fn test_validate_rejects_bad_chain() {
        let config = ClientConfig {
            chain: ChainConfig { chain_id: 0, ..ChainConfig::base() },
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }
}
