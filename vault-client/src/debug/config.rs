//! Logging configuration from environment variables

use lib_utils::envs::{get_env, get_env_flag};
use std::path::PathBuf;

const DEFAULT_FILTER: &str = "vault_client=info,warn";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log directory (for rotation)
    pub log_dir: PathBuf,
    /// File name prefix inside `log_dir`
    pub file_prefix: String,
    /// Log level filter (e.g., "vault_client=debug,info")
    pub log_level: String,
    /// Mirror logs to stderr
    pub console: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            file_prefix: "vault-client.log".to_string(),
            log_level: DEFAULT_FILTER.to_string(),
            console: true,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    ///
    /// - `VAULT_LOG_DIR`: log directory (default `logs`)
    /// - `RUST_LOG`: filter (default `vault_client=info,warn`)
    /// - `VAULT_LOG_CONSOLE`: `1`/`0`, mirror to stderr (default on)
    ///
    /// A malformed `VAULT_LOG_CONSOLE` falls back to the default; logging has
    /// to come up before anything can report the problem.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_dir: get_env("VAULT_LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
            file_prefix: defaults.file_prefix,
            log_level: get_env("RUST_LOG").unwrap_or(defaults.log_level),
            console: get_env_flag("VAULT_LOG_CONSOLE", defaults.console).unwrap_or(defaults.console),
        }
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.log_level, "vault_client=info,warn");
        assert!(config.console);
        assert!(!config.is_debug_enabled());
    }

    #[test]
    fn test_debug_detection() {
        let config = LogConfig { log_level: "vault_client=debug".into(), ..LogConfig::default() };
        assert!(config.is_debug_enabled());
    }
}
