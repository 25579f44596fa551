//! # Logging and Tracing Infrastructure
//!
//! - **Structured logs**: `tracing` events at every connection and lifecycle
//!   transition, written to stderr and to `logs/vault-client.log.<date>` (daily rotation)
//! - **Trace IDs**: one per submitted action, attached by the `trace_*!` macros
//! - **Panic hook**: panics are logged with location and the active trace ID
//!
//! ## Usage
//!
//! ```rust,ignore
//! // Initialize at startup, before building a Session
//! vault_client::debug::init();
//!
//! tracing::info!(chain_id = 8453, "Session created");
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (e.g., `vault_client=debug,info`)
//! - `VAULT_LOG_DIR`: Log directory (default: `logs`)
//! - `VAULT_LOG_CONSOLE`: Mirror logs to stderr (1=on, 0=off)

pub mod config;
pub mod logger;
pub mod trace_context;

pub use config::LogConfig;
pub use logger::{init as init_logger, init_with};
pub use trace_context::{get_trace_id, new_trace_id, scope};

/// Initialize logging from the environment
pub fn init() {
    init_logger();
}
