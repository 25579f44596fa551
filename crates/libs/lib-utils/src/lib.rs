//! # Utilities Library
//!
//! Shared utility functions for environment variables and time.

pub mod envs;
pub mod time;

// Re-export commonly used functions
pub use envs::{get_env, get_env_flag, get_env_or, get_env_parse};
pub use time::{elapsed_ms, format_time, now_utc, parse_utc};
