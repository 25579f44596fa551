//! Console and file logging initialization

use super::config::LogConfig;
use std::fs;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging system
///
/// Sets up:
/// - Daily log rotation in `VAULT_LOG_DIR` through a non-blocking writer
/// - An optional stderr layer for interactive runs
/// - An `EnvFilter` from `RUST_LOG`
/// - Panic hook integration for crash logging
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init() {
    init_with(LogConfig::from_env());
}

/// Initialize logging from an explicit configuration
pub fn init_with(config: LogConfig) {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("vault_client=info,warn"));

    let console_layer = config.console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .boxed()
    });

    // Without a log directory the client still runs, console-only.
    let file_layer = match fs::create_dir_all(&config.log_dir) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::daily(&config.log_dir, &config.file_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the guard alive for the lifetime of the program
            std::mem::forget(guard);

            Some(
                fmt::layer()
                    .with_writer(non_blocking)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .boxed(),
            )
        }
        Err(e) => {
            eprintln!("Warning: Failed to create log directory: {}", e);
            None
        }
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if !installed {
        return;
    }

    tracing::info!(
        log_dir = %config.log_dir.display(),
        log_level = %config.log_level,
        console = config.console,
        debug = config.is_debug_enabled(),
        "Logging initialized"
    );

    setup_panic_hook();
}

/// Set up panic hook to log panics with location and trace ID
fn setup_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic message".to_string()
        };

        let backtrace = std::backtrace::Backtrace::capture();

        match super::trace_context::get_trace_id() {
            Some(trace_id) => tracing::error!(
                trace_id = %trace_id,
                location = %location,
                message = %message,
                "Application panic"
            ),
            None => tracing::error!(location = %location, message = %message, "Application panic"),
        }
        tracing::error!(backtrace = %backtrace, "Panic backtrace");

        default_panic(panic_info);
    }));
}
