//! Trace ID system for correlating one action's logs across await points
//!
//! Every submitted deposit or withdrawal gets a fresh trace id. The driver
//! runs inside [`scope`], so anything it logs through the `trace_*!` macros
//! carries the id, even when several actions interleave on one thread.

use std::future::Future;
use uuid::Uuid;

tokio::task_local! {
    static TRACE_ID: String;
}

/// Generate a new trace ID
pub fn new_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Trace ID of the current task, if it runs inside [`scope`]
pub fn get_trace_id() -> Option<String> {
    TRACE_ID.try_with(|id| id.clone()).ok()
}

/// Run `fut` with `trace_id` as the task's trace context
pub async fn scope<F>(trace_id: String, fut: F) -> F::Output
where
    F: Future,
{
    let id = trace_id.clone();
    let output = TRACE_ID.scope(trace_id, fut).await;
    tracing::debug!(trace_id = %id, "Trace context completed");
    output
}

/// Macro to include trace ID in log messages
#[macro_export]
macro_rules! trace_info {
    ($($arg:tt)*) => {
        if let Some(trace_id) = $crate::debug::trace_context::get_trace_id() {
            tracing::info!(trace_id = %trace_id, $($arg)*);
        } else {
            tracing::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! trace_warn {
    ($($arg:tt)*) => {
        if let Some(trace_id) = $crate::debug::trace_context::get_trace_id() {
            tracing::warn!(trace_id = %trace_id, $($arg)*);
        } else {
            tracing::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! trace_debug {
    ($($arg:tt)*) => {
        if let Some(trace_id) = $crate::debug::trace_context::get_trace_id() {
            tracing::debug!(trace_id = %trace_id, $($arg)*);
        } else {
            tracing::debug!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scope_sets_and_clears() {
        assert_eq!(get_trace_id(), None);

        let id = new_trace_id();
        let seen = scope(id.clone(), async {
            tokio::task::yield_now().await;
            get_trace_id()
        })
        .await;

        assert_eq!(seen, Some(id));
        assert_eq!(get_trace_id(), None);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        assert_ne!(new_trace_id(), new_trace_id());
    }
}
