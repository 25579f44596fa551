//! Cancellation handle for in-flight suspension points.
//!
//! A [`CancelToken`] is a `watch` channel flag: cloning shares the flag,
//! [`CancelToken::cancel`] flips it once, and [`CancelToken::cancelled`] resolves
//! for every clone. It is raced against wallet prompts and settlement waits with
//! `tokio::select!` through [`guard`].

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

/// Why a guarded step did not produce its own output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    Cancelled,
    TimedOut,
}

/// Run `step` until it completes, `cancel` fires, or `limit` elapses.
///
/// Cancellation wins ties so an abort that raced a late reply is honoured.
pub async fn guard<F>(cancel: &CancelToken, limit: Duration, step: F) -> Result<F::Output, Interrupted>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Interrupted::Cancelled),
        outcome = tokio::time::timeout(limit, step) => outcome.map_err(|_| Interrupted::TimedOut),
    }
}

#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: watch::Sender<bool>,
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx, rx }
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancel_wakes_clones() {
        let token = CancelToken::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });

        assert!(!token.is_cancelled());
        token.cancel();
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_after_the_fact() {
        let token = CancelToken::new();
        token.cancel();
        tokio::time::timeout(Duration::from_millis(50), token.cancelled())
            .await
            .expect("already cancelled token resolves immediately");
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_outcomes() {
        let token = CancelToken::new();

        let done = guard(&token, Duration::from_secs(1), async { 7 }).await;
        assert_eq!(done, Ok(7));

        let slow = guard(&token, Duration::from_secs(1), tokio::time::sleep(Duration::from_secs(5))).await;
        assert_eq!(slow, Err(Interrupted::TimedOut));

        token.cancel();
        let cancelled = guard(&token, Duration::from_secs(1), async { 7 }).await;
        assert_eq!(cancelled, Err(Interrupted::Cancelled));
    }
}
