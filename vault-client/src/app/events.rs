//! # Session Events
//!
//! Everything the presentation layer needs to re-render, delivered two ways:
//! over `async_channel` receivers (pull) and through registered callbacks
//! (push). Events are published after the state lock is released, so
//! callbacks may call back into the session's getters.
//!
//! Each receiver gets its own channel, opened on request. Nothing is queued
//! while no receiver exists, and a dropped receiver's channel is pruned on
//! the next publish.

use crate::vault::{ConnectionState, LifecyclePhase, ValidationVerdict};
use async_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use shared::{ActionKind, VaultQuote, VaultStats};
use std::sync::Arc;
use tracing::trace;

/// State changes published by a [`Session`](crate::app::Session)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ConnectionChanged(ConnectionState),
    /// New quote from a refresh or a settlement
    QuoteChanged(VaultQuote),
    StatsChanged(VaultStats),
    ValidationChanged { kind: ActionKind, verdict: ValidationVerdict },
    LifecycleChanged { kind: ActionKind, phase: LifecyclePhase },
}

pub type ConnectionCallback = Box<dyn Fn(&ConnectionState) + Send + Sync>;
pub type ValidationCallback = Box<dyn Fn(ActionKind, &ValidationVerdict) + Send + Sync>;
pub type LifecycleCallback = Box<dyn Fn(ActionKind, &LifecyclePhase) + Send + Sync>;

#[derive(Default)]
struct Observers {
    connection: Vec<ConnectionCallback>,
    validation: Vec<ValidationCallback>,
    lifecycle: Vec<LifecycleCallback>,
}

/// Per-receiver channels plus callback registry.
#[derive(Clone, Default)]
pub(crate) struct EventBus {
    subscribers: Arc<Mutex<Vec<Sender<SessionEvent>>>>,
    observers: Arc<RwLock<Observers>>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Open a channel that sees every event published from now on.
    pub(crate) fn receiver(&self) -> Receiver<SessionEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Drop every sender so receivers end once drained.
    pub(crate) fn close(&self) {
        self.subscribers.lock().clear();
    }

    pub(crate) fn on_connection_change(&self, callback: ConnectionCallback) {
        self.observers.write().connection.push(callback);
    }

    pub(crate) fn on_validation_change(&self, callback: ValidationCallback) {
        self.observers.write().validation.push(callback);
    }

    pub(crate) fn on_lifecycle_change(&self, callback: LifecycleCallback) {
        self.observers.write().lifecycle.push(callback);
    }

    /// Publish in order. Must not be called while holding the session state lock.
    pub(crate) fn publish(&self, events: impl IntoIterator<Item = SessionEvent>) {
        for event in events {
            self.notify(&event);
            trace!(?event, "Session event");
            // Unbounded, so a send only fails once the receiver is gone.
            self.subscribers
                .lock()
                .retain(|tx| tx.try_send(event.clone()).is_ok());
        }
    }

    fn notify(&self, event: &SessionEvent) {
        let observers = self.observers.read();
        match event {
            SessionEvent::ConnectionChanged(state) => {
                observers.connection.iter().for_each(|cb| cb(state));
            }
            SessionEvent::ValidationChanged { kind, verdict } => {
                observers.validation.iter().for_each(|cb| cb(*kind, verdict));
            }
            SessionEvent::LifecycleChanged { kind, phase } => {
                observers.lifecycle.iter().for_each(|cb| cb(*kind, phase));
            }
            SessionEvent::QuoteChanged(_) | SessionEvent::StatsChanged(_) => {}
        }
    }
}
