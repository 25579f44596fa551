//! # Session Orchestrator
//!
//! A [`Session`] owns all client state and the injected collaborators, and is
//! the only way the presentation layer touches the core.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Presentation layer                         │
//! │   set_input / fill_max / submit / connect / acknowledge     │
//! └───────────────┬───────────────────────────▲─────────────────┘
//!                 │ entry points              │ SessionEvent
//!                 │                           │ (async_channel + callbacks)
//! ┌───────────────▼───────────────────────────┴─────────────────┐
//! │  Session (Clone, cheap)                                     │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │  Handlers                                             │   │
//! │  │  - connection: connect flow, disconnect, refresh      │   │
//! │  │  - input: generations, verdicts, MAX                  │   │
//! │  │  - transaction: lifecycle driver                      │   │
//! │  └────────────┬─────────────────────────────────────────┘   │
//! │  ┌────────────▼─────────────────────────────────────────┐   │
//! │  │  State: Arc<RwLock<SessionState>>                     │   │
//! │  │  - connection machine, quote, forms + slots           │   │
//! │  │  - never locked across an await                       │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! └───────────────┬─────────────────────────────────────────────┘
//!                 │ Arc<dyn Trait>
//!      WalletProvider · ChainReader · SettlementService
//! ```
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shared::ActionKind;
//! use vault_client::app::Session;
//! use vault_client::config::ClientConfig;
//! use vault_client::services::simulated::{SimulatedSettlement, SimulatedWallet, StaticChainReader};
//!
//! # async fn run() -> vault_client::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let session = Session::new(
//!     config.clone(),
//!     Arc::new(SimulatedWallet::new()),
//!     Arc::new(StaticChainReader::demo()),
//!     Arc::new(SimulatedSettlement::from_config(&config)),
//! )?;
//!
//! session.connect().await?;
//! session.set_input(ActionKind::Deposit, "500");
//! let outcome = session.submit(ActionKind::Deposit).await?;
//! # Ok(())
//! # }
//! ```

mod events;
mod handlers;
mod state;

pub use events::{ConnectionCallback, LifecycleCallback, SessionEvent, ValidationCallback};
pub use state::{FormState, InputTicket, SessionState};

use crate::config::ClientConfig;
use crate::core::error::Result;
use crate::core::service::{ChainReader, SettlementService, WalletProvider};
use crate::vault::{ConnectionState, LifecyclePhase, SubmitOutcome, ValidationVerdict};
use async_channel::Receiver;
use events::EventBus;
use parking_lot::RwLock;
use shared::{ActionKind, VaultQuote, VaultStats};
use std::sync::Arc;
use tracing::{debug, info};

/// Client session: state, collaborators, and the event surface.
///
/// Cloning is cheap and every clone drives the same session, so a clone can
/// be moved into a spawned task while another clone keeps reading state.
#[derive(Clone)]
pub struct Session {
    /// Thread-safe shared state.
    ///
    /// **Critical**: hold locks briefly and never across `.await`.
    pub(crate) state: Arc<RwLock<SessionState>>,
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) wallet: Arc<dyn WalletProvider>,
    pub(crate) chain: Arc<dyn ChainReader>,
    pub(crate) settlement: Arc<dyn SettlementService>,
    pub(crate) events: EventBus,
}

impl Session {
    /// Build a session after validating `config`.
    pub fn new(
        config: ClientConfig,
        wallet: Arc<dyn WalletProvider>,
        chain: Arc<dyn ChainReader>,
        settlement: Arc<dyn SettlementService>,
    ) -> Result<Self> {
        config.validate()?;
        info!(chain = %config.chain.name, chain_id = config.chain.chain_id, "Session created");
        Ok(Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            config: Arc::new(config),
            wallet,
            chain,
            settlement,
            events: EventBus::new(),
        })
    }

    // region:    --- Events

    /// Receiver for every [`SessionEvent`] published from now on, in order.
    ///
    /// Each call opens its own channel, so every receiver sees every event.
    /// Drop the receiver to stop queueing for it.
    pub fn events(&self) -> Receiver<SessionEvent> {
        let rx = self.events.receiver();
        debug!(receivers = self.events.subscriber_count(), "Event receiver opened");
        rx
    }

    /// End every open receiver once it has drained what is already queued.
    pub fn close_events(&self) {
        self.events.close();
    }

    pub fn on_connection_change(&self, callback: impl Fn(&ConnectionState) + Send + Sync + 'static) {
        self.events.on_connection_change(Box::new(callback));
    }

    pub fn on_validation_change(
        &self,
        callback: impl Fn(ActionKind, &ValidationVerdict) + Send + Sync + 'static,
    ) {
        self.events.on_validation_change(Box::new(callback));
    }

    pub fn on_lifecycle_change(&self, callback: impl Fn(ActionKind, &LifecyclePhase) + Send + Sync + 'static) {
        self.events.on_lifecycle_change(Box::new(callback));
    }

    // endregion: --- Events

    // region:    --- Getters

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn connection(&self) -> ConnectionState {
        self.state.read().connection.state().clone()
    }

    /// Current snapshot, `None` before the first refresh.
    pub fn quote(&self) -> Option<VaultQuote> {
        self.state.read().quote.as_ref().map(|q| q.snapshot().clone())
    }

    pub fn stats(&self) -> VaultStats {
        self.state.read().stats.clone()
    }

    pub fn verdict(&self, kind: ActionKind) -> ValidationVerdict {
        self.state.read().form(kind).verdict.clone()
    }

    pub fn phase(&self, kind: ActionKind) -> LifecyclePhase {
        self.state.read().form(kind).slot.phase().clone()
    }

    pub fn input(&self, kind: ActionKind) -> String {
        self.state.read().form(kind).raw_input.clone()
    }

    /// Read access for derived values (see [`crate::display`]).
    pub fn with_state<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.state.read())
    }

    // endregion: --- Getters

    // region:    --- Connection

    /// Run the wallet connect flow. Resolves to `Connected` or `ConnectionFailed`;
    /// on `Connected` the vault snapshot is fetched once.
    pub async fn connect(&self) -> Result<ConnectionState> {
        handlers::connection::connect(self).await
    }

    /// Abort a connect in progress; it ends in `ConnectionFailed(UserRejected)`.
    pub fn cancel_connect(&self) -> bool {
        handlers::connection::cancel_connect(self)
    }

    pub fn acknowledge_connection_error(&self) -> Result<()> {
        handlers::connection::acknowledge_connection_error(self)
    }

    pub fn disconnect(&self) -> Result<()> {
        handlers::connection::disconnect(self)
    }

    /// Replace the quote snapshot. An inconsistent quote is refused and the
    /// previous one kept.
    pub fn refresh_quote(&self, quote: VaultQuote) -> Result<()> {
        handlers::connection::refresh_quote(self, quote)
    }

    /// Re-read the vault through the chain reader for the connected account.
    pub async fn refresh_from_chain(&self) -> Result<()> {
        let account = self.connection().address().map(str::to_string);
        match account {
            Some(account) => handlers::connection::refresh_from_chain(self, &account).await,
            None => Err(crate::core::error::AppError::State("wallet is not connected".to_string())),
        }
    }

    // endregion: --- Connection

    // region:    --- Input

    /// Record and validate new form input.
    pub fn set_input(&self, kind: ActionKind, raw: &str) -> ValidationVerdict {
        handlers::input::set_input(self, kind, raw)
    }

    /// Record form input whose verdict will be computed by [`complete_input`](Self::complete_input).
    pub fn begin_input(&self, kind: ActionKind, raw: &str) -> InputTicket {
        handlers::input::begin_input(self, kind, raw)
    }

    /// Compute the verdict for `ticket`; `None` if newer input superseded it.
    pub fn complete_input(&self, ticket: &InputTicket) -> Option<ValidationVerdict> {
        handlers::input::complete_input(self, ticket)
    }

    /// MAX button
    pub fn fill_max(&self, kind: ActionKind) -> ValidationVerdict {
        handlers::input::fill_max(self, kind)
    }

    // endregion: --- Input

    // region:    --- Transactions

    /// Submit the current input and wait for `Settled` or `Rejected`.
    ///
    /// Returns [`SubmitOutcome::Ignored`] if this slot already has an action in
    /// flight, and an error if the wallet is not connected or the input is not valid.
    pub async fn submit(&self, kind: ActionKind) -> Result<SubmitOutcome> {
        handlers::transaction::submit(self, kind).await
    }

    /// Abort the in-flight action; it ends in `Rejected(UserCancelled)`.
    pub fn cancel(&self, kind: ActionKind) -> bool {
        handlers::transaction::cancel(self, kind)
    }

    /// Dismiss a finished action, returning its slot to `Idle`.
    pub fn acknowledge(&self, kind: ActionKind) -> Result<()> {
        handlers::transaction::acknowledge(self, kind)
    }

    // endregion: --- Transactions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{AppError, ConnectionError, LifecycleError};
    use crate::services::simulated::{SimulatedSettlement, SimulatedWallet, StaticChainReader};
    use crate::vault::Severity;
    use shared::Amount;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn config() -> ClientConfig {
        ClientConfig {
            sim_signature_delay: Duration::from_millis(1500),
            sim_confirmation_delay: Duration::from_millis(2000),
            ..ClientConfig::default()
        }
    }

    fn session_with(wallet: SimulatedWallet, settlement: SimulatedSettlement) -> (Session, Arc<StaticChainReader>) {
        let chain = Arc::new(StaticChainReader::demo());
        let session = Session::new(config(), Arc::new(wallet), chain.clone(), Arc::new(settlement)).unwrap();
        (session, chain)
    }

    fn session() -> (Session, Arc<StaticChainReader>) {
        session_with(SimulatedWallet::new(), SimulatedSettlement::from_config(&config()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_fetches_once() {
        let (session, chain) = session();
        let state = session.connect().await.unwrap();

        assert!(state.is_connected());
        assert_eq!(chain.fetch_count(), 1);
        assert!(session.quote().is_some());
        assert_eq!(session.stats().depositors, 312);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_rejected_then_acknowledged() {
        let (session, chain) = session_with(SimulatedWallet::new().rejecting(), SimulatedSettlement::from_config(&config()));
        let state = session.connect().await.unwrap();

        assert_eq!(state, ConnectionState::ConnectionFailed(ConnectionError::UserRejected));
        assert_eq!(chain.fetch_count(), 0);
        session.acknowledge_connection_error().unwrap();
        assert_eq!(session.connection(), ConnectionState::Disconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_timeout_is_unknown() {
        let wallet = SimulatedWallet::new().with_delay(Duration::from_secs(600));
        let (session, _) = session_with(wallet, SimulatedSettlement::from_config(&config()));

        let state = session.connect().await.unwrap();
        assert!(matches!(state, ConnectionState::ConnectionFailed(ConnectionError::Unknown(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_cancel() {
        let wallet = SimulatedWallet::new().with_delay(Duration::from_secs(10));
        let (session, _) = session_with(wallet, SimulatedSettlement::from_config(&config()));

        let runner = session.clone();
        let handle = tokio::spawn(async move { runner.connect().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(session.cancel_connect());

        let state = handle.await.unwrap().unwrap();
        assert_eq!(state, ConnectionState::ConnectionFailed(ConnectionError::UserRejected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_switches_unknown_chain() {
        let wallet = Arc::new(SimulatedWallet::new().on_chain(1).unknown_chain());
        let session = Session::new(
            config(),
            wallet.clone(),
            Arc::new(StaticChainReader::demo()),
            Arc::new(SimulatedSettlement::from_config(&config())),
        )
        .unwrap();

        assert!(session.connect().await.unwrap().is_connected());
        assert_eq!(
            wallet.calls(),
            vec!["request_accounts", "current_chain_id", "switch_chain", "add_chain", "current_chain_id"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_refused_is_wrong_network() {
        let wallet = SimulatedWallet::new().on_chain(1).refusing_switch();
        let (session, _) = session_with(wallet, SimulatedSettlement::from_config(&config()));

        let state = session.connect().await.unwrap();
        assert_eq!(
            state,
            ConnectionState::ConnectionFailed(ConnectionError::WrongNetwork { expected: 8453, actual: 1 })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_requires_connection_and_valid_input() {
        let (session, _) = session();
        session.set_input(ActionKind::Deposit, "500");
        assert!(matches!(session.submit(ActionKind::Deposit).await, Err(AppError::State(_))));

        session.connect().await.unwrap();
        session.set_input(ActionKind::Deposit, "5");
        match session.submit(ActionKind::Deposit).await {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "minimum deposit is 10 USDC"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(session.phase(ActionKind::Deposit), LifecyclePhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deposit_settles_and_clears_input() {
        let (session, _) = session();
        session.connect().await.unwrap();
        let before = session.quote().unwrap();

        let phases = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let seen = phases.clone();
        session.on_lifecycle_change(move |_, phase| seen.lock().push(phase.name()));

        session.set_input(ActionKind::Deposit, "500");
        let outcome = session.submit(ActionKind::Deposit).await.unwrap();

        let receipt = match outcome {
            SubmitOutcome::Finished(LifecyclePhase::Settled(receipt)) => receipt,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(receipt.shares.to_fixed(4), "493.2912");
        assert!(receipt.reference.starts_with("0x"));
        assert_eq!(*phases.lock(), vec!["awaiting_signature", "submitted", "settled"]);

        let after = session.quote().unwrap();
        assert_eq!(after.user_shares, before.user_shares.checked_add(receipt.shares).unwrap());
        assert_eq!(after.deposit_cap_used, before.deposit_cap_used.checked_add(Amount::from_int(500)).unwrap());
        assert_eq!(after.wallet_balance, before.wallet_balance.saturating_sub(Amount::from_int(500)));

        assert_eq!(session.input(ActionKind::Deposit), "");
        assert_eq!(session.verdict(ActionKind::Deposit), ValidationVerdict::empty());

        session.acknowledge(ActionKind::Deposit).unwrap();
        assert_eq!(session.phase(ActionKind::Deposit), LifecyclePhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_is_ignored() {
        let (session, _) = session();
        session.connect().await.unwrap();
        session.set_input(ActionKind::Deposit, "500");

        let runner = session.clone();
        let first = tokio::spawn(async move { runner.submit(ActionKind::Deposit).await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(session.phase(ActionKind::Deposit), LifecyclePhase::AwaitingSignature);

        assert_eq!(session.submit(ActionKind::Deposit).await.unwrap(), SubmitOutcome::Ignored);
        assert!(matches!(
            first.await.unwrap().unwrap(),
            SubmitOutcome::Finished(LifecyclePhase::Settled(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_in_flight() {
        let (session, _) = session();
        session.connect().await.unwrap();
        let before = session.quote();
        session.set_input(ActionKind::Withdraw, "100");

        let runner = session.clone();
        let handle = tokio::spawn(async move { runner.submit(ActionKind::Withdraw).await });
        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert!(matches!(session.phase(ActionKind::Withdraw), LifecyclePhase::Submitted(_)));
        assert!(session.cancel(ActionKind::Withdraw));

        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome, SubmitOutcome::Finished(LifecyclePhase::Rejected(LifecycleError::UserCancelled)));
        assert_eq!(session.quote(), before);
        assert_eq!(session.input(ActionKind::Withdraw), "100");
    }

    #[tokio::test(start_paused = true)]
    async fn test_signature_timeout_is_network_error() {
        let config = ClientConfig { signature_timeout: Duration::from_secs(2), ..config() };
        let settlement = SimulatedSettlement::new(Duration::from_secs(30), Duration::from_millis(10));
        let session = Session::new(
            config,
            Arc::new(SimulatedWallet::new()),
            Arc::new(StaticChainReader::demo()),
            Arc::new(settlement),
        )
        .unwrap();
        session.connect().await.unwrap();
        session.set_input(ActionKind::Deposit, "50");

        match session.submit(ActionKind::Deposit).await.unwrap() {
            SubmitOutcome::Finished(LifecyclePhase::Rejected(LifecycleError::NetworkError(msg))) => {
                assert!(msg.contains("signature timed out"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_quote_moved_underneath_rejects() {
        let (session, _) = session();
        session.connect().await.unwrap();
        session.set_input(ActionKind::Deposit, "500");

        let runner = session.clone();
        let handle = tokio::spawn(async move { runner.submit(ActionKind::Deposit).await });
        tokio::time::sleep(Duration::from_millis(100)).await;

        let mut full = session.quote().unwrap();
        full.deposit_cap_used = full.deposit_cap;
        session.refresh_quote(full.clone()).unwrap();
        assert_eq!(session.verdict(ActionKind::Deposit).severity, Severity::Warning);

        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome, SubmitOutcome::Finished(LifecyclePhase::Rejected(LifecycleError::CapExceeded)));
        assert_eq!(session.quote(), Some(full));
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_callback_and_stale_ticket() {
        let (session, _) = session();
        session.connect().await.unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        session.on_validation_change(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let stale = session.begin_input(ActionKind::Deposit, "1");
        let fresh = session.begin_input(ActionKind::Deposit, "20000");
        assert_eq!(session.complete_input(&stale), None);
        let verdict = session.complete_input(&fresh).unwrap();

        assert!(verdict.message.starts_with("insufficient wallet balance"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fill_max() {
        let (session, _) = session();
        session.connect().await.unwrap();

        assert!(session.fill_max(ActionKind::Deposit).is_valid);
        assert_eq!(session.input(ActionKind::Deposit), "12450");

        let verdict = session.fill_max(ActionKind::Withdraw);
        assert!(verdict.is_valid);
        assert_eq!(session.input(ActionKind::Withdraw), "12450.52");
    }

    #[tokio::test(start_paused = true)]
    async fn test_callbacks_alone_queue_nothing() {
        let (session, _) = session();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        session.on_validation_change(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        session.connect().await.unwrap();
        for _ in 0..10_000 {
            session.set_input(ActionKind::Deposit, "500");
        }

        assert!(calls.load(Ordering::SeqCst) >= 10_000);
        assert_eq!(session.events.subscriber_count(), 0);
        assert!(session.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_rules() {
        let (session, _) = session();
        assert!(matches!(session.disconnect(), Err(AppError::State(_))));
        session.connect().await.unwrap();
        session.disconnect().unwrap();
        assert_eq!(session.connection(), ConnectionState::Disconnected);
        assert!(session.refresh_from_chain().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_while_submitted_cancels() {
        let (session, _) = session();
        session.connect().await.unwrap();
        let before = session.quote();
        session.set_input(ActionKind::Deposit, "500");

        let runner = session.clone();
        let handle = tokio::spawn(async move { runner.submit(ActionKind::Deposit).await });
        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert!(matches!(session.phase(ActionKind::Deposit), LifecyclePhase::Submitted(_)));

        session.disconnect().unwrap();

        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome, SubmitOutcome::Finished(LifecyclePhase::Rejected(LifecycleError::UserCancelled)));
        assert_eq!(session.phase(ActionKind::Deposit), LifecyclePhase::Rejected(LifecycleError::UserCancelled));
        assert_eq!(session.quote(), before);
        assert_eq!(session.connection(), ConnectionState::Disconnected);
    }
}
