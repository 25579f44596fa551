//! # Simulated Collaborators
//!
//! In-process stand-ins for the wallet, the vault contract, and settlement.
//! They reproduce the demo front-end: a fixed demo account, mock vault data,
//! and fixed signature/confirmation latency. Builder knobs script failures
//! for tests.

use crate::config::{ChainConfig, ClientConfig};
use crate::core::error::{AppError, LifecycleError, ProviderError};
use crate::core::service::{ChainReader, SettlementService, WalletProvider};
use crate::vault::lifecycle::{ActionRequest, SignedAction};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use chrono::NaiveDate;
use shared::{Allocation, Amount, UserEarnings, VaultQuote, VaultSnapshot, VaultStats};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Demo account used by the simulated wallet
pub const DEMO_ACCOUNT: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18";

const BASE_CHAIN_ID: u64 = 8453;

// region:    --- Wallet

/// Scriptable injected-wallet stand-in.
#[derive(Debug)]
pub struct SimulatedWallet {
    account: String,
    chain_id: Mutex<u64>,
    known_chains: Mutex<Vec<u64>>,
    accounts_error: Option<ProviderError>,
    refuse_switch: bool,
    delay: Duration,
    calls: Mutex<Vec<&'static str>>,
}

impl SimulatedWallet {
    /// Demo account, already on Base.
    pub fn new() -> Self {
        Self {
            account: DEMO_ACCOUNT.to_string(),
            chain_id: Mutex::new(BASE_CHAIN_ID),
            known_chains: Mutex::new(vec![1, BASE_CHAIN_ID]),
            accounts_error: None,
            refuse_switch: false,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    /// Start on another chain.
    pub fn on_chain(self, chain_id: u64) -> Self {
        *self.chain_id.lock() = chain_id;
        self
    }

    /// The user dismisses the authorization prompt.
    pub fn rejecting(mut self) -> Self {
        self.accounts_error = Some(ProviderError::UserRejected);
        self
    }

    /// No provider is injected.
    pub fn without_provider(mut self) -> Self {
        self.accounts_error = Some(ProviderError::Unavailable);
        self
    }

    /// The target chain must be added before switching to it.
    pub fn unknown_chain(self) -> Self {
        self.known_chains.lock().retain(|id| *id != BASE_CHAIN_ID);
        self
    }

    /// The user declines the network switch.
    pub fn refusing_switch(mut self) -> Self {
        self.refuse_switch = true;
        self
    }

    /// Latency before the authorization prompt resolves.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Provider methods called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    fn record(&self, call: &'static str) {
        debug!(call, "Simulated wallet call");
        self.calls.lock().push(call);
    }
}

impl Default for SimulatedWallet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletProvider for SimulatedWallet {
    async fn request_accounts(&self) -> Result<String, ProviderError> {
        self.record("request_accounts");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.accounts_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.account.clone()),
        }
    }

    async fn current_chain_id(&self) -> Result<u64, ProviderError> {
        self.record("current_chain_id");
        Ok(*self.chain_id.lock())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        self.record("switch_chain");
        if self.refuse_switch {
            return Err(ProviderError::UserRejected);
        }
        if !self.known_chains.lock().contains(&chain_id) {
            return Err(ProviderError::UnrecognizedChain(chain_id));
        }
        *self.chain_id.lock() = chain_id;
        Ok(())
    }

    async fn add_chain(&self, chain: &ChainConfig) -> Result<(), ProviderError> {
        self.record("add_chain");
        self.known_chains.lock().push(chain.chain_id);
        // Wallets switch to a chain right after adding it.
        *self.chain_id.lock() = chain.chain_id;
        Ok(())
    }
}

// endregion: --- Wallet

// region:    --- Settlement

/// Settlement with fixed latency and a random transaction hash.
#[derive(Debug, Clone)]
pub struct SimulatedSettlement {
    signature_delay: Duration,
    confirmation_delay: Duration,
    signature_error: Option<LifecycleError>,
    confirmation_error: Option<LifecycleError>,
}

impl SimulatedSettlement {
    pub fn new(signature_delay: Duration, confirmation_delay: Duration) -> Self {
        Self { signature_delay, confirmation_delay, signature_error: None, confirmation_error: None }
    }

    /// Latency from `VAULT_SIM_SIGNATURE_DELAY_MS` / `VAULT_SIM_CONFIRMATION_DELAY_MS`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.sim_signature_delay, config.sim_confirmation_delay)
    }

    /// Fail the signature step with `error` after the usual delay.
    pub fn failing_signature(mut self, error: LifecycleError) -> Self {
        self.signature_error = Some(error);
        self
    }

    /// Fail the confirmation step with `error` after the usual delay.
    pub fn failing_confirmation(mut self, error: LifecycleError) -> Self {
        self.confirmation_error = Some(error);
        self
    }
}

/// `0x` plus 32 random bytes in hex, shaped like an EVM transaction hash.
fn random_tx_hash() -> String {
    let bytes: [u8; 32] = rand::random();
    format!("0x{}", hex::encode(bytes))
}

#[async_trait]
impl SettlementService for SimulatedSettlement {
    async fn request_signature(&self, request: &ActionRequest) -> Result<SignedAction, LifecycleError> {
        tokio::time::sleep(self.signature_delay).await;
        if let Some(err) = &self.signature_error {
            return Err(err.clone());
        }
        Ok(SignedAction { reference: random_tx_hash(), request: request.clone() })
    }

    async fn await_confirmation(&self, _signed: &SignedAction) -> Result<(), LifecycleError> {
        tokio::time::sleep(self.confirmation_delay).await;
        match &self.confirmation_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

// endregion: --- Settlement

// region:    --- Chain Reader

/// Serves a fixed snapshot and counts reads.
#[derive(Debug)]
pub struct StaticChainReader {
    snapshot: RwLock<Option<VaultSnapshot>>,
    fetches: AtomicUsize,
}

impl StaticChainReader {
    pub fn new(snapshot: VaultSnapshot) -> Self {
        Self { snapshot: RwLock::new(Some(snapshot)), fetches: AtomicUsize::new(0) }
    }

    /// Reader whose every fetch fails.
    pub fn unavailable() -> Self {
        Self { snapshot: RwLock::new(None), fetches: AtomicUsize::new(0) }
    }

    /// Mock vault data of the demo front-end.
    pub fn demo() -> Self {
        Self::new(demo_snapshot())
    }

    pub fn set_snapshot(&self, snapshot: VaultSnapshot) {
        *self.snapshot.write() = Some(snapshot);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainReader for StaticChainReader {
    async fn fetch_snapshot(&self, account: &str) -> Result<VaultSnapshot, AppError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        debug!(account, "Simulated vault read");
        self.snapshot
            .read()
            .clone()
            .ok_or_else(|| AppError::Chain("vault contract unreachable".to_string()))
    }
}

fn strategy(name: &str, pct: i64, balance: i64, apy: Amount, address: Option<&str>) -> Allocation {
    Allocation {
        name: name.to_string(),
        pct: Amount::from_int(pct),
        balance: Amount::from_int(balance),
        apy,
        address: address.map(str::to_string),
    }
}

/// Demo vault: $2.1M TVL, 8.4% APY, 1.0136 share price, four strategies.
pub fn demo_snapshot() -> VaultSnapshot {
    VaultSnapshot {
        quote: VaultQuote {
            share_price: Amount::new(10_136, 4),
            deposit_cap: Amount::from_int(1_000_000),
            deposit_cap_used: Amount::from_int(200_000),
            min_deposit: Amount::from_int(10),
            wallet_balance: Amount::from_int(12_450),
            user_shares: Amount::new(1_228_347, 2),
        },
        stats: VaultStats {
            tvl: Amount::from_int(2_100_000),
            net_apy: Amount::new(84, 1),
            depositors: 312,
            yield_paid: Amount::from_int(180_000),
            vault_address: Some("0x1234...5678".to_string()),
            allocations: vec![
                strategy("Aave V3", 32, 1_340_000, Amount::new(68, 1), Some("0xaaaa...bbbb")),
                strategy("Morpho Blue", 45, 1_890_000, Amount::new(82, 1), Some("0xcccc...dddd")),
                strategy("Aerodrome", 18, 630_000, Amount::new(75, 1), Some("0xeeee...ffff")),
                strategy("Idle Buffer", 5, 340_000, Amount::ZERO, None),
            ],
            earnings: NaiveDate::from_ymd_opt(2026, 1, 12).map(|first_deposit| UserEarnings {
                earned: Amount::new(16_420, 2),
                earned_pct: Amount::new(132, 2),
                first_deposit,
            }),
        },
    }
}

// endregion: --- Chain Reader

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::ParsedAmount;
    use shared::ActionKind;

    #[test]
    fn test_demo_snapshot_is_consistent() {
        let snapshot = demo_snapshot();
        assert!(snapshot.quote.check().is_ok());
        assert_eq!(snapshot.quote.share_price.to_string(), "1.0136");
        assert_eq!(snapshot.quote.user_shares.to_string(), "12283.47");
        assert_eq!(snapshot.stats.net_apy.to_string(), "8.4");

        let weights: i64 = [32, 45, 18, 5].iter().sum();
        let total = snapshot
            .stats
            .allocations
            .iter()
            .try_fold(Amount::ZERO, |sum, a| sum.checked_add(a.pct))
            .unwrap();
        assert_eq!(total, Amount::from_int(weights));
        assert_eq!(snapshot.stats.earnings.unwrap().earned.to_string(), "164.2");
    }

    #[test]
    fn test_tx_hash_shape() {
        let hash = random_tx_hash();
        assert_eq!(hash.len(), 66);
        assert!(hash.starts_with("0x"));
        assert!(hash[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_wallet_and_reader_knobs() {
        let wallet = SimulatedWallet::new().with_account("0xabc");
        assert_eq!(wallet.request_accounts().await, Ok("0xabc".to_string()));
        assert_eq!(wallet.current_chain_id().await, Ok(BASE_CHAIN_ID));
        assert_eq!(wallet.calls(), vec!["request_accounts", "current_chain_id"]);

        let reader = StaticChainReader::demo();
        let mut richer = demo_snapshot();
        richer.quote.wallet_balance = Amount::from_int(50_000);
        reader.set_snapshot(richer.clone());
        assert_eq!(reader.fetch_snapshot("0xabc").await.unwrap(), richer);
        assert_eq!(reader.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settlement_latency() {
        let settlement = SimulatedSettlement::new(Duration::from_millis(1500), Duration::from_millis(2000));
        let request = ActionRequest {
            kind: ActionKind::Deposit,
            raw_amount: "500".into(),
            parsed_amount: ParsedAmount::Value(Amount::from_int(500)),
            trace_id: "t".into(),
        };

        let start = tokio::time::Instant::now();
        let signed = settlement.request_signature(&request).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
        settlement.await_confirmation(&signed).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(3500));
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let settlement = SimulatedSettlement::new(Duration::ZERO, Duration::ZERO)
            .failing_confirmation(LifecycleError::InsufficientFunds);
        let request = ActionRequest {
            kind: ActionKind::Withdraw,
            raw_amount: "1".into(),
            parsed_amount: ParsedAmount::Value(Amount::from_int(1)),
            trace_id: "t".into(),
        };
        let signed = settlement.request_signature(&request).await.unwrap();
        assert_eq!(settlement.await_confirmation(&signed).await, Err(LifecycleError::InsufficientFunds));

        let settlement = SimulatedSettlement::new(Duration::ZERO, Duration::ZERO)
            .failing_signature(LifecycleError::UserCancelled);
        assert_eq!(settlement.request_signature(&request).await, Err(LifecycleError::UserCancelled));

        let wallet = SimulatedWallet::new().without_provider();
        assert_eq!(wallet.request_accounts().await, Err(ProviderError::Unavailable));

        let reader = StaticChainReader::unavailable();
        assert!(reader.fetch_snapshot(DEMO_ACCOUNT).await.is_err());
        assert_eq!(reader.fetch_count(), 1);
    }
}
