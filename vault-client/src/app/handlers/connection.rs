//! # Connection Handlers
//!
//! Wallet connect flow, disconnect, and quote refreshes.

use crate::app::events::SessionEvent;
use crate::app::Session;
use crate::config::ChainConfig;
use crate::core::error::{AppError, ConnectionError, ProviderError, Result};
use crate::core::service::WalletProvider;
use crate::vault::{guard, CancelToken, ConnectionState, Interrupted};
use shared::VaultQuote;
use tracing::{error, info, warn};

/// Run the connect flow to a terminal connection state.
///
/// Internal handler function - use [`Session::connect`] instead.
pub(crate) async fn connect(session: &Session) -> Result<ConnectionState> {
    let cancel = CancelToken::new();
    {
        let mut state = session.state.write();
        state.connection.request()?;
        state.connect_cancel = Some(cancel.clone());
    } // Drop the lock guard before await
    session.events.publish([SessionEvent::ConnectionChanged(ConnectionState::Connecting)]);
    info!(chain_id = session.config.chain.chain_id, "Connecting wallet");

    let limit = session.config.connect_timeout;
    let outcome = match guard(&cancel, limit, authorize(session.wallet.as_ref(), &session.config.chain)).await {
        Ok(result) => result,
        Err(Interrupted::Cancelled) => Err(ConnectionError::UserRejected),
        Err(Interrupted::TimedOut) => Err(ConnectionError::Unknown(format!(
            "wallet did not respond within {}ms",
            limit.as_millis()
        ))),
    };

    let entered = {
        let mut state = session.state.write();
        state.connect_cancel = None;
        match outcome {
            Ok(address) => {
                state.connection.authorized(address)?;
            }
            Err(reason) => state.connection.rejected(reason)?,
        }
        state.connection.state().clone()
    };
    session.events.publish([SessionEvent::ConnectionChanged(entered.clone())]);

    match &entered {
        ConnectionState::Connected(address) => {
            info!(address = %address, "Wallet connected");
            if let Err(e) = refresh_from_chain(session, address).await {
                error!(error = %e, "Initial vault refresh failed");
            }
        }
        ConnectionState::ConnectionFailed(reason) => {
            warn!(reason = %reason, "Wallet connection failed");
        }
        _ => {}
    }

    Ok(entered)
}

/// Provider calls of the connect flow. Returns the authorized account.
async fn authorize(
    wallet: &dyn WalletProvider,
    chain: &ChainConfig,
) -> std::result::Result<String, ConnectionError> {
    let address = wallet.request_accounts().await?;

    let current = wallet.current_chain_id().await?;
    if current == chain.chain_id {
        return Ok(address);
    }

    info!(current, target = %chain.chain_id_hex(), "Switching wallet network");
    let wrong_network = |actual| ConnectionError::WrongNetwork { expected: chain.chain_id, actual };
    match wallet.switch_chain(chain.chain_id).await {
        Ok(()) => Ok(address),
        Err(ProviderError::UnrecognizedChain(_)) => {
            info!(chain = %chain.name, "Wallet does not know the chain, adding it");
            wallet.add_chain(chain).await?;
            let now = wallet.current_chain_id().await?;
            if now == chain.chain_id {
                Ok(address)
            } else {
                Err(wrong_network(now))
            }
        }
        Err(ProviderError::Unavailable) => Err(ConnectionError::NoProvider),
        Err(e) => {
            warn!(error = %e, "Network switch refused");
            Err(wrong_network(current))
        }
    }
}

/// Abort a connect in progress. Returns whether one was running.
pub(crate) fn cancel_connect(session: &Session) -> bool {
    let state = session.state.read();
    match (&state.connect_cancel, state.connection.state()) {
        (Some(token), ConnectionState::Connecting) => {
            token.cancel();
            true
        }
        _ => false,
    }
}

/// `ConnectionFailed → Disconnected`
pub(crate) fn acknowledge_connection_error(session: &Session) -> Result<()> {
    let entered = {
        let mut state = session.state.write();
        state.connection.acknowledge()?;
        state.connection.state().clone()
    };
    session.events.publish([SessionEvent::ConnectionChanged(entered)]);
    Ok(())
}

/// Explicit disconnect. In-flight actions are cancelled.
pub(crate) fn disconnect(session: &Session) -> Result<()> {
    let entered = {
        let mut state = session.state.write();
        state.connection.disconnect()?;
        for kind in shared::ActionKind::all() {
            if state.form(*kind).slot.cancel() {
                info!(kind = ?kind, "Cancelling in-flight action on disconnect");
            }
        }
        state.connection.state().clone()
    };
    info!("Wallet disconnected");
    session.events.publish([SessionEvent::ConnectionChanged(entered)]);
    Ok(())
}

/// Replace the quote snapshot, re-validating both forms.
pub(crate) fn refresh_quote(session: &Session, quote: VaultQuote) -> Result<()> {
    let events = session.state.write().replace_quote(quote)?;
    session.events.publish(events);
    Ok(())
}

/// Fetch a snapshot for `account` and apply it.
pub(crate) async fn refresh_from_chain(session: &Session, account: &str) -> Result<()> {
    let snapshot = session.chain.fetch_snapshot(account).await?;
    let events = {
        let mut state = session.state.write();
        if state.connection.state().address() != Some(account) {
            return Err(AppError::State(format!("account {account} is no longer connected")));
        }
        state.apply_snapshot(snapshot)?
    };
    info!(account = %account, "Vault snapshot refreshed");
    session.events.publish(events);
    Ok(())
}
