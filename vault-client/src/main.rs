//! # Yield Vault Client - Demo Binary
//!
//! Drives a [`Session`] against the simulated collaborators: connect the demo
//! wallet, deposit 500 USDC, then withdraw 100 USDC, printing what a
//! front-end would render along the way.
//!
//! ```bash
//! RUST_LOG=vault_client=debug cargo run --bin vault-client
//! ```

use shared::ActionKind;
use std::sync::Arc;
use tracing::{info, warn};
use vault_client::app::{Session, SessionEvent};
use vault_client::config::ClientConfig;
use vault_client::display::{
    action_button_label, wallet_button_label, DepositPanel, PortfolioPanel, PreviewText, TxResult, VaultInfoPanel,
    WithdrawPanel,
};
use vault_client::services::simulated::{SimulatedSettlement, SimulatedWallet, StaticChainReader};
use vault_client::vault::{ConnectionState, LifecyclePhase, SubmitOutcome};

#[tokio::main(flavor = "current_thread")]
async fn main() -> vault_client::Result<()> {
    vault_client::debug::init();

    let config = ClientConfig::from_env()?;
    let session = Session::new(
        config.clone(),
        Arc::new(SimulatedWallet::new()),
        Arc::new(StaticChainReader::demo()),
        Arc::new(SimulatedSettlement::from_config(&config)),
    )?;

    let events = session.events();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            print_event(&event);
        }
    });

    println!("[wallet] {}", wallet_button_label(&session.connection()));
    if let ConnectionState::ConnectionFailed(reason) = session.connect().await? {
        warn!(reason = %reason, "Demo wallet did not connect");
        println!("{}", reason.message());
        return Ok(());
    }
    println!("[wallet] {}", wallet_button_label(&session.connection()));
    print_vault_info(&session);
    print_panels(&session);

    run_action(&session, ActionKind::Deposit, "500").await?;
    print_panels(&session);

    run_action(&session, ActionKind::Withdraw, "100").await?;
    print_panels(&session);

    session.disconnect()?;
    println!("[wallet] {}", wallet_button_label(&session.connection()));

    // The printer exits once it has drained everything already queued.
    session.close_events();
    if let Err(e) = printer.await {
        warn!(error = %e, "Event printer failed");
    }
    info!("Demo finished");
    Ok(())
}

async fn run_action(session: &Session, kind: ActionKind, amount: &str) -> vault_client::Result<()> {
    let verdict = session.set_input(kind, amount);
    let preview = PreviewText::new(kind, &verdict);
    println!("\n[{}] {amount} USDC -> {}", kind.label(), preview.shares);
    if let Some(receive) = preview.receive {
        println!("[{}] receive {receive}", kind.label());
    }
    if !verdict.message.is_empty() {
        println!("[{}] {}", kind.label(), verdict.message);
    }

    match session.submit(kind).await? {
        SubmitOutcome::Ignored => println!("[{}] already in flight", kind.label()),
        SubmitOutcome::Finished(phase) => {
            if let Some(result) = TxResult::from_phase(kind, &phase, &session.config().chain) {
                println!("[{}] {}", kind.label(), result.title);
                println!("[{}] {}", kind.label(), result.detail);
                if let Some(url) = result.explorer_url {
                    println!("[{}] {url}", kind.label());
                }
            }
            if let LifecyclePhase::Settled(receipt) = &phase {
                match serde_json::to_string(receipt) {
                    Ok(json) => println!("[{}] receipt {json}", kind.label()),
                    Err(e) => warn!(error = %e, "Could not serialize receipt"),
                }
            }
            session.acknowledge(kind)?;
        }
    }
    Ok(())
}

fn print_panels(session: &Session) {
    let stats = session.stats();
    session.with_state(|state| {
        let Some(quote) = state.quote.as_ref() else {
            println!("[vault] no quote yet");
            return;
        };
        let deposit = DepositPanel::new(quote, &stats);
        let portfolio = PortfolioPanel::new(quote, &stats);
        let withdraw = WithdrawPanel::new(quote);

        println!("\n[deposit] {}", deposit.wallet_balance);
        println!("[deposit] {} | APY {}", deposit.share_price, deposit.apy);
        println!("[deposit] {}", deposit.cap_info);
        println!(
            "[portfolio] {} | {} | share of TVL {}",
            portfolio.value, portfolio.shares, portfolio.share_of_tvl
        );
        if let (Some(earned), Some(since)) = (&portfolio.earned, &portfolio.since) {
            println!("[portfolio] {earned} {since}");
        }
        println!("[withdraw] {} {}", withdraw.available, withdraw.breakdown);
    });
}

fn print_vault_info(session: &Session) {
    let info = VaultInfoPanel::new(&session.stats());
    println!(
        "\n[vault] TVL {} | APY {} | {} depositors | {} yield paid",
        info.tvl, info.apy, info.depositors, info.yield_paid
    );
    if let Some(address) = &info.vault_address {
        println!("[vault] contract {address}");
    }
    for item in &info.allocation {
        println!("[vault]   {:<12} {:>4} {:>7} APY {}", item.name, item.pct, item.balance, item.apy);
    }
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::ConnectionChanged(state) => println!("  ~ connection: {}", state.name()),
        SessionEvent::LifecycleChanged { kind, phase } => {
            println!("  ~ {}: {} ({})", kind.label(), phase.name(), action_button_label(*kind, phase))
        }
        SessionEvent::QuoteChanged(quote) => println!("  ~ quote: {} shares", quote.user_shares),
        SessionEvent::StatsChanged(stats) => println!("  ~ stats: {} depositors", stats.depositors),
        SessionEvent::ValidationChanged { .. } => {}
    }
}
