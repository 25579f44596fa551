//! # Input Handlers
//!
//! Form input changes and the MAX button.

use crate::app::events::SessionEvent;
use crate::app::state::InputTicket;
use crate::app::Session;
use crate::vault::ValidationVerdict;
use shared::{ActionKind, Amount};
use tracing::debug;

/// Record `raw` and validate it immediately.
pub(crate) fn set_input(session: &Session, kind: ActionKind, raw: &str) -> ValidationVerdict {
    let ticket = begin_input(session, kind, raw);
    complete_input(session, &ticket).unwrap_or_default()
}

/// Record `raw` without validating yet.
pub(crate) fn begin_input(session: &Session, kind: ActionKind, raw: &str) -> InputTicket {
    let ticket = session.state.write().begin_input(kind, raw);
    debug!(kind = ?kind, generation = ticket.generation, "Input changed");
    ticket
}

/// Validate the input behind `ticket`. `None` when a newer input superseded it.
pub(crate) fn complete_input(session: &Session, ticket: &InputTicket) -> Option<ValidationVerdict> {
    let verdict = session.state.write().complete_input(ticket);
    match verdict {
        Some(verdict) => {
            session.events.publish([SessionEvent::ValidationChanged { kind: ticket.kind, verdict: verdict.clone() }]);
            Some(verdict)
        }
        None => {
            debug!(kind = ?ticket.kind, generation = ticket.generation, "Discarded stale verdict");
            None
        }
    }
}

/// Fill the form with the largest amount it can take.
///
/// Deposit uses the wallet balance; withdraw uses the position value
/// truncated to cents so it never exceeds what is withdrawable.
pub(crate) fn fill_max(session: &Session, kind: ActionKind) -> ValidationVerdict {
    let max = {
        let state = session.state.read();
        match (&state.quote, kind) {
            (Some(quote), ActionKind::Deposit) => Some(quote.snapshot().wallet_balance),
            (Some(quote), ActionKind::Withdraw) => Some(truncate_cents(quote.user_value())),
            (None, _) => None,
        }
    };
    let raw = max.map(|amount| amount.to_string()).unwrap_or_default();
    set_input(session, kind, &raw)
}

fn truncate_cents(amount: Amount) -> Amount {
    amount.trunc_dp(2)
}
