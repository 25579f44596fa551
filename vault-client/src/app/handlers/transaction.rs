//! # Transaction Handlers
//!
//! Drives one deposit or withdrawal through its lifecycle slot:
//! guard checks, signature, confirmation, settlement.
//!
//! Each suspension point is raced against the slot's cancel token and its
//! configured timeout, so every action ends in exactly one terminal phase.

use crate::app::events::SessionEvent;
use crate::app::state::SessionState;
use crate::app::Session;
use crate::core::error::{AppError, LifecycleError, Result};
use crate::debug::trace_context;
use crate::utils::validation::parse_amount;
use crate::vault::{guard, ActionRequest, CancelToken, Interrupted, LifecyclePhase, SignedAction, SubmitOutcome};
use crate::{trace_debug, trace_info, trace_warn};
use shared::{ActionKind, TransactionReceipt};
use std::time::Duration;
use tracing::{error, info, Instrument};

/// Submit the current input of `kind` and wait for a terminal phase.
///
/// Internal handler function - use [`Session::submit`] instead.
pub(crate) async fn submit(session: &Session, kind: ActionKind) -> Result<SubmitOutcome> {
    let trace_id = trace_context::new_trace_id();

    let (request, cancel) = {
        let mut state = session.state.write();

        if state.form(kind).slot.phase().is_in_flight() {
            return Ok(SubmitOutcome::Ignored);
        }
        if !state.connection.state().is_connected() {
            return Err(AppError::State("wallet is not connected".to_string()));
        }

        // Re-check against the quote as it is now, not as it was on the last keystroke.
        let raw = state.form(kind).raw_input.clone();
        let verdict = state.verdict_for(kind, &raw);
        if !verdict.is_valid {
            let reason = if verdict.message.is_empty() {
                "enter an amount".to_string()
            } else {
                verdict.message
            };
            return Err(AppError::Validation(reason));
        }

        let request = ActionRequest {
            kind,
            parsed_amount: parse_amount(&raw),
            raw_amount: raw,
            trace_id: trace_id.clone(),
        };
        match state.form_mut(kind).slot.begin(request.clone()) {
            Some(cancel) => (request, cancel),
            None => return Ok(SubmitOutcome::Ignored),
        }
    }; // Drop the lock guard before await

    session.events.publish([SessionEvent::LifecycleChanged {
        kind,
        phase: LifecyclePhase::AwaitingSignature,
    }]);

    let started = lib_utils::now_utc();
    let span = tracing::info_span!("action", kind = ?kind, trace_id = %trace_id);
    let phase = trace_context::scope(trace_id.clone(), drive(session, request, cancel))
        .instrument(span)
        .await;

    info!(
        kind = ?kind,
        trace_id = %trace_id,
        phase = phase.name(),
        elapsed_ms = lib_utils::elapsed_ms(started, lib_utils::now_utc()),
        "Action finished"
    );
    Ok(SubmitOutcome::Finished(phase))
}

async fn drive(session: &Session, request: ActionRequest, cancel: CancelToken) -> LifecyclePhase {
    let config = &session.config;
    trace_info!(amount = %request.raw_amount, "Awaiting wallet signature");

    let limit = config.signature_timeout;
    let signed = match guard(&cancel, limit, session.settlement.request_signature(&request)).await {
        Ok(Ok(signed)) => signed,
        Ok(Err(reason)) => return reject(session, &request, reason),
        Err(interrupted) => return reject(session, &request, interrupted_reason(interrupted, "signature", limit)),
    };

    let reference = signed.reference.clone();
    let submitted = transition(session, &request, |state| {
        state
            .form_mut(request.kind)
            .slot
            .signed(&request.trace_id, reference.clone())?;
        Ok(vec![SessionEvent::LifecycleChanged {
            kind: request.kind,
            phase: LifecyclePhase::Submitted(reference.clone()),
        }])
    });
    if !submitted {
        return current_phase(session, request.kind);
    }
    trace_info!(reference = %signed.reference, "Transaction submitted");

    let limit = config.confirmation_timeout;
    match guard(&cancel, limit, session.settlement.await_confirmation(&signed)).await {
        Ok(Ok(())) => settle(session, &signed),
        Ok(Err(reason)) => reject(session, &request, reason),
        Err(interrupted) => reject(session, &request, interrupted_reason(interrupted, "confirmation", limit)),
    }
}

enum Settlement {
    Settled(Vec<SessionEvent>),
    /// The quote can no longer absorb the action
    Refused(LifecycleError),
    /// The slot moved on (or never reached `Submitted`)
    Stale(AppError),
}

/// Fold the confirmed action into the quote, then publish `Settled`.
fn settle(session: &Session, signed: &SignedAction) -> LifecyclePhase {
    let request = &signed.request;
    let outcome = settle_locked(&mut session.state.write(), signed);

    match outcome {
        Settlement::Settled(events) => {
            session.events.publish(events);
            let phase = current_phase(session, request.kind);
            if let LifecyclePhase::Settled(receipt) = &phase {
                trace_info!(
                    amount = %receipt.amount,
                    shares = %receipt.shares,
                    settled_at = %lib_utils::format_time(receipt.settled_at),
                    "Transaction settled"
                );
            }
            phase
        }
        Settlement::Refused(reason) => reject(session, request, reason),
        Settlement::Stale(e) => {
            error!(error = %e, "Settlement could not be recorded");
            current_phase(session, request.kind)
        }
    }
}

/// Record `Settled` and clear the form. Events come out in publish order:
/// quote first, then the phase, then the re-validated forms.
fn settle_locked(state: &mut SessionState, signed: &SignedAction) -> Settlement {
    let request = &signed.request;
    let kind = request.kind;

    let slot = &state.form(kind).slot;
    let current = slot.request().is_some_and(|r| r.trace_id == request.trace_id);
    if !current || !matches!(slot.phase(), LifecyclePhase::Submitted(_)) {
        return Settlement::Stale(AppError::State(format!(
            "action {} is not awaiting settlement",
            request.trace_id
        )));
    }

    let receipt = match apply_to_quote(state, signed) {
        Ok(receipt) => receipt,
        Err(reason) => return Settlement::Refused(reason),
    };

    let mut events = Vec::new();
    if let Some(quote) = &state.quote {
        events.push(SessionEvent::QuoteChanged(quote.snapshot().clone()));
    }
    if let Err(e) = state.form_mut(kind).slot.settle(&request.trace_id, receipt.clone()) {
        return Settlement::Stale(e);
    }
    events.push(SessionEvent::LifecycleChanged { kind, phase: LifecyclePhase::Settled(receipt) });

    let ticket = state.begin_input(kind, "");
    if let Some(verdict) = state.complete_input(&ticket) {
        events.push(SessionEvent::ValidationChanged { kind, verdict });
    }
    events.extend(state.revalidate_all());
    Settlement::Settled(events)
}

/// Apply the receipt to the quote. Leaves the quote untouched on failure.
fn apply_to_quote(
    state: &mut SessionState,
    signed: &SignedAction,
) -> std::result::Result<TransactionReceipt, LifecycleError> {
    let amount = signed.request.amount()?;
    let quote = state
        .quote
        .as_mut()
        .ok_or_else(|| LifecycleError::Unknown("no vault quote loaded".to_string()))?;

    let shares = quote
        .share_delta(signed.request.kind, amount)
        .ok_or_else(|| LifecycleError::Unknown("share amount out of range".to_string()))?;
    let receipt = signed.receipt(amount, shares);
    quote.apply_receipt(&receipt)?;
    Ok(receipt)
}

fn reject(session: &Session, request: &ActionRequest, reason: LifecycleError) -> LifecyclePhase {
    trace_warn!(reason = %reason, "Transaction rejected");
    let rejected = transition(session, request, |state| {
        state
            .form_mut(request.kind)
            .slot
            .reject(&request.trace_id, reason.clone())?;
        Ok(vec![SessionEvent::LifecycleChanged {
            kind: request.kind,
            phase: LifecyclePhase::Rejected(reason.clone()),
        }])
    });
    if !rejected {
        trace_debug!("Rejection dropped, action no longer current");
    }
    current_phase(session, request.kind)
}

/// Apply a slot transition under the write lock and publish its events.
fn transition<F>(session: &Session, request: &ActionRequest, apply: F) -> bool
where
    F: FnOnce(&mut SessionState) -> Result<Vec<SessionEvent>>,
{
    let outcome = apply(&mut session.state.write());
    match outcome {
        Ok(events) => {
            session.events.publish(events);
            true
        }
        Err(e) => {
            error!(kind = ?request.kind, error = %e, "Lifecycle transition refused");
            false
        }
    }
}

fn interrupted_reason(interrupted: Interrupted, stage: &str, limit: Duration) -> LifecycleError {
    match interrupted {
        Interrupted::Cancelled => LifecycleError::UserCancelled,
        Interrupted::TimedOut => {
            LifecycleError::NetworkError(format!("{stage} timed out after {}ms", limit.as_millis()))
        }
    }
}

fn current_phase(session: &Session, kind: ActionKind) -> LifecyclePhase {
    session.state.read().form(kind).slot.phase().clone()
}

/// Abort the in-flight action of `kind`. Returns whether one was running.
pub(crate) fn cancel(session: &Session, kind: ActionKind) -> bool {
    session.state.read().form(kind).slot.cancel()
}

/// Return a finished slot to `Idle`.
pub(crate) fn acknowledge(session: &Session, kind: ActionKind) -> Result<()> {
    let changed = {
        let mut state = session.state.write();
        let slot = &mut state.form_mut(kind).slot;
        let was_idle = slot.phase() == &LifecyclePhase::Idle;
        slot.acknowledge()?;
        !was_idle
    };
    if changed {
        session.events.publish([SessionEvent::LifecycleChanged { kind, phase: LifecyclePhase::Idle }]);
    }
    Ok(())
}
