//! # Transaction Lifecycle
//!
//! Per-slot state machine for one deposit or withdrawal:
//!
//! ```text
//! Idle ──submit──▶ AwaitingSignature ──signed──▶ Submitted(ref) ──confirmed──▶ Settled(receipt)
//!                        │                            │
//!                        └────────── fail ────────────┴──────────────────────▶ Rejected(reason)
//! ```
//!
//! Each [`ActionKind`] owns one [`LifecycleSlot`]. While a slot is in flight a
//! second submit is ignored; from a terminal phase a submit starts a new action.
//! The async driver that walks a slot through these phases lives in
//! [`app::handlers::transaction`](crate::app).

use crate::core::error::{AppError, LifecycleError, Result};
use crate::vault::cancel::CancelToken;
use crate::vault::validation::ParsedAmount;
use shared::{ActionKind, Amount, TransactionReceipt};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LifecyclePhase {
    #[default]
    Idle,
    /// Waiting for the wallet to authorize
    AwaitingSignature,
    /// Broadcast, waiting for confirmation; carries the transaction hash
    Submitted(String),
    Settled(TransactionReceipt),
    Rejected(LifecycleError),
}

impl LifecyclePhase {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, LifecyclePhase::AwaitingSignature | LifecyclePhase::Submitted(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecyclePhase::Settled(_) | LifecyclePhase::Rejected(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            LifecyclePhase::Idle => "idle",
            LifecyclePhase::AwaitingSignature => "awaiting_signature",
            LifecyclePhase::Submitted(_) => "submitted",
            LifecyclePhase::Settled(_) => "settled",
            LifecyclePhase::Rejected(_) => "rejected",
        }
    }
}

/// A submitted deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub kind: ActionKind,
    /// Form text as the user typed it
    pub raw_amount: String,
    pub parsed_amount: ParsedAmount,
    /// Correlates every log line of this action
    pub trace_id: String,
}

impl ActionRequest {
    pub fn amount(&self) -> std::result::Result<Amount, LifecycleError> {
        self.parsed_amount
            .value()
            .filter(|amount| amount.is_positive())
            .ok_or_else(|| LifecycleError::Unknown(format!("unusable amount {:?}", self.raw_amount)))
    }
}

/// An action the wallet has authorized and broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAction {
    /// Transaction hash
    pub reference: String,
    pub request: ActionRequest,
}

impl SignedAction {
    /// Receipt for this action once it is final.
    pub fn receipt(&self, amount: Amount, shares: Amount) -> TransactionReceipt {
        TransactionReceipt {
            kind: self.request.kind,
            amount,
            shares,
            reference: self.reference.clone(),
            settled_at: lib_utils::now_utc(),
        }
    }
}

/// What a call to `Session::submit` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// An action for this slot was already in flight; nothing happened
    Ignored,
    /// The action ran to this terminal phase
    Finished(LifecyclePhase),
}

/// One lifecycle instance per action kind.
#[derive(Debug)]
pub struct LifecycleSlot {
    kind: ActionKind,
    phase: LifecyclePhase,
    request: Option<ActionRequest>,
    cancel: Option<CancelToken>,
}

impl LifecycleSlot {
    pub fn new(kind: ActionKind) -> Self {
        Self { kind, phase: LifecyclePhase::Idle, request: None, cancel: None }
    }

    pub fn phase(&self) -> &LifecyclePhase {
        &self.phase
    }

    pub fn request(&self) -> Option<&ActionRequest> {
        self.request.as_ref()
    }

    /// Start `request`, superseding any terminal action.
    ///
    /// Returns `None` while another action is in flight.
    pub fn begin(&mut self, request: ActionRequest) -> Option<CancelToken> {
        if self.phase.is_in_flight() {
            return None;
        }
        let token = CancelToken::new();
        self.request = Some(request);
        self.cancel = Some(token.clone());
        self.set(LifecyclePhase::AwaitingSignature);
        Some(token)
    }

    /// `AwaitingSignature → Submitted(reference)`
    pub fn signed(&mut self, trace_id: &str, reference: String) -> Result<()> {
        self.expect_current(trace_id)?;
        if self.phase != LifecyclePhase::AwaitingSignature {
            return Err(self.refuse("signed"));
        }
        self.set(LifecyclePhase::Submitted(reference));
        Ok(())
    }

    /// `Submitted → Settled(receipt)`
    pub fn settle(&mut self, trace_id: &str, receipt: TransactionReceipt) -> Result<()> {
        self.expect_current(trace_id)?;
        if !matches!(self.phase, LifecyclePhase::Submitted(_)) {
            return Err(self.refuse("settle"));
        }
        self.cancel = None;
        self.set(LifecyclePhase::Settled(receipt));
        Ok(())
    }

    /// `AwaitingSignature | Submitted → Rejected(reason)`
    pub fn reject(&mut self, trace_id: &str, reason: LifecycleError) -> Result<()> {
        self.expect_current(trace_id)?;
        if !self.phase.is_in_flight() {
            return Err(self.refuse("reject"));
        }
        self.cancel = None;
        self.set(LifecyclePhase::Rejected(reason));
        Ok(())
    }

    /// Return a finished slot to `Idle`. A no-op when already idle.
    pub fn acknowledge(&mut self) -> Result<()> {
        if self.phase.is_in_flight() {
            return Err(self.refuse("acknowledge"));
        }
        self.request = None;
        if self.phase != LifecyclePhase::Idle {
            self.set(LifecyclePhase::Idle);
        }
        Ok(())
    }

    /// Abort the in-flight action. Returns whether there was one.
    pub fn cancel(&self) -> bool {
        match (&self.cancel, self.phase.is_in_flight()) {
            (Some(token), true) => {
                token.cancel();
                true
            }
            _ => false,
        }
    }

    fn expect_current(&self, trace_id: &str) -> Result<()> {
        match &self.request {
            Some(request) if request.trace_id == trace_id => Ok(()),
            _ => Err(AppError::State(format!("action {trace_id} is no longer current"))),
        }
    }

    fn set(&mut self, next: LifecyclePhase) {
        debug!(kind = ?self.kind, from = self.phase.name(), to = next.name(), "Lifecycle transition");
        self.phase = next;
    }

    fn refuse(&self, event: &str) -> AppError {
        AppError::State(format!("cannot {event} a {:?} action while {}", self.kind, self.phase.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(trace_id: &str) -> ActionRequest {
        ActionRequest {
            kind: ActionKind::Deposit,
            raw_amount: "500".to_string(),
            parsed_amount: ParsedAmount::Value(Amount::from_int(500)),
            trace_id: trace_id.to_string(),
        }
    }

    #[test]
    fn test_full_path() {
        let mut slot = LifecycleSlot::new(ActionKind::Deposit);
        assert!(slot.begin(request("a")).is_some());
        assert_eq!(slot.phase(), &LifecyclePhase::AwaitingSignature);

        slot.signed("a", "0xabc".to_string()).unwrap();
        assert_eq!(slot.phase(), &LifecyclePhase::Submitted("0xabc".to_string()));

        let signed = SignedAction { reference: "0xabc".to_string(), request: request("a") };
        let receipt = signed.receipt(Amount::from_int(500), Amount::from_int(493));
        slot.settle("a", receipt.clone()).unwrap();
        assert_eq!(slot.phase(), &LifecyclePhase::Settled(receipt));
        assert!(slot.phase().is_terminal());

        slot.acknowledge().unwrap();
        assert_eq!(slot.phase(), &LifecyclePhase::Idle);
        assert!(slot.request().is_none());
    }

    #[test]
    fn test_begin_while_in_flight_is_ignored() {
        let mut slot = LifecycleSlot::new(ActionKind::Deposit);
        slot.begin(request("a")).unwrap();
        assert!(slot.begin(request("b")).is_none());
        assert_eq!(slot.request().map(|r| r.trace_id.as_str()), Some("a"));
    }

    #[test]
    fn test_terminal_then_new_action() {
        let mut slot = LifecycleSlot::new(ActionKind::Deposit);
        slot.begin(request("a")).unwrap();
        slot.reject("a", LifecycleError::NetworkError("timeout".into())).unwrap();
        assert_eq!(
            slot.phase(),
            &LifecyclePhase::Rejected(LifecycleError::NetworkError("timeout".into()))
        );

        assert!(slot.begin(request("b")).is_some());
        assert_eq!(slot.phase(), &LifecyclePhase::AwaitingSignature);
        assert!(slot.signed("a", "0xold".into()).is_err());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut slot = LifecycleSlot::new(ActionKind::Withdraw);
        assert!(slot.signed("a", "0x1".into()).is_err());
        assert!(slot.reject("a", LifecycleError::UserCancelled).is_err());

        slot.begin(request("a")).unwrap();
        let receipt = SignedAction { reference: "0x1".into(), request: request("a") }
            .receipt(Amount::from_int(1), Amount::from_int(1));
        assert!(matches!(slot.settle("a", receipt), Err(AppError::State(_))));
        assert!(slot.acknowledge().is_err());
        assert_eq!(slot.phase(), &LifecyclePhase::AwaitingSignature);
    }

    #[test]
    fn test_cancel_only_in_flight() {
        let mut slot = LifecycleSlot::new(ActionKind::Deposit);
        assert!(!slot.cancel());
        let token = slot.begin(request("a")).unwrap();
        assert!(slot.cancel());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_request_amount() {
        assert_eq!(request("a").amount(), Ok(Amount::from_int(500)));
        let bad = ActionRequest { parsed_amount: ParsedAmount::Invalid, ..request("a") };
        assert!(matches!(bad.amount(), Err(LifecycleError::Unknown(_))));
    }
}
