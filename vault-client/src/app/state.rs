//! # Session State Types
//!
//! Everything a [`Session`](crate::app::Session) mutates, behind one
//! `Arc<RwLock<SessionState>>`. Methods here are synchronous and return the
//! events to publish; callers publish only after dropping the lock.

use crate::app::events::SessionEvent;
use crate::core::error::Result;
use crate::utils::validation::parse_amount;
use crate::vault::{
    validate, CancelToken, ConnectionMachine, LifecycleSlot, QuoteModel, ValidationVerdict,
};
use shared::{ActionKind, VaultQuote, VaultSnapshot, VaultStats};

/// Deposit or withdraw form: raw input, its verdict, and the action slot.
#[derive(Debug)]
pub struct FormState {
    pub raw_input: String,
    /// Bumped on every input change; verdicts for older generations are dropped
    pub generation: u64,
    pub verdict: ValidationVerdict,
    pub slot: LifecycleSlot,
}

impl FormState {
    fn new(kind: ActionKind) -> Self {
        Self {
            raw_input: String::new(),
            generation: 0,
            verdict: ValidationVerdict::empty(),
            slot: LifecycleSlot::new(kind),
        }
    }
}

/// Handle for an input change whose verdict is computed later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTicket {
    pub kind: ActionKind,
    pub generation: u64,
}

#[derive(Debug)]
pub struct SessionState {
    pub connection: ConnectionMachine,
    /// `None` until the first snapshot arrives
    pub quote: Option<QuoteModel>,
    pub stats: VaultStats,
    deposit: FormState,
    withdraw: FormState,
    /// Cancels the connect flow while `Connecting`
    pub(crate) connect_cancel: Option<CancelToken>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            connection: ConnectionMachine::new(),
            quote: None,
            stats: VaultStats::default(),
            deposit: FormState::new(ActionKind::Deposit),
            withdraw: FormState::new(ActionKind::Withdraw),
            connect_cancel: None,
        }
    }
}

impl SessionState {
    pub fn form(&self, kind: ActionKind) -> &FormState {
        match kind {
            ActionKind::Deposit => &self.deposit,
            ActionKind::Withdraw => &self.withdraw,
        }
    }

    pub fn form_mut(&mut self, kind: ActionKind) -> &mut FormState {
        match kind {
            ActionKind::Deposit => &mut self.deposit,
            ActionKind::Withdraw => &mut self.withdraw,
        }
    }

    /// Verdict for `raw` against the current quote.
    pub fn verdict_for(&self, kind: ActionKind, raw: &str) -> ValidationVerdict {
        match &self.quote {
            Some(quote) => validate(kind, parse_amount(raw), quote),
            None => ValidationVerdict::empty(),
        }
    }

    /// Record a new raw input and bump the form's generation.
    pub(crate) fn begin_input(&mut self, kind: ActionKind, raw: &str) -> InputTicket {
        let form = self.form_mut(kind);
        form.raw_input = raw.to_string();
        form.generation += 1;
        InputTicket { kind, generation: form.generation }
    }

    /// Store the verdict for `ticket` unless a newer input superseded it.
    pub(crate) fn complete_input(&mut self, ticket: &InputTicket) -> Option<ValidationVerdict> {
        if self.form(ticket.kind).generation != ticket.generation {
            return None;
        }
        let verdict = self.verdict_for(ticket.kind, &self.form(ticket.kind).raw_input);
        self.form_mut(ticket.kind).verdict = verdict.clone();
        Some(verdict)
    }

    /// Recompute the current input's verdict; an event only if it changed.
    pub(crate) fn revalidate(&mut self, kind: ActionKind) -> Option<SessionEvent> {
        let verdict = self.verdict_for(kind, &self.form(kind).raw_input);
        let form = self.form_mut(kind);
        if form.verdict == verdict {
            return None;
        }
        form.verdict = verdict.clone();
        Some(SessionEvent::ValidationChanged { kind, verdict })
    }

    pub(crate) fn revalidate_all(&mut self) -> Vec<SessionEvent> {
        ActionKind::all().iter().filter_map(|kind| self.revalidate(*kind)).collect()
    }

    /// Atomically swap in `quote`; the previous quote survives a failed check.
    pub(crate) fn replace_quote(&mut self, quote: VaultQuote) -> Result<Vec<SessionEvent>> {
        match &mut self.quote {
            Some(model) => model.replace(quote.clone())?,
            None => self.quote = Some(QuoteModel::new(quote.clone())?),
        }
        let mut events = vec![SessionEvent::QuoteChanged(quote)];
        events.extend(self.revalidate_all());
        Ok(events)
    }

    pub(crate) fn apply_snapshot(&mut self, snapshot: VaultSnapshot) -> Result<Vec<SessionEvent>> {
        let mut events = self.replace_quote(snapshot.quote)?;
        if self.stats != snapshot.stats {
            self.stats = snapshot.stats.clone();
            events.push(SessionEvent::StatsChanged(snapshot.stats));
        }
        Ok(events)
    }
}
