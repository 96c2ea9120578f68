//! Async driver around the lending machine.
//!
//! The engine owns the machine behind a lock and turns its effects
//! into membership service calls. The lock is only held while the
//! machine computes a transition, never across a service call, so a
//! cancel arriving mid-request takes effect immediately and the late
//! response is discarded by the sequence check.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::access::MembershipAccess;
use crate::config::LendingConfig;
use crate::error::AppResult;
use crate::models::book::Book;

use super::event::{Effect, LendingEvent, Resolution};
use super::machine::LendingMachine;
use super::state::{LendingState, SequenceId, SequenceOutcome};

pub struct LendingEngine {
    machine: Mutex<LendingMachine>,
    membership: Arc<dyn MembershipAccess>,
}

impl LendingEngine {
    pub fn new(membership: Arc<dyn MembershipAccess>, config: &LendingConfig) -> Self {
        Self {
            machine: Mutex::new(LendingMachine::new(config)),
            membership,
        }
    }

    /// Feed one presentation event and run every effect it unlocks to
    /// completion. `Err` carries a rejection for the operator; the
    /// sequence stays where it was so the input can be corrected.
    pub async fn submit(&self, event: LendingEvent) -> AppResult<()> {
        let (sequence, effects) = {
            let mut machine = self.machine.lock().unwrap();
            let effects = machine.handle(event, Utc::now())?;
            (machine.sequence(), effects)
        };
        self.drive(sequence, effects).await
    }

    async fn drive(&self, sequence: SequenceId, effects: Vec<Effect>) -> AppResult<()> {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            tracing::debug!(effect = effect.name(), %sequence, "executing effect");
            let resolution = self.execute(effect).await;
            let next = {
                let mut machine = self.machine.lock().unwrap();
                machine.resolve(sequence, resolution, Utc::now())?
            };
            queue.extend(next);
        }
        Ok(())
    }

    async fn execute(&self, effect: Effect) -> Resolution {
        match effect {
            Effect::LookupMember { member_id } => {
                match self.membership.lookup_member(&member_id).await {
                    Ok(member) => Resolution::MemberFound(member),
                    Err(e) => Resolution::Failed(e),
                }
            }
            Effect::RegisterMember(draft) => {
                match self.membership.register_member(&draft).await {
                    Ok(member) => Resolution::MemberRegistered(member),
                    Err(e) => Resolution::Failed(e),
                }
            }
            Effect::CommitBorrow(payload) => {
                match self.membership.commit_borrow(&payload).await {
                    Ok(record) => Resolution::BorrowCommitted(record),
                    Err(e) => Resolution::Failed(e),
                }
            }
            Effect::CommitReserve(payload) => {
                match self.membership.commit_reserve(&payload).await {
                    Ok(record) => Resolution::ReserveCommitted(record),
                    Err(e) => Resolution::Failed(e),
                }
            }
        }
    }

    /// Abandon the current sequence. Safe to call at any moment, even
    /// while a service call is being awaited on another task.
    pub fn reset(&self) {
        let mut machine = self.machine.lock().unwrap();
        let _ = machine.handle(LendingEvent::Cancel, Utc::now());
    }

    pub fn snapshot(&self) -> LendingState {
        self.machine.lock().unwrap().state().clone()
    }

    pub fn outcome(&self) -> Option<SequenceOutcome> {
        self.machine.lock().unwrap().outcome().cloned()
    }

    pub fn display_book(&self) -> Option<Book> {
        self.machine.lock().unwrap().display_book().cloned()
    }

    pub fn planned_expiration(&self) -> Option<DateTime<Utc>> {
        self.machine.lock().unwrap().planned_expiration(Utc::now())
    }

    pub fn sequence(&self) -> SequenceId {
        self.machine.lock().unwrap().sequence()
    }
}
