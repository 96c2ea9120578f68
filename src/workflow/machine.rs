//! Pure transition logic of the lending workflow.
//!
//! The machine consumes presentation events and effect resolutions and
//! answers with the effects its driver must execute next. It performs
//! no IO itself, so every transition can be exercised with plain values
//! and a chosen clock instant.

use std::mem;

use chrono::{DateTime, Duration, Utc};
use validator::Validate;

use crate::config::LendingConfig;
use crate::error::{AppError, AppResult};
use crate::models::book::Book;
use crate::models::borrow::CommitPayload;
use crate::models::member::Member;

use super::event::{Effect, LendingAction, LendingEvent, Resolution, UserMode};
use super::state::{
    CommitReceipt, FailureReason, LendingState, SequenceId, SequenceOutcome,
};

pub struct LendingMachine {
    state: LendingState,
    sequence: SequenceId,
    loan_period_days: i64,
    reservation_period_days: i64,
}

impl LendingMachine {
    pub fn new(config: &LendingConfig) -> Self {
        Self {
            state: LendingState::Idle,
            sequence: SequenceId::new(),
            loan_period_days: config.loan_period_days,
            reservation_period_days: config.reservation_period_days,
        }
    }

    pub fn state(&self) -> &LendingState {
        &self.state
    }

    /// Identity of the live sequence. A resolution tagged with an older
    /// identity is discarded by [`resolve`](Self::resolve).
    pub fn sequence(&self) -> SequenceId {
        self.sequence
    }

    pub fn outcome(&self) -> Option<&SequenceOutcome> {
        match &self.state {
            LendingState::Terminal(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Expiration a reservation would carry if committed now. Answers
    /// only while a reserve sequence is open; once committed, the
    /// record's own `expiration_date` is the authority.
    pub fn planned_expiration(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match &self.state {
            LendingState::ActionChosen { action, .. }
            | LendingState::AwaitingUserMode { action, .. }
            | LendingState::ExistingUserLookup { action, .. }
            | LendingState::NewUserRegistration { action, .. }
            | LendingState::Committing { action, .. }
                if *action == LendingAction::Reserve =>
            {
                Some(now + Duration::days(self.reservation_period_days))
            }
            _ => None,
        }
    }

    /// The book copy a UI should render for this sequence: the snapshot
    /// taken at the start, the optimistic pending copy while a borrow
    /// commit is in flight, or the confirmed copy from the service once
    /// the commit succeeded. A failed sequence has nothing to show.
    pub fn display_book(&self) -> Option<&Book> {
        match &self.state {
            LendingState::Idle => None,
            LendingState::ActionChosen { book, .. }
            | LendingState::AwaitingUserMode { book, .. }
            | LendingState::ExistingUserLookup { book, .. }
            | LendingState::NewUserRegistration { book, .. }
            | LendingState::AwaitingDates { book, .. } => Some(book),
            LendingState::Committing { pending_book, .. } => Some(pending_book),
            LendingState::Terminal(SequenceOutcome::Success(CommitReceipt::Borrowed(r))) => {
                Some(&r.book)
            }
            LendingState::Terminal(SequenceOutcome::Success(CommitReceipt::Reserved(r))) => {
                Some(&r.book)
            }
            LendingState::Terminal(SequenceOutcome::Failure(_)) => None,
        }
    }

    /// Advance on a presentation event. `Err` means the event was
    /// refused and the state is unchanged; the caller shows the error
    /// and lets the operator correct the input.
    pub fn handle(
        &mut self,
        event: LendingEvent,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Effect>> {
        // Cancelling is allowed from every state and abandons the
        // sequence, so any response still in flight resolves stale.
        if matches!(event, LendingEvent::Cancel) {
            tracing::debug!(state = self.state.name(), "sequence cancelled");
            self.state = LendingState::Idle;
            self.sequence = SequenceId::new();
            return Ok(Vec::new());
        }

        let state = mem::replace(&mut self.state, LendingState::Idle);
        let effects = match (state, event) {
            (LendingState::Idle, LendingEvent::ChooseAction { book, action }) => {
                tracing::info!(book_id = %book.id, action = %action, sequence = %self.sequence, "sequence started");
                self.state = LendingState::ActionChosen { book, action };
                Vec::new()
            }

            (LendingState::AwaitingUserMode { book, action }, LendingEvent::ChooseUserMode(mode)) => {
                self.state = match mode {
                    UserMode::Existing => LendingState::ExistingUserLookup {
                        book,
                        action,
                        in_flight: false,
                    },
                    UserMode::New => LendingState::NewUserRegistration {
                        book,
                        action,
                        in_flight: false,
                    },
                };
                Vec::new()
            }

            (
                LendingState::ExistingUserLookup {
                    book,
                    action,
                    in_flight: false,
                },
                LendingEvent::SubmitLookup { member_id },
            ) => {
                let member_id = member_id.trim().to_string();
                if member_id.is_empty() {
                    self.state = LendingState::ExistingUserLookup {
                        book,
                        action,
                        in_flight: false,
                    };
                    return Err(AppError::Validation(
                        "Member identifier cannot be empty".to_string(),
                    ));
                }
                self.state = LendingState::ExistingUserLookup {
                    book,
                    action,
                    in_flight: true,
                };
                vec![Effect::LookupMember { member_id }]
            }

            (
                state @ LendingState::ExistingUserLookup { in_flight: true, .. },
                LendingEvent::SubmitLookup { .. },
            ) => {
                self.state = state;
                return Err(AppError::Conflict(
                    "A member lookup is already in progress".to_string(),
                ));
            }

            (
                LendingState::NewUserRegistration {
                    book,
                    action,
                    in_flight: false,
                },
                LendingEvent::SubmitRegistration(draft),
            ) => {
                if let Err(e) = draft.validate() {
                    self.state = LendingState::NewUserRegistration {
                        book,
                        action,
                        in_flight: false,
                    };
                    return Err(AppError::Validation(e.to_string()));
                }
                self.state = LendingState::NewUserRegistration {
                    book,
                    action,
                    in_flight: true,
                };
                vec![Effect::RegisterMember(draft)]
            }

            (
                state @ LendingState::NewUserRegistration { in_flight: true, .. },
                LendingEvent::SubmitRegistration(_),
            ) => {
                self.state = state;
                return Err(AppError::Conflict(
                    "A registration is already in progress".to_string(),
                ));
            }

            (
                LendingState::AwaitingDates {
                    book,
                    member,
                    due_date,
                },
                LendingEvent::SelectDueDate(date),
            ) => {
                if date <= now {
                    self.state = LendingState::AwaitingDates {
                        book,
                        member,
                        due_date,
                    };
                    return Err(AppError::Validation(
                        "Due date must be after today".to_string(),
                    ));
                }
                self.state = LendingState::AwaitingDates {
                    book,
                    member,
                    due_date: date,
                };
                Vec::new()
            }

            (
                LendingState::AwaitingDates {
                    book,
                    member,
                    due_date,
                },
                LendingEvent::Confirm,
            ) => {
                let payload = CommitPayload::borrow(&member.id, &book.id, due_date);
                self.enter_commit(book, LendingAction::Borrow, member, payload)
            }

            (state, event) => {
                let refused = AppError::InvalidTransition {
                    state: state.name(),
                    event: event.name(),
                };
                self.state = state;
                return Err(refused);
            }
        };

        self.settle();
        Ok(effects)
    }

    /// Apply the completion of an effect. The resolution must carry the
    /// sequence identity that was live when its effect was dispatched;
    /// anything else is a leftover from an abandoned sequence and is
    /// dropped without touching state.
    pub fn resolve(
        &mut self,
        sequence: SequenceId,
        resolution: Resolution,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Effect>> {
        if sequence != self.sequence {
            tracing::debug!(
                stale = %sequence,
                live = %self.sequence,
                resolution = resolution.name(),
                "discarding resolution from a superseded sequence"
            );
            return Ok(Vec::new());
        }

        let state = mem::replace(&mut self.state, LendingState::Idle);
        match (state, resolution) {
            (
                LendingState::ExistingUserLookup {
                    book,
                    action,
                    in_flight: true,
                },
                Resolution::MemberFound(member),
            ) => Ok(self.member_resolved(book, action, member, now)),

            (
                LendingState::ExistingUserLookup {
                    book,
                    action,
                    in_flight: true,
                },
                Resolution::Failed(e),
            ) => {
                self.state = LendingState::ExistingUserLookup {
                    book,
                    action,
                    in_flight: false,
                };
                Err(e)
            }

            (
                LendingState::NewUserRegistration {
                    book,
                    action,
                    in_flight: true,
                },
                Resolution::MemberRegistered(member),
            ) => {
                tracing::info!(member_id = %member.id, "member registered mid-sequence");
                Ok(self.member_resolved(book, action, member, now))
            }

            (
                LendingState::NewUserRegistration {
                    book,
                    action,
                    in_flight: true,
                },
                Resolution::Failed(e),
            ) => {
                self.state = LendingState::NewUserRegistration {
                    book,
                    action,
                    in_flight: false,
                };
                Err(e)
            }

            (LendingState::Committing { .. }, Resolution::BorrowCommitted(record)) => {
                tracing::info!(borrow_id = %record.id, due = %record.due_date, "borrow committed");
                self.state = LendingState::Terminal(SequenceOutcome::Success(
                    CommitReceipt::Borrowed(record),
                ));
                Ok(Vec::new())
            }

            (LendingState::Committing { .. }, Resolution::ReserveCommitted(record)) => {
                tracing::info!(reservation_id = %record.id, expires = %record.expiration_date, "reservation committed");
                self.state = LendingState::Terminal(SequenceOutcome::Success(
                    CommitReceipt::Reserved(record),
                ));
                Ok(Vec::new())
            }

            (LendingState::Committing { .. }, Resolution::Failed(e)) => {
                let reason = FailureReason::from(e);
                tracing::info!(reason = %reason, "commit refused");
                self.state = LendingState::Terminal(SequenceOutcome::Failure(reason));
                Ok(Vec::new())
            }

            (state, resolution) => {
                let refused = AppError::InvalidTransition {
                    state: state.name(),
                    event: resolution.name(),
                };
                self.state = state;
                Err(refused)
            }
        }
    }

    /// Routes a freshly resolved member onward: date selection for a
    /// borrow, straight to commit for a reserve.
    fn member_resolved(
        &mut self,
        book: Book,
        action: LendingAction,
        member: Member,
        now: DateTime<Utc>,
    ) -> Vec<Effect> {
        match action {
            LendingAction::Borrow => {
                let due_date = now + Duration::days(self.loan_period_days);
                self.state = LendingState::AwaitingDates {
                    book,
                    member,
                    due_date,
                };
                Vec::new()
            }
            LendingAction::Reserve => {
                let payload = CommitPayload::reserve(&member.id, &book.id);
                self.enter_commit(book, LendingAction::Reserve, member, payload)
            }
        }
    }

    /// Checks the commit preconditions and either refuses the sequence
    /// outright or moves to `Committing` with the commit effect.
    fn enter_commit(
        &mut self,
        book: Book,
        action: LendingAction,
        member: Member,
        payload: CommitPayload,
    ) -> Vec<Effect> {
        if member.is_banned {
            tracing::info!(member_id = %member.id, "commit refused locally: member is banned");
            self.state =
                LendingState::Terminal(SequenceOutcome::Failure(FailureReason::MemberBanned));
            return Vec::new();
        }
        if action == LendingAction::Borrow && book.available_copies() == Some(0) {
            tracing::info!(book_id = %book.id, "commit refused locally: no copies available");
            self.state =
                LendingState::Terminal(SequenceOutcome::Failure(FailureReason::BookUnavailable));
            return Vec::new();
        }

        let effect = match action {
            LendingAction::Borrow => Effect::CommitBorrow(payload),
            LendingAction::Reserve => Effect::CommitReserve(payload),
        };
        // Books without copy counts keep their snapshot; the service is
        // the judge of availability in that case.
        let pending_book = match action {
            LendingAction::Borrow => book.with_copy_taken(),
            LendingAction::Reserve => book.clone(),
        };
        self.state = LendingState::Committing {
            book,
            member,
            action,
            pending_book,
        };
        vec![effect]
    }

    /// Applies transitions that never wait for input.
    fn settle(&mut self) {
        let state = mem::replace(&mut self.state, LendingState::Idle);
        self.state = match state {
            LendingState::ActionChosen { book, action } => {
                LendingState::AwaitingUserMode { book, action }
            }
            other => other,
        };
    }
}
