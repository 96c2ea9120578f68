//! States and outcomes of the lending workflow

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::book::Book;
use crate::models::borrow::BorrowRecord;
use crate::models::member::Member;
use crate::models::reservation::ReservationRecord;

use super::event::LendingAction;

/// Identity of one workflow sequence. Rotated whenever a sequence is
/// abandoned, so a response from a superseded sequence can be told
/// apart and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceId(Uuid);

impl SequenceId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SequenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// States of a lending sequence.
///
/// Every variant past `Idle` carries the book snapshot taken when the
/// sequence started. `Committing` additionally carries the optimistic
/// pending copy shown while the commit is in flight; the confirmed copy
/// arrives inside the terminal record.
#[derive(Debug, Clone)]
pub enum LendingState {
    Idle,
    /// A book control was activated; settles into `AwaitingUserMode`
    /// without waiting for input.
    ActionChosen {
        book: Book,
        action: LendingAction,
    },
    AwaitingUserMode {
        book: Book,
        action: LendingAction,
    },
    ExistingUserLookup {
        book: Book,
        action: LendingAction,
        in_flight: bool,
    },
    NewUserRegistration {
        book: Book,
        action: LendingAction,
        in_flight: bool,
    },
    /// Borrow only: the member is resolved and a due date is being
    /// chosen. `due_date` starts at the configured default.
    AwaitingDates {
        book: Book,
        member: Member,
        due_date: DateTime<Utc>,
    },
    Committing {
        book: Book,
        member: Member,
        action: LendingAction,
        pending_book: Book,
    },
    Terminal(SequenceOutcome),
}

impl LendingState {
    pub fn name(&self) -> &'static str {
        match self {
            LendingState::Idle => "Idle",
            LendingState::ActionChosen { .. } => "ActionChosen",
            LendingState::AwaitingUserMode { .. } => "AwaitingUserMode",
            LendingState::ExistingUserLookup { .. } => "ExistingUserLookup",
            LendingState::NewUserRegistration { .. } => "NewUserRegistration",
            LendingState::AwaitingDates { .. } => "AwaitingDates",
            LendingState::Committing { .. } => "Committing",
            LendingState::Terminal(_) => "Terminal",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LendingState::Terminal(_))
    }
}

/// How a sequence ended
#[derive(Debug, Clone)]
pub enum SequenceOutcome {
    Success(CommitReceipt),
    Failure(FailureReason),
}

/// The record the service created for a successful commit
#[derive(Debug, Clone)]
pub enum CommitReceipt {
    Borrowed(BorrowRecord),
    Reserved(ReservationRecord),
}

/// Why a commit was refused
#[derive(Debug, Clone)]
pub enum FailureReason {
    MemberBanned,
    BookUnavailable,
    Remote { status: u16, message: String },
    Other(String),
}

impl From<AppError> for FailureReason {
    fn from(e: AppError) -> Self {
        match e {
            AppError::MemberBanned => FailureReason::MemberBanned,
            AppError::BookUnavailable => FailureReason::BookUnavailable,
            AppError::Remote { status, message } => FailureReason::Remote { status, message },
            AppError::NotFound(message) => FailureReason::Remote {
                status: 404,
                message,
            },
            other => FailureReason::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::MemberBanned => {
                write!(f, "This member is banned from borrowing and reserving")
            }
            FailureReason::BookUnavailable => {
                write!(f, "No copies of this book are currently available")
            }
            FailureReason::Remote { status, message } => {
                write!(f, "The library service refused the request ({status}): {message}")
            }
            FailureReason::Other(message) => write!(f, "{message}"),
        }
    }
}
