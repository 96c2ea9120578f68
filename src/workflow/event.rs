//! Events, effects and resolutions of the lending workflow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::book::Book;
use crate::models::borrow::{BorrowRecord, CommitPayload};
use crate::models::member::{Member, MemberDraft};
use crate::models::reservation::ReservationRecord;

/// What the operator wants to do with the chosen book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LendingAction {
    Borrow,
    Reserve,
}

impl LendingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LendingAction::Borrow => "borrow",
            LendingAction::Reserve => "reserve",
        }
    }
}

impl std::fmt::Display for LendingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the member taking part in the sequence is identified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserMode {
    Existing,
    New,
}

/// Everything the presentation layer can raise against a sequence
#[derive(Debug, Clone)]
pub enum LendingEvent {
    /// A book's borrow or reserve control was activated. Carries the
    /// book by value; the snapshot stays immutable for the sequence.
    ChooseAction { book: Book, action: LendingAction },
    ChooseUserMode(UserMode),
    SubmitLookup { member_id: String },
    SubmitRegistration(MemberDraft),
    SelectDueDate(DateTime<Utc>),
    Confirm,
    Cancel,
}

impl LendingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LendingEvent::ChooseAction { .. } => "ChooseAction",
            LendingEvent::ChooseUserMode(_) => "ChooseUserMode",
            LendingEvent::SubmitLookup { .. } => "SubmitLookup",
            LendingEvent::SubmitRegistration(_) => "SubmitRegistration",
            LendingEvent::SelectDueDate(_) => "SelectDueDate",
            LendingEvent::Confirm => "Confirm",
            LendingEvent::Cancel => "Cancel",
        }
    }
}

/// Remote commands the machine asks its driver to execute
#[derive(Debug, Clone)]
pub enum Effect {
    LookupMember { member_id: String },
    RegisterMember(MemberDraft),
    CommitBorrow(CommitPayload),
    CommitReserve(CommitPayload),
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::LookupMember { .. } => "LookupMember",
            Effect::RegisterMember(_) => "RegisterMember",
            Effect::CommitBorrow(_) => "CommitBorrow",
            Effect::CommitReserve(_) => "CommitReserve",
        }
    }
}

/// Completion of an effect, fed back into the machine by the driver
#[derive(Debug)]
pub enum Resolution {
    MemberFound(Member),
    MemberRegistered(Member),
    BorrowCommitted(BorrowRecord),
    ReserveCommitted(ReservationRecord),
    Failed(AppError),
}

impl Resolution {
    pub fn name(&self) -> &'static str {
        match self {
            Resolution::MemberFound(_) => "MemberFound",
            Resolution::MemberRegistered(_) => "MemberRegistered",
            Resolution::BorrowCommitted(_) => "BorrowCommitted",
            Resolution::ReserveCommitted(_) => "ReserveCommitted",
            Resolution::Failed(_) => "Failed",
        }
    }
}
