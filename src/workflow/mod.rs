//! Lending workflow engine
//!
//! A checkout runs as a sequence: pick a book and an action, identify
//! the member (lookup or registration), pick dates for a borrow, then
//! commit against the remote service. [`machine`] holds the pure
//! transition logic, [`engine`] drives it over the membership access
//! layer, and [`state`] and [`event`] carry the vocabulary both share.

pub mod engine;
pub mod event;
pub mod machine;
pub mod state;

pub use engine::LendingEngine;
pub use event::{Effect, LendingAction, LendingEvent, Resolution, UserMode};
pub use machine::LendingMachine;
pub use state::{CommitReceipt, FailureReason, LendingState, SequenceId, SequenceOutcome};
