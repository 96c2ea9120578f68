//! Data models for the Liseuse client engine

pub mod book;
pub mod borrow;
pub mod member;
pub mod reservation;

// Re-export commonly used types
pub use book::{Book, BookDraft, Copies};
pub use borrow::{BorrowRecord, BorrowStatus, CommitPayload};
pub use member::{Member, MemberDraft};
pub use reservation::{ReservationRecord, ReservationStatus};
