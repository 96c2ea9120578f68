//! Reservation record model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::book::Book;
use super::member::Member;

/// A member's hold on a book, kept until it expires or is cancelled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    pub id: String,
    pub book: Book,
    pub member: Member,
    pub reservation_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
}

/// Display status of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Active,
    Expired,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "Active",
            ReservationStatus::Expired => "Expired",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ReservationRecord {
    /// Status at the given instant.
    pub fn status_at(&self, now: DateTime<Utc>) -> ReservationStatus {
        if self.expiration_date < now {
            ReservationStatus::Expired
        } else {
            ReservationStatus::Active
        }
    }
}
