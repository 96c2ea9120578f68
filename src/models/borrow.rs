//! Borrow record model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::book::Book;
use super::member::Member;

/// A member's borrow of one book copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    pub id: String,
    pub book: Book,
    pub member: Member,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<DateTime<Utc>>,
}

/// Display status of a borrow record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorrowStatus {
    Active,
    Overdue,
    Returned,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Active => "Active",
            BorrowStatus::Overdue => "Overdue",
            BorrowStatus::Returned => "Returned",
        }
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl BorrowRecord {
    /// Status at the given instant. Returned wins over overdue.
    pub fn status_at(&self, now: DateTime<Utc>) -> BorrowStatus {
        if self.return_date.is_some() {
            BorrowStatus::Returned
        } else if self.due_date < now {
            BorrowStatus::Overdue
        } else {
            BorrowStatus::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Wire payload for borrow and reserve commits. The planned return date
/// rides in the legacy `returnDate` field and is only sent for borrows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitPayload {
    pub member_id: String,
    pub book_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<DateTime<Utc>>,
}

impl CommitPayload {
    pub fn borrow(member_id: &str, book_id: &str, due_date: DateTime<Utc>) -> Self {
        Self {
            member_id: member_id.to_string(),
            book_id: book_id.to_string(),
            return_date: Some(due_date),
        }
    }

    pub fn reserve(member_id: &str, book_id: &str) -> Self {
        Self {
            member_id: member_id.to_string(),
            book_id: book_id.to_string(),
            return_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(borrowed_days_ago: i64, period_days: i64) -> BorrowRecord {
        let now = Utc::now();
        let borrow_date = now - Duration::days(borrowed_days_ago);
        BorrowRecord {
            id: "BORROW-1".to_string(),
            book: Book {
                id: "BOOK-1".to_string(),
                title: "The Great Gatsby".to_string(),
                author: "F. Scott Fitzgerald".to_string(),
                description: "A portrait of the Jazz Age".to_string(),
                cover_image: String::new(),
                published_year: Some(1925),
                genre: None,
                copies: None,
            },
            member: Member {
                id: "USER-1".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: None,
                phone: None,
                join_date: now - Duration::days(400),
                is_banned: false,
            },
            borrow_date,
            due_date: borrow_date + Duration::days(period_days),
            return_date: None,
        }
    }

    #[test]
    fn status_depends_only_on_the_given_instant() {
        let now = Utc::now();
        let fresh = record(1, 14);
        assert_eq!(fresh.status_at(now), BorrowStatus::Active);

        let late = record(20, 14);
        assert_eq!(late.status_at(now), BorrowStatus::Overdue);
        // The same record was still fine before its due date passed.
        assert_eq!(
            late.status_at(now - Duration::days(10)),
            BorrowStatus::Active
        );
    }

    #[test]
    fn returned_wins_over_overdue() {
        let mut late = record(20, 14);
        late.return_date = Some(Utc::now());
        assert_eq!(late.status_at(Utc::now()), BorrowStatus::Returned);
        assert!(!late.is_active());
    }

    #[test]
    fn borrow_payload_carries_the_due_date_as_return_date() {
        let due = Utc::now() + Duration::days(14);
        let json =
            serde_json::to_value(CommitPayload::borrow("USER-1", "BOOK-1", due)).unwrap();
        assert_eq!(json["memberId"], "USER-1");
        assert_eq!(json["bookId"], "BOOK-1");
        assert!(json.get("returnDate").is_some());

        let json = serde_json::to_value(CommitPayload::reserve("USER-1", "BOOK-1")).unwrap();
        assert!(json.get("returnDate").is_none());
    }
}
