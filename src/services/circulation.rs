//! Circulation service: returns, cancellations and lending overviews

use std::sync::Arc;

use crate::{
    access::{CatalogAccess, MembershipAccess},
    error::AppResult,
    models::borrow::BorrowRecord,
    models::reservation::ReservationRecord,
};

/// A member's lending history, as shown on the profile screen
#[derive(Debug, Clone)]
pub struct MemberHistory {
    pub borrows: Vec<BorrowRecord>,
    pub reservations: Vec<ReservationRecord>,
}

#[derive(Clone)]
pub struct CirculationService {
    catalog: Arc<dyn CatalogAccess>,
    membership: Arc<dyn MembershipAccess>,
}

impl CirculationService {
    pub fn new(catalog: Arc<dyn CatalogAccess>, membership: Arc<dyn MembershipAccess>) -> Self {
        Self {
            catalog,
            membership,
        }
    }

    /// Return a borrowed book. The service stamps the return date and
    /// frees the copy; returning an already-returned record is a miss.
    pub async fn return_book(&self, borrow_id: &str) -> AppResult<BorrowRecord> {
        let record = self.catalog.return_borrow(borrow_id).await?;
        tracing::info!(borrow_id = %record.id, book_id = %record.book.id, "book returned");
        Ok(record)
    }

    /// Cancel a reservation. Cancelling one that no longer exists is a miss.
    pub async fn cancel_reservation(&self, reservation_id: &str) -> AppResult<()> {
        self.membership.cancel_reservation(reservation_id).await?;
        tracing::info!(reservation_id = %reservation_id, "reservation cancelled");
        Ok(())
    }

    /// All open borrows
    pub async fn all_borrows(&self) -> AppResult<Vec<BorrowRecord>> {
        self.catalog.list_borrows().await
    }

    /// Full borrow history, returned records included
    pub async fn all_borrow_records(&self) -> AppResult<Vec<BorrowRecord>> {
        self.catalog.list_borrow_records().await
    }

    /// All reservations
    pub async fn all_reservations(&self) -> AppResult<Vec<ReservationRecord>> {
        self.membership.list_reservations().await
    }

    /// Open borrows for a dashboard refresh; a failed fetch degrades to
    /// an empty list so the rest of the screen can still render.
    pub async fn all_borrows_or_empty(&self) -> Vec<BorrowRecord> {
        match self.catalog.list_borrows().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "borrow list refresh failed");
                Vec::new()
            }
        }
    }

    /// Reservations for a dashboard refresh, degrading like
    /// [`all_borrows_or_empty`](Self::all_borrows_or_empty).
    pub async fn all_reservations_or_empty(&self) -> Vec<ReservationRecord> {
        match self.membership.list_reservations().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "reservation list refresh failed");
                Vec::new()
            }
        }
    }

    /// Fetch a member's borrows and reservations together for the
    /// profile screen. Either side failing fails the whole history.
    pub async fn member_history(&self, member_id: &str) -> AppResult<MemberHistory> {
        let (borrows, reservations) = tokio::join!(
            self.catalog.member_borrow_records(member_id),
            self.membership.member_reservations(member_id),
        );
        Ok(MemberHistory {
            borrows: borrows?,
            reservations: reservations?,
        })
    }
}
