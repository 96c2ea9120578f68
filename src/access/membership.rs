//! Membership access: members, reservations and lending commits

use async_trait::async_trait;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::borrow::{BorrowRecord, CommitPayload};
use crate::models::member::{Member, MemberDraft, RegistrationPayload, RegistrationResponse};
use crate::models::reservation::ReservationRecord;

use super::http::ApiClient;

/// Contract of the membership side of the library service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipAccess: Send + Sync {
    async fn list_members(&self) -> AppResult<Vec<Member>>;
    async fn lookup_member(&self, id: &str) -> AppResult<Member>;
    /// Register a new member. An invalid draft is refused with
    /// `AppError::Validation` before any request is sent.
    async fn register_member(&self, draft: &MemberDraft) -> AppResult<Member>;
    async fn list_reservations(&self) -> AppResult<Vec<ReservationRecord>>;
    async fn member_reservations(&self, member_id: &str) -> AppResult<Vec<ReservationRecord>>;
    async fn cancel_reservation(&self, reservation_id: &str) -> AppResult<()>;
    async fn commit_borrow(&self, payload: &CommitPayload) -> AppResult<BorrowRecord>;
    async fn commit_reserve(&self, payload: &CommitPayload) -> AppResult<ReservationRecord>;
}

/// Membership access over the HTTP JSON API
#[derive(Debug, Clone)]
pub struct HttpMembershipAccess {
    client: ApiClient,
}

impl HttpMembershipAccess {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MembershipAccess for HttpMembershipAccess {
    async fn list_members(&self) -> AppResult<Vec<Member>> {
        self.client.get_json("/allUser").await
    }

    async fn lookup_member(&self, id: &str) -> AppResult<Member> {
        self.client.get_json(&format!("/users/{}", id)).await
    }

    async fn register_member(&self, draft: &MemberDraft) -> AppResult<Member> {
        draft
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let response: RegistrationResponse = self
            .client
            .post_json("/api/members", &RegistrationPayload::from(draft))
            .await?;
        Ok(response.member)
    }

    async fn list_reservations(&self) -> AppResult<Vec<ReservationRecord>> {
        self.client.get_json("/reservations").await
    }

    async fn member_reservations(&self, member_id: &str) -> AppResult<Vec<ReservationRecord>> {
        self.client
            .get_json(&format!("/reservations/member/{}", member_id))
            .await
    }

    async fn cancel_reservation(&self, reservation_id: &str) -> AppResult<()> {
        self.client
            .delete(&format!("/reservations/{}", reservation_id))
            .await
    }

    async fn commit_borrow(&self, payload: &CommitPayload) -> AppResult<BorrowRecord> {
        self.client.post_json("/borrow", payload).await
    }

    async fn commit_reserve(&self, payload: &CommitPayload) -> AppResult<ReservationRecord> {
        self.client.post_json("/reserve", payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn unroutable() -> HttpMembershipAccess {
        // Nothing listens on port 1, so any request that does go out
        // comes back as a transport error rather than a validation one.
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_seconds: 1,
        })
        .unwrap();
        HttpMembershipAccess::new(client)
    }

    #[tokio::test]
    async fn blank_registration_is_refused_before_any_request() {
        let access = unroutable();
        let draft = MemberDraft {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
        };

        let err = access.register_member(&draft).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
