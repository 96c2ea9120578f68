//! Membership management service

use std::sync::Arc;

use validator::Validate;

use crate::{
    access::MembershipAccess,
    error::{AppError, AppResult},
    models::member::{Member, MemberDraft},
};

#[derive(Clone)]
pub struct MembershipService {
    access: Arc<dyn MembershipAccess>,
}

impl MembershipService {
    pub fn new(access: Arc<dyn MembershipAccess>) -> Self {
        Self { access }
    }

    /// List every registered member
    pub async fn list_members(&self) -> AppResult<Vec<Member>> {
        self.access.list_members().await
    }

    /// Look up a member by identifier
    pub async fn find_member(&self, id: &str) -> AppResult<Member> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::Validation(
                "Member identifier cannot be empty".to_string(),
            ));
        }
        self.access.lookup_member(id).await
    }

    /// Register a new member
    pub async fn register(&self, draft: &MemberDraft) -> AppResult<Member> {
        draft
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let member = self.access.register_member(draft).await?;
        tracing::info!(member_id = %member.id, "member registered");
        Ok(member)
    }
}
