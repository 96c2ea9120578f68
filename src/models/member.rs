//! Member model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Library member as served by the membership API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub join_date: DateTime<Utc>,
    #[serde(default)]
    pub is_banned: bool,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration form data for a new member
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MemberDraft {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Email is required"), email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
}

/// Wire payload for member registration. The membership service keeps
/// its legacy field name `secondName` for the last name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub first_name: String,
    pub second_name: String,
    pub email: String,
    pub phone: String,
}

impl From<&MemberDraft> for RegistrationPayload {
    fn from(draft: &MemberDraft) -> Self {
        Self {
            first_name: draft.first_name.clone(),
            second_name: draft.last_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
        }
    }
}

/// Registration response envelope (`{ "member": { ... } }`)
#[derive(Debug, Deserialize)]
pub struct RegistrationResponse {
    pub member: Member,
}
