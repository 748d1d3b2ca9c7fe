use crate::models::session::Session;
use crate::models::user::UserProfile;
use serde::{Deserialize, Serialize};

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    /// Opaque credential from the identity provider's sign-in flow.
    pub credential: String,
    /// Username chosen by the user; required on first sign-in only.
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestTagsRequest {
    pub title: String,
    pub description: String,
}

// Response DTOs

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub profile: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct SuggestTagsResponse {
    pub tags: Vec<String>,
}

/// Session detail plus the per-viewer flags that drive UI affordances.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    pub is_owner: bool,
    pub is_participant: bool,
    pub is_full: bool,
    pub is_past: bool,
    pub can_join: bool,
    pub can_leave: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl SessionView {
    pub fn for_viewer(session: Session, uid: &str) -> Self {
        Self {
            is_owner: session.is_owner(uid),
            is_participant: session.is_participant(uid),
            is_full: session.is_full(),
            is_past: session.is_past(),
            can_join: session.can_join(uid),
            can_leave: session.can_leave(uid),
            can_edit: session.can_edit(uid),
            can_delete: session.can_delete(uid),
            session,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
