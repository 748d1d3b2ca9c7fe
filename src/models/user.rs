use serde::{Deserialize, Serialize};

/// Minimal profile document, keyed by the identity provider's user id.
/// Created lazily on first sign-in; the username is fixed at that point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub username: String,
    pub email: String,
}
