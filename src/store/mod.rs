//! Document store seam. The lifecycle rules talk to these traits only, so
//! storage can be swapped between the Redis backend and the in-memory one
//! used by tests and single-node development.

pub mod memory;
pub mod redis;

use crate::error::Result;
use crate::models::session::Session;
use crate::models::user::UserProfile;
use async_trait::async_trait;

/// CRUD plus the roster union/removal primitives for session documents.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: &Session) -> Result<()>;

    /// Always fetches fresh; no caching.
    async fn get(&self, id: &str) -> Result<Option<Session>>;

    /// All sessions, newest first by creation time.
    async fn list(&self) -> Result<Vec<Session>>;

    /// Full overwrite of an existing document.
    async fn replace(&self, session: &Session) -> Result<()>;

    /// Returns whether a document was actually removed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Set-union of `uid` into the roster, enforcing capacity atomically.
    /// Adding an existing member is a no-op; a full roster only rejects
    /// non-members. Returns the updated session.
    async fn add_participant(&self, id: &str, uid: &str) -> Result<Session>;

    /// Set-removal of `uid` from the roster; removing a non-member is a
    /// no-op. Returns the updated session.
    async fn remove_participant(&self, id: &str, uid: &str) -> Result<Session>;
}

/// Profile documents keyed by identity-provider uid.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>>;

    /// Create the profile unless one already exists; returns whichever
    /// profile ends up stored. First write wins, so the username chosen at
    /// first sign-in sticks.
    async fn insert_if_absent(&self, profile: &UserProfile) -> Result<UserProfile>;
}
