#![allow(dead_code)]

use async_trait::async_trait;
use skillshare_backend::config::Config;
use skillshare_backend::error::{AppError, Result};
use skillshare_backend::extractors::AuthUser;
use skillshare_backend::models::session::SessionDraft;
use skillshare_backend::services::identity::{Identity, IdentityProvider};
use skillshare_backend::state::AppState;
use skillshare_backend::store::memory::MemoryStore;
use std::sync::Arc;

/// Accepts credentials of the form `token-<uid>` and rejects the rest.
pub struct StubIdentity;

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn verify(&self, credential: &str) -> Result<Identity> {
        match credential.strip_prefix("token-") {
            Some(uid) if !uid.is_empty() => Ok(Identity {
                uid: uid.to_string(),
                display_name: Some(format!("{} display", uid)),
                email: Some(format!("{}@example.com", uid)),
            }),
            _ => Err(AppError::Unauthorized),
        }
    }
}

pub fn test_state() -> (AppState, Arc<MemoryStore>) {
    let mut config = Config::default();
    config.auth.token_secret = "integration-test-secret".to_string();

    let store = Arc::new(MemoryStore::new());
    let state = AppState::assemble(
        config,
        store.clone(),
        store.clone(),
        Arc::new(StubIdentity),
    );
    (state, store)
}

pub fn actor(uid: &str, username: &str) -> AuthUser {
    AuthUser {
        uid: uid.to_string(),
        username: username.to_string(),
        email: format!("{}@example.com", username),
    }
}

pub fn draft(title: &str) -> SessionDraft {
    SessionDraft {
        title: title.to_string(),
        description: "A session about something worth sharing".to_string(),
        category: "Tech".to_string(),
        difficulty: "Beginner".to_string(),
        date: "2030-06-15".to_string(),
        time: "18:30".to_string(),
        tags: "rust, learning".to_string(),
        max_participants: 10,
    }
}
