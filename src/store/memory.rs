//! In-memory store for tests and single-node development.

use crate::error::{AppError, Result};
use crate::models::session::Session;
use crate::models::user::UserProfile;
use crate::store::{SessionStore, UserStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MemoryStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    users: Arc<RwLock<HashMap<String, UserProfile>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Session>> {
        let sessions = self.sessions.read().await;
        let mut all: Vec<Session> = sessions.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn replace(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(&session.id) {
            return Err(AppError::SessionNotFound);
        }
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(id).is_some())
    }

    async fn add_participant(&self, id: &str, uid: &str) -> Result<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or(AppError::SessionNotFound)?;

        if session.is_participant(uid) {
            return Ok(session.clone());
        }
        if session.is_full() {
            return Err(AppError::SessionFull);
        }

        session.participants.push(uid.to_string());
        Ok(session.clone())
    }

    async fn remove_participant(&self, id: &str, uid: &str) -> Result<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or(AppError::SessionNotFound)?;
        session.participants.retain(|p| p != uid);
        Ok(session.clone())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>> {
        let users = self.users.read().await;
        Ok(users.get(uid).cloned())
    }

    async fn insert_if_absent(&self, profile: &UserProfile) -> Result<UserProfile> {
        let mut users = self.users.write().await;
        Ok(users
            .entry(profile.uid.clone())
            .or_insert_with(|| profile.clone())
            .clone())
    }
}
