use crate::error::{AppError, Result};
use crate::extractors::AuthUser;
use crate::models::session::{filter_sessions, Session, SessionDraft, SessionQuery};
use crate::state::AppState;
use tracing::info;

/// Lifecycle rules for sessions. Validation happens before any store
/// write; ownership and temporal checks gate every mutation.
pub struct SessionService;

impl SessionService {
    pub async fn create(state: &AppState, draft: &SessionDraft, actor: &AuthUser) -> Result<Session> {
        let fields = draft.validate()?;

        // Host name is a snapshot taken at creation time, never re-derived
        let host_name = match state.users.get(&actor.uid).await? {
            Some(profile) => profile.username,
            None => actor.username.clone(),
        };
        let host_name = if host_name.trim().is_empty() {
            "Unknown".to_string()
        } else {
            host_name
        };

        let session = Session::new(fields, actor.uid.clone(), host_name);
        state.sessions.insert(&session).await?;

        info!("Session {} created by {}", session.id, actor.uid);
        Ok(session)
    }

    pub async fn get(state: &AppState, id: &str) -> Result<Session> {
        state
            .sessions
            .get(id)
            .await?
            .ok_or(AppError::SessionNotFound)
    }

    pub async fn list(state: &AppState, query: &SessionQuery) -> Result<Vec<Session>> {
        let sessions = state.sessions.list().await?;
        Ok(filter_sessions(sessions, query))
    }

    pub async fn update(
        state: &AppState,
        id: &str,
        draft: &SessionDraft,
        actor: &AuthUser,
    ) -> Result<Session> {
        let existing = Self::get(state, id).await?;

        if !existing.is_owner(&actor.uid) {
            return Err(AppError::Forbidden);
        }
        if existing.is_past() {
            return Err(AppError::SessionEnded);
        }

        let fields = draft.validate()?;
        let updated = existing.apply(fields);
        state.sessions.replace(&updated).await?;

        info!("Session {} updated by {}", updated.id, actor.uid);
        Ok(updated)
    }

    pub async fn delete(state: &AppState, id: &str, actor: &AuthUser) -> Result<()> {
        let existing = Self::get(state, id).await?;

        if !existing.is_owner(&actor.uid) {
            return Err(AppError::Forbidden);
        }

        state.sessions.delete(id).await?;
        info!("Session {} deleted by {}", id, actor.uid);
        Ok(())
    }

    /// Join the roster. Idempotent for existing members; capacity is
    /// enforced by the store's atomic union.
    pub async fn join(state: &AppState, id: &str, actor: &AuthUser) -> Result<Session> {
        let session = Self::get(state, id).await?;

        if session.is_past() {
            return Err(AppError::SessionEnded);
        }
        if session.is_owner(&actor.uid) {
            return Err(AppError::Validation(
                "hosts cannot join their own session".to_string(),
            ));
        }

        state.sessions.add_participant(id, &actor.uid).await
    }

    /// Leave the roster. Leaving a roster one is not on is a no-op.
    pub async fn leave(state: &AppState, id: &str, actor: &AuthUser) -> Result<Session> {
        let session = Self::get(state, id).await?;

        if session.is_past() {
            return Err(AppError::SessionEnded);
        }

        state.sessions.remove_participant(id, &actor.uid).await
    }
}
