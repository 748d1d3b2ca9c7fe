//! Redis-backed document store. Each session is a JSON document under
//! `session:{id}`; the roster lives in a companion Redis set so that the
//! capacity-checked union runs atomically in a Lua script.

use crate::error::{AppError, Result};
use crate::models::session::Session;
use crate::models::user::UserProfile;
use crate::store::{SessionStore, UserStore};
use async_trait::async_trait;
use deadpool_redis::redis::{cmd, AsyncCommands};
use deadpool_redis::Pool;

const SESSION_INDEX_KEY: &str = "sessions:index";

fn session_key(id: &str) -> String {
    format!("session:{}", id)
}

fn members_key(id: &str) -> String {
    format!("session:{}:members", id)
}

fn user_key(uid: &str) -> String {
    format!("user:{}", uid)
}

/// Atomic capacity-checked roster union.
///
/// KEYS[1] = session document, KEYS[2] = members set, ARGV[1] = uid.
/// Returns MISSING / MEMBER / FULL / JOINED.
const JOIN_SCRIPT: &str = r#"
    local doc = redis.call('GET', KEYS[1])
    if not doc then
        return 'MISSING'
    end
    if redis.call('SISMEMBER', KEYS[2], ARGV[1]) == 1 then
        return 'MEMBER'
    end
    local max = tonumber(cjson.decode(doc)['maxParticipants'])
    if redis.call('SCARD', KEYS[2]) >= max then
        return 'FULL'
    end
    redis.call('SADD', KEYS[2], ARGV[1])
    return 'JOINED'
"#;

#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| AppError::Store(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for RedisStore {
    async fn insert(&self, session: &Session) -> Result<()> {
        let mut conn = self.conn().await?;

        let json = serde_json::to_string(session)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Serialization error: {}", e)))?;

        conn.set::<_, _, ()>(session_key(&session.id), json)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        conn.sadd::<_, _, ()>(SESSION_INDEX_KEY, &session.id)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Session>> {
        let mut conn = self.conn().await?;

        let json: Option<String> = conn
            .get(session_key(id))
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        let Some(json) = json else {
            return Ok(None);
        };

        let mut session: Session = serde_json::from_str(&json)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Deserialization error: {}", e)))?;

        // The members set is authoritative for the roster.
        let members: Vec<String> = conn
            .smembers(members_key(id))
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        session.participants = members;

        Ok(Some(session))
    }

    async fn list(&self) -> Result<Vec<Session>> {
        let ids: Vec<String> = {
            let mut conn = self.conn().await?;
            conn.smembers(SESSION_INDEX_KEY)
                .await
                .map_err(|e| AppError::Store(e.to_string()))?
        };

        let mut sessions = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(session) = self.get(&id).await? {
                sessions.push(session);
            }
        }

        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn replace(&self, session: &Session) -> Result<()> {
        let mut conn = self.conn().await?;

        let exists: bool = conn
            .exists(session_key(&session.id))
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        if !exists {
            return Err(AppError::SessionNotFound);
        }

        let json = serde_json::to_string(session)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Serialization error: {}", e)))?;

        conn.set::<_, _, ()>(session_key(&session.id), json)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn().await?;

        let removed: i64 = conn
            .del(session_key(id))
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        conn.del::<_, ()>(members_key(id))
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        conn.srem::<_, _, ()>(SESSION_INDEX_KEY, id)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        Ok(removed > 0)
    }

    async fn add_participant(&self, id: &str, uid: &str) -> Result<Session> {
        let status: String = {
            let mut conn = self.conn().await?;
            cmd("EVAL")
                .arg(JOIN_SCRIPT)
                .arg(2)
                .arg(session_key(id))
                .arg(members_key(id))
                .arg(uid)
                .query_async(&mut *conn)
                .await
                .map_err(|e| AppError::Store(e.to_string()))?
        };

        match status.as_str() {
            "MISSING" => Err(AppError::SessionNotFound),
            "FULL" => Err(AppError::SessionFull),
            _ => self.get(id).await?.ok_or(AppError::SessionNotFound),
        }
    }

    async fn remove_participant(&self, id: &str, uid: &str) -> Result<Session> {
        {
            let mut conn = self.conn().await?;

            let exists: bool = conn
                .exists(session_key(id))
                .await
                .map_err(|e| AppError::Store(e.to_string()))?;
            if !exists {
                return Err(AppError::SessionNotFound);
            }

            conn.srem::<_, _, ()>(members_key(id), uid)
                .await
                .map_err(|e| AppError::Store(e.to_string()))?;
        }

        self.get(id).await?.ok_or(AppError::SessionNotFound)
    }
}

#[async_trait]
impl UserStore for RedisStore {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>> {
        let mut conn = self.conn().await?;

        let json: Option<String> = conn
            .get(user_key(uid))
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        match json {
            Some(json) => {
                let profile: UserProfile = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Deserialization error: {}", e))
                })?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    async fn insert_if_absent(&self, profile: &UserProfile) -> Result<UserProfile> {
        let mut conn = self.conn().await?;

        let json = serde_json::to_string(profile)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Serialization error: {}", e)))?;

        let created: bool = conn
            .set_nx(user_key(&profile.uid), json)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        if created {
            return Ok(profile.clone());
        }

        // First write won; hand back the stored profile.
        UserStore::get(self, &profile.uid)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}
