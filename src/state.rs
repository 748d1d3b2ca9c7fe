use crate::config::Config;
use crate::services::identity::{HttpIdentityProvider, IdentityProvider};
use crate::services::tag_suggest::TagSuggester;
use crate::store::redis::RedisStore;
use crate::store::{SessionStore, UserStore};
use deadpool_redis::redis::cmd;
use deadpool_redis::{Config as RedisConfig, PoolConfig, Runtime};
use hmac::Hmac;
use sha2::Sha256;
use std::sync::Arc;

pub type HmacKey = Hmac<Sha256>;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub users: Arc<dyn UserStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub tags: Arc<TagSuggester>,
    pub config: Arc<Config>,
    pub token_key_bytes: Arc<Vec<u8>>,
}

impl AppState {
    /// Production wiring: Redis-backed stores and the HTTP identity
    /// provider. Verifies the Redis connection before serving.
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        let mut redis_config = RedisConfig::from_url(config.redis.url.clone());

        redis_config.pool = Some(PoolConfig {
            max_size: config.redis.max_connections as usize,
            ..Default::default()
        });

        let redis = redis_config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| anyhow::anyhow!("Failed to create Redis pool: {}", e))?;

        // Verify the connection with a ping before accepting traffic
        let mut conn = redis
            .get()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get Redis connection: {}", e))?;
        let _: String = cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(|e| anyhow::anyhow!("Redis connection test failed: {}", e))?;
        drop(conn);

        let store = Arc::new(RedisStore::new(redis));
        let identity = Arc::new(HttpIdentityProvider::new(
            config.auth.identity_endpoint.clone(),
        ));

        Ok(Self::assemble(config, store.clone(), store, identity))
    }

    /// Wire the state from explicit parts. Tests use this with the
    /// in-memory store and a stub identity provider.
    pub fn assemble(
        config: Config,
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let key_bytes = config.auth.token_secret.as_bytes().to_vec();
        let tags = Arc::new(TagSuggester::new(&config.gemini));

        Self {
            sessions,
            users,
            identity,
            tags,
            config: Arc::new(config),
            token_key_bytes: Arc::new(key_bytes),
        }
    }

    /// Signing key for API tokens.
    pub fn token_key(&self) -> HmacKey {
        use hmac::Mac;
        Hmac::<Sha256>::new_from_slice(&self.token_key_bytes)
            .expect("HMAC key should be valid")
    }
}
