use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_server")]
    pub server: ServerConfig,
    #[serde(default = "default_redis")]
    pub redis: RedisConfig,
    #[serde(default = "default_cors")]
    pub cors: CorsConfig,
    #[serde(default = "default_gemini")]
    pub gemini: GeminiConfig,
    pub auth: AuthConfig,
}

fn default_server() -> ServerConfig {
    ServerConfig {
        host: "0.0.0.0".to_string(),
        port: 3001,
    }
}

fn default_redis() -> RedisConfig {
    RedisConfig {
        url: "redis://localhost:6379".to_string(),
        max_connections: 16,
    }
}

fn default_cors() -> CorsConfig {
    CorsConfig {
        allowed_origin: default_cors_origin(),
    }
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_gemini() -> GeminiConfig {
    GeminiConfig {
        api_key: String::new(),
        endpoint: default_gemini_endpoint(),
        model: default_gemini_model(),
    }
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_identity_endpoint() -> String {
    "https://oauth2.googleapis.com/tokeninfo".to_string()
}

fn default_token_ttl() -> u64 {
    86400 // 24 hours
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_cors_origin")]
    pub allowed_origin: String,
}

/// Identity verification and API token signing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret for signing API tokens. Required.
    pub token_secret: String,

    /// API token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,

    /// Token-info endpoint of the identity provider.
    #[serde(default = "default_identity_endpoint")]
    pub identity_endpoint: String,
}

/// Tag suggestion endpoint. An empty api_key disables suggestions; the
/// suggest call then returns an empty list instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: default_server(),
            redis: default_redis(),
            cors: default_cors(),
            gemini: default_gemini(),
            auth: AuthConfig {
                token_secret: String::new(),
                token_ttl_seconds: default_token_ttl(),
                identity_endpoint: default_identity_endpoint(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, figment::Error> {
        dotenvy::dotenv().ok();

        use figment::{providers::Env, Figment};

        // Support REDIS_URL (managed-Redis format) alongside REDIS__URL
        if std::env::var("REDIS__URL").is_err() {
            if let Ok(redis_url) = std::env::var("REDIS_URL") {
                std::env::set_var("REDIS__URL", redis_url);
            }
        }

        let config: Config = Figment::new()
            .merge(Env::raw().split("__"))
            .extract()?;

        if config.auth.token_secret.is_empty() {
            return Err(figment::Error::from("AUTH__TOKEN_SECRET is required".to_string()));
        }

        Ok(config)
    }
}
