use crate::error::{AppError, Result};
use crate::models::api::SignInResponse;
use crate::models::user::UserProfile;
use crate::services::token::{issue_token, TokenClaims};
use crate::state::AppState;
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

/// Identity claims returned by the provider for a verified credential.
#[derive(Debug, Clone)]
pub struct Identity {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Seam to the external identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a sign-in credential. Any verification failure maps to
    /// `Unauthorized`; the provider never creates or mutates profiles.
    async fn verify(&self, credential: &str) -> Result<Identity>;
}

/// Verifies credentials against the provider's token-info endpoint.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpIdentityProvider {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenInfoResponse {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify(&self, credential: &str) -> Result<Identity> {
        if credential.is_empty() {
            return Err(AppError::Unauthorized);
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("id_token", credential)])
            .send()
            .await
            .map_err(|e| {
                warn!("Identity verification request failed: {}", e);
                AppError::Unauthorized
            })?;

        if !response.status().is_success() {
            warn!("Identity provider rejected credential: {}", response.status());
            return Err(AppError::Unauthorized);
        }

        let info: TokenInfoResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse identity response: {}", e);
            AppError::Unauthorized
        })?;

        Ok(Identity {
            uid: info.sub,
            display_name: info.name,
            email: info.email,
        })
    }
}

/// Exchange a provider credential for an API token, lazily creating the
/// profile on first sign-in. The username chosen then is immutable; later
/// sign-ins ignore the field.
pub async fn sign_in(
    state: &AppState,
    credential: &str,
    username: Option<&str>,
) -> Result<SignInResponse> {
    let identity = state.identity.verify(credential).await?;

    let profile = match state.users.get(&identity.uid).await? {
        Some(existing) => existing,
        None => {
            let username = username.map(str::trim).unwrap_or("");
            if username.is_empty() {
                return Err(AppError::Validation("username is required".to_string()));
            }
            let profile = UserProfile {
                uid: identity.uid.clone(),
                username: username.to_string(),
                email: identity.email.clone().unwrap_or_default(),
            };
            let stored = state.users.insert_if_absent(&profile).await?;
            info!("Created profile for {}", stored.uid);
            stored
        }
    };

    let claims = TokenClaims {
        uid: profile.uid.clone(),
        username: profile.username.clone(),
        email: profile.email.clone(),
        exp: Utc::now().timestamp() + state.config.auth.token_ttl_seconds as i64,
    };
    let token = issue_token(&state.token_key(), &claims)?;

    Ok(SignInResponse { token, profile })
}
