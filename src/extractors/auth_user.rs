use crate::error::AppError;
use crate::services::token::verify_token;
use crate::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

/// Verified caller identity, decoded from the bearer token. Handlers take
/// this as an argument, so the auth context is always explicit.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub username: String,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;
        let claims = verify_token(&state.token_key(), token)?;

        Ok(AuthUser {
            uid: claims.uid,
            username: claims.username,
            email: claims.email,
        })
    }
}
