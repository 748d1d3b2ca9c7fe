use crate::error::{AppError, Result};
use crate::state::HmacKey;
use base64::{engine::general_purpose, Engine};
use chrono::Utc;
use hmac::Mac;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// Claims carried by an API token: the signed-in identity plus expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub uid: String,
    pub username: String,
    pub email: String,
    pub exp: i64,
}

/// Sign claims into a `payload.signature` token.
pub fn issue_token(key: &HmacKey, claims: &TokenClaims) -> Result<String> {
    let payload = serde_json::to_vec(claims)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Serialization error: {}", e)))?;
    let body = general_purpose::URL_SAFE_NO_PAD.encode(payload);

    let mut mac = key.clone();
    mac.update(body.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", body, signature))
}

/// Verify signature and expiry, returning the claims.
pub fn verify_token(key: &HmacKey, token: &str) -> Result<TokenClaims> {
    let (body, signature) = token.split_once('.').ok_or(AppError::Unauthorized)?;

    let mut mac = key.clone();
    mac.update(body.as_bytes());
    let expected = mac.finalize().into_bytes();

    let provided = hex::decode(signature).unwrap_or_default();

    // Constant-time comparison
    if !bool::from(provided.ct_eq(expected.as_slice())) {
        return Err(AppError::Unauthorized);
    }

    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(body)
        .map_err(|_| AppError::Unauthorized)?;
    let claims: TokenClaims =
        serde_json::from_slice(&payload).map_err(|_| AppError::Unauthorized)?;

    if claims.exp < Utc::now().timestamp() {
        return Err(AppError::Unauthorized);
    }

    Ok(claims)
}
