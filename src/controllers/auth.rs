use crate::error::Result;
use crate::models::api::{SignInRequest, SignInResponse};
use crate::services::identity;
use crate::state::AppState;
use axum::{extract::State, Json};

/// Exchange an identity-provider credential for an API token. The first
/// sign-in must carry the username the profile will keep.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SignInResponse>> {
    let response = identity::sign_in(&state, &req.credential, req.username.as_deref()).await?;
    Ok(Json(response))
}
