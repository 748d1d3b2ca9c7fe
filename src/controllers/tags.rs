use crate::extractors::AuthUser;
use crate::models::api::{SuggestTagsRequest, SuggestTagsResponse};
use crate::state::AppState;
use axum::{extract::State, Json};

/// Best-effort tag suggestions; an unreachable or failing suggestion
/// service yields an empty list, never an error.
pub async fn suggest_tags(
    State(state): State<AppState>,
    _actor: AuthUser,
    Json(req): Json<SuggestTagsRequest>,
) -> Json<SuggestTagsResponse> {
    let tags = state.tags.suggest(&req.title, &req.description).await;
    Json(SuggestTagsResponse { tags })
}
