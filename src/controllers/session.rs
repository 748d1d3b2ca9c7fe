use crate::error::Result;
use crate::extractors::AuthUser;
use crate::models::api::SessionView;
use crate::models::session::{Session, SessionDraft, SessionQuery};
use crate::services::session::SessionService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

pub async fn create_session(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(draft): Json<SessionDraft>,
) -> Result<(StatusCode, Json<Session>)> {
    let session = SessionService::create(&state, &draft, &actor).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    _actor: AuthUser,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Vec<Session>>> {
    let sessions = SessionService::list(&state, &query).await?;
    Ok(Json(sessions))
}

pub async fn get_session(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>> {
    let session = SessionService::get(&state, &session_id).await?;
    Ok(Json(SessionView::for_viewer(session, &actor.uid)))
}

pub async fn update_session(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(session_id): Path<String>,
    Json(draft): Json<SessionDraft>,
) -> Result<Json<Session>> {
    let session = SessionService::update(&state, &session_id, &draft, &actor).await?;
    Ok(Json(session))
}

pub async fn delete_session(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(session_id): Path<String>,
) -> Result<StatusCode> {
    SessionService::delete(&state, &session_id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn join_session(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>> {
    let session = SessionService::join(&state, &session_id, &actor).await?;
    Ok(Json(SessionView::for_viewer(session, &actor.uid)))
}

pub async fn leave_session(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>> {
    let session = SessionService::leave(&state, &session_id, &actor).await?;
    Ok(Json(SessionView::for_viewer(session, &actor.uid)))
}
