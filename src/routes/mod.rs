use crate::controllers::{auth, health, session, tags};
use crate::middleware::create_cors_layer;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn create_router(state: AppState) -> Router {
    let cors = create_cors_layer(&state.config.cors);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/signin", post(auth::sign_in))
        .route(
            "/api/sessions",
            get(session::list_sessions).post(session::create_session),
        )
        .route(
            "/api/sessions/:session_id",
            get(session::get_session)
                .put(session::update_session)
                .delete(session::delete_session),
        )
        .route("/api/sessions/:session_id/join", post(session::join_session))
        .route("/api/sessions/:session_id/leave", post(session::leave_session))
        .route("/api/tags/suggest", post(tags::suggest_tags))
        .layer(cors)
        .with_state(state)
}
