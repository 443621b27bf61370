pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::results::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/profile/fields", get(handlers::handle_profile_fields))
        .route("/api/v1/matches", post(handlers::handle_match))
        .route(
            "/api/v1/explanations/parse",
            post(handlers::handle_parse_explanation),
        )
        .with_state(state)
}
