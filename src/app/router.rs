use super::state::AppState;
use crate::handler::health::health_handler;
use crate::handler::log::{log_handler, log_to_handler};
use axum::Router;
use axum::routing::{get, post};

/// Build the HTTP router (health + log).
pub fn router(state: AppState) -> Router {
    let v1_health_router = Router::new().route("/v1/health", get(health_handler));

    let v1_log_router = Router::new()
        .route("/v1/log", post(log_handler))
        .route("/v1/log/{provider}", post(log_to_handler))
        .with_state(state);

    Router::new().merge(v1_health_router).merge(v1_log_router)
}
