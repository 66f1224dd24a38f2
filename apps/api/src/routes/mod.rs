pub mod health;

use axum::{routing::get, Router};

use crate::card::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/latest.png", get(handlers::handle_latest_png))
        .with_state(state)
}
