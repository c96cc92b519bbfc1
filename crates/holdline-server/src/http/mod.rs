//! HTTP surface: telephony webhooks, the analytics API and static assets.

pub mod analytics;
pub mod error;
pub mod extract;
pub mod state;
pub mod twilio;

pub use state::{AppState, ServiceSettings};

use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState, assets_dir: &Path) -> Router {
    Router::new()
        .route("/twilio/voice", post(twilio::voice))
        .route("/twilio/status", post(twilio::status))
        .route("/api/analytics", get(analytics::snapshot))
        .route("/health", get(analytics::health))
        .fallback_service(ServeDir::new(assets_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
