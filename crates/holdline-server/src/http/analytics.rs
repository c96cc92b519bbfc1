use crate::http::error::AppError;
use crate::http::state::AppState;
use axum::extract::State;
use axum::http::header::CACHE_CONTROL;
use axum::response::{IntoResponse, Response};
use axum::Json;
use holdline_core::time::now_utc;

pub async fn snapshot(State(state): State<AppState>) -> Result<Response, AppError> {
    let recent = state.settings.recent_calls;
    let window = state.settings.active_window_secs;
    let now = now_utc();
    let dto = state
        .with_store(move |store| store.analytics().snapshot(now, recent, window))
        .await?;
    Ok(([(CACHE_CONTROL, "no-cache")], Json(dto)).into_response())
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
