// src/routes/data.rs
//! Latest-reading endpoint for the vital-signs bridge.
//!
//! `GET /data` returns the single most recently stored reading as JSON,
//! regardless of which metric or channel produced it. The row is whatever
//! the store considers newest; with concurrent ingestion writes in flight,
//! two back-to-back calls may legitimately disagree.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use tracing::error;

use super::AppState;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/data", get(handler))
}

async fn handler(State(store): State<AppState>) -> impl IntoResponse {
    // ---
    match store.latest_reading().await {
        Ok(Some(reading)) => (StatusCode::OK, Json(reading)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Json("No readings recorded yet")).into_response(),
        Err(e) => {
            error!("Failed to fetch latest reading: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json("Failed to fetch data"),
            )
                .into_response()
        }
    }
}
