// src/routes/insert.rs
//! Manual insert endpoint for the vital-signs bridge.
//!
//! `POST /insertData` writes one reading row exactly as given in the JSON
//! body. The request bypasses the ingestion pipeline entirely: no topic
//! classification, no payload validation, and no session identity — the
//! caller supplies the patient, metric code, and state directly.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use tracing::{error, info};

use crate::InsertRequest;

use super::AppState;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/insertData", post(handler))
}

async fn handler(
    State(store): State<AppState>,
    Json(req): Json<InsertRequest>,
) -> impl IntoResponse {
    // ---
    info!(
        patient_id = req.patient_id,
        metric = req.metric,
        "POST /insertData - manual reading"
    );

    match store
        .insert_reading(req.patient_id, req.metric, req.value, req.state)
        .await
    {
        Ok(()) => (StatusCode::OK, Json("Reading stored")).into_response(),
        Err(e) => {
            error!("Failed to insert reading: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json("Failed to insert reading"),
            )
                .into_response()
        }
    }
}
