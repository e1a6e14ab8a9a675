use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use super::AppState;
use crate::ack::DETAILED_FALLBACK;
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

/// Validation failures are safe to show the user as-is.
fn validation_error(e: ValidationError) -> (StatusCode, String) {
    tracing::warn!("Validation error: {}", e);
    (StatusCode::BAD_REQUEST, e.to_string())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Feedback
// ============================================================

pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(input): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, (StatusCode, String)> {
    input.validate().map_err(validation_error)?;

    let mut ai_response = state
        .acknowledger
        .acknowledge(input.rating, &input.review)
        .await;
    if ai_response.trim().is_empty() {
        ai_response = DETAILED_FALLBACK.to_string();
    }

    let record = FeedbackRecord::new(input.rating, input.review, ai_response.clone());
    let value = serde_json::to_string(&record).map_err(internal_error)?;
    let key = record.storage_key();

    if state.store.set(&key, &value, state.verbose_storage).await {
        tracing::info!(key = %key, rating = record.rating, "Feedback recorded");
    } else {
        tracing::warn!(key = %key, "Feedback could not be recorded");
    }

    Ok(Json(FeedbackResponse { ai_response }))
}
