//! Moderator decision intake.

use axum::Json;
use serde::Serialize;
use tracing::info;

/// Ack for a recorded decision.
#[derive(Serialize)]
pub struct DecisionAck {
    pub status: String,
}

/// `POST /api/admin-decision` — log a moderator's decision payload.
///
/// The decision schema is owned by the frontend; the backend only records
/// it in the structured log stream.
pub async fn admin_decision(Json(decision): Json<serde_json::Value>) -> Json<DecisionAck> {
    info!(decision = %decision, "Moderator decision recorded");
    Json(DecisionAck {
        status: "ok".to_string(),
    })
}
