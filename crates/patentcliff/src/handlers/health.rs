//! Liveness endpoints.

use axum::Json;
use serde_json::{json, Value};

/// GET / - Confirms the backend is up.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Patent Cliff backend running" }))
}

/// GET /api/health - Liveness probe, no storage checks.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
