use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::AppState;

pub async fn healthcheck_handler(
    State(state): State<AppState>,
) -> impl IntoResponse {
    Json(json!({
        "status": "available",
        "system_info": {
            "environment": state.config.environment,
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}
