//! Gateway Health API

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Serialize)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub version: String,
    pub model_provider: String,
    pub ocr_engine: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /api/health`. Reports on this process only; the model
/// server and OCR binary are not probed.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok".into(),
        service: "codelens".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        model_provider: state.agent.provider_name().to_string(),
        ocr_engine: state.agent.ocr_name().to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
    })
}
