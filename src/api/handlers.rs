// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::api::http_server::AppState;

/// Liveness message served at `/`
pub const LIVENESS_MESSAGE: &str = "Pose Correction API is running in webcam mode!";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub pose_model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pose_model: Option<String>,
    pub active_sessions: usize,
}

/// GET /
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: LIVENESS_MESSAGE.to_string(),
    })
}

/// GET /health
///
/// Reports "degraded" while the pose model is missing; the server still
/// answers liveness and missing-frame requests in that state.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let pose_model = state
        .pose_estimator
        .read()
        .await
        .as_ref()
        .map(|estimator| estimator.name().to_string());

    let status = if pose_model.is_some() {
        "healthy"
    } else {
        "degraded"
    };

    state.sessions.cleanup_expired(Instant::now()).await;

    Json(HealthResponse {
        status: status.to_string(),
        version: crate::version::VERSION_NUMBER.to_string(),
        pose_model_loaded: pose_model.is_some(),
        pose_model,
        active_sessions: state.sessions.len().await,
    })
}
