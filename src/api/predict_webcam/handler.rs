// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Webcam prediction endpoint handler

use axum::{extract::State, Json};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::request::PredictWebcamRequest;
use super::response::PredictWebcamResponse;
use crate::analysis::FrameProcessor;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::decode_base64_frame;

/// POST /predict_webcam/ - Squat feedback for one webcam frame
///
/// # Request
/// - `frame`: Base64-encoded image or data URL (required)
/// - `mode`: "beginner" or "pro" - anything else is treated as beginner
/// - `sessionId`: Optional id; frames with the same id share rep counting
///
/// # Response
/// - `feedback`: Feedback messages joined by " | ", or "No feedback detected"
/// - `squatCount`, `improperSquatCount`: Only for session requests
/// - `error`: "No frame received" when `frame` is missing (HTTP 200)
///
/// # Errors
/// - 500 Internal Server Error: Frame could not be decoded or pose inference failed
/// - 503 Service Unavailable: Pose model not loaded
pub async fn predict_webcam_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictWebcamRequest>,
) -> Result<Json<PredictWebcamResponse>, ApiError> {
    let Some(frame_data) = request.frame() else {
        debug!("Prediction request without frame");
        return Ok(Json(PredictWebcamResponse::no_frame()));
    };

    let mode = request.mode();

    let (frame, frame_info) = decode_base64_frame(frame_data).map_err(|e| {
        warn!("Failed to decode frame: {}", e);
        ApiError::from(e)
    })?;

    debug!(
        "Decoded frame: {}x{}, {} bytes, mode {}",
        frame_info.width, frame_info.height, frame_info.size_bytes, mode
    );

    let estimator = state.pose_estimator.read().await.clone().ok_or_else(|| {
        warn!("Pose model not loaded");
        ApiError::ServiceUnavailable("Pose model not loaded".to_string())
    })?;

    let started = Instant::now();
    let pose = tokio::task::spawn_blocking(move || estimator.estimate(&frame))
        .await
        .map_err(|e| ApiError::InternalError(format!("Pose inference task failed: {}", e)))?
        .map_err(|e| {
            warn!("Pose inference failed: {:#}", e);
            ApiError::from(e)
        })?;

    let thresholds = state.thresholds.get(mode);
    let now = Instant::now();

    let response = match request.session_id() {
        Some(session_id) => {
            let session = state
                .sessions
                .get_or_create(session_id, mode, thresholds, now)
                .await;
            let mut session = session.lock().await;
            let analysis =
                session
                    .processor
                    .process_pose(&pose, frame_info.width, frame_info.height, now);
            PredictWebcamResponse::from_analysis(&analysis, true)
        }
        None => {
            let mut processor =
                FrameProcessor::new(thresholds.clone(), state.min_keypoint_confidence, now);
            let analysis = processor.process_pose(&pose, frame_info.width, frame_info.height, now);
            PredictWebcamResponse::from_analysis(&analysis, false)
        }
    };

    info!(
        "Frame analysed in {}ms (mode {}, session {})",
        started.elapsed().as_millis(),
        mode,
        request.session_id().unwrap_or("-")
    );

    Ok(Json(response))
}

