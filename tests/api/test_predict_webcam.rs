// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /predict_webcam/ tests
//!
//! These tests verify that:
//! - A missing frame yields the "No frame received" payload
//! - Mode selection falls back to beginner thresholds
//! - Decode and inference failures surface as server errors
//! - A missing pose model answers 503

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use pose_correction_api::api::{create_app, AppState};
use pose_correction_api::pose::PoseEstimator;
use pose_correction_api::vision::image_utils::MAX_FRAME_SIZE;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

use crate::common::{
    forward_knee_squat, standing, FailingPoseEstimator, FixedPoseEstimator, TINY_PNG_BASE64,
};

async fn app_with(estimator: Option<Arc<dyn PoseEstimator>>) -> Router {
    let state = AppState::new_for_test();
    if let Some(estimator) = estimator {
        state.set_pose_estimator(estimator).await;
    }
    create_app(Arc::new(state))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body_bytes).unwrap())
}

#[tokio::test]
async fn test_missing_frame_returns_error_payload() {
    let estimator = Arc::new(FixedPoseEstimator::new(standing()));
    let app = app_with(Some(estimator.clone())).await;

    let (status, body) = post_json(app, "/predict_webcam/", json!({"mode": "pro"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": "No frame received"}));
    assert_eq!(estimator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_frame_returns_error_payload() {
    let app = app_with(None).await;
    let (status, body) = post_json(app, "/predict_webcam/", json!({"frame": ""})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": "No frame received"}));
}

#[tokio::test]
async fn test_standing_frame_has_no_feedback() {
    let app = app_with(Some(Arc::new(FixedPoseEstimator::new(standing())))).await;
    let (status, body) = post_json(
        app,
        "/predict_webcam/",
        json!({"frame": TINY_PNG_BASE64, "mode": "beginner"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"feedback": "No feedback detected"}));
}

#[tokio::test]
async fn test_mode_absent_uses_beginner_thresholds() {
    // 40 degree shin angle passes beginner (45) but fails pro (30)
    let estimator: Arc<dyn PoseEstimator> = Arc::new(FixedPoseEstimator::new(forward_knee_squat()));

    let app = app_with(Some(estimator.clone())).await;
    let (_, absent) = post_json(app, "/predict_webcam/", json!({"frame": TINY_PNG_BASE64})).await;

    let app = app_with(Some(estimator.clone())).await;
    let (_, unknown) = post_json(
        app,
        "/predict_webcam/",
        json!({"frame": TINY_PNG_BASE64, "mode": "olympic"}),
    )
    .await;

    let app = app_with(Some(estimator)).await;
    let (_, pro) = post_json(
        app,
        "/predict_webcam/",
        json!({"frame": TINY_PNG_BASE64, "mode": "PRO"}),
    )
    .await;

    assert_eq!(absent, json!({"feedback": "No feedback detected"}));
    assert_eq!(unknown, json!({"feedback": "No feedback detected"}));
    assert_eq!(pro, json!({"feedback": "KNEE FALLING OVER TOE"}));
}

#[tokio::test]
async fn test_data_url_frame_accepted() {
    let app = app_with(Some(Arc::new(FixedPoseEstimator::new(standing())))).await;
    let frame = format!("data:image/png;base64,{}", TINY_PNG_BASE64);
    let (status, body) = post_json(app, "/predict_webcam/", json!({ "frame": frame })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("feedback").is_some());
}

#[tokio::test]
async fn test_route_without_trailing_slash() {
    let app = app_with(Some(Arc::new(FixedPoseEstimator::new(standing())))).await;
    let (status, body) = post_json(app, "/predict_webcam", json!({"frame": TINY_PNG_BASE64})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feedback"], "No feedback detected");
}

#[tokio::test]
async fn test_malformed_base64_is_server_error() {
    let app = app_with(Some(Arc::new(FixedPoseEstimator::new(standing())))).await;
    let (status, body) = post_json(
        app,
        "/predict_webcam/",
        json!({"frame": "not-valid-base64!!!"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["errorType"], "frame_decode_error");
}

#[tokio::test]
async fn test_non_image_bytes_is_server_error() {
    let app = app_with(Some(Arc::new(FixedPoseEstimator::new(standing())))).await;
    // "hello world" is valid base64 of plain text
    let (status, body) = post_json(
        app,
        "/predict_webcam/",
        json!({"frame": "aGVsbG8gd29ybGQ="}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["errorType"], "frame_decode_error");
    assert_eq!(body["error"], "Unsupported image format");
}

/// Base64 of `bytes` zero bytes, rounded up to a whole base64 quantum
fn zero_frame(bytes: usize) -> String {
    "AAAA".repeat(bytes.div_ceil(3))
}

#[tokio::test]
async fn test_multi_megabyte_frame_reaches_decoder() {
    let app = app_with(Some(Arc::new(FixedPoseEstimator::new(standing())))).await;
    // About 4MB of JSON, over axum's default body limit
    let (status, body) = post_json(
        app,
        "/predict_webcam/",
        json!({"frame": zero_frame(3 * 1024 * 1024)}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["errorType"], "frame_decode_error");
    assert_eq!(body["error"], "Unsupported image format");
}

#[tokio::test]
async fn test_oversized_frame_is_json_error() {
    let app = app_with(Some(Arc::new(FixedPoseEstimator::new(standing())))).await;
    let (status, body) = post_json(
        app,
        "/predict_webcam/",
        json!({"frame": zero_frame(MAX_FRAME_SIZE + 1)}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["errorType"], "frame_decode_error");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Frame data is too large"));
}

#[tokio::test]
async fn test_inference_failure_is_server_error() {
    let app = app_with(Some(Arc::new(FailingPoseEstimator))).await;
    let (status, body) = post_json(app, "/predict_webcam/", json!({"frame": TINY_PNG_BASE64})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["errorType"], "internal_error");
    assert!(body["error"].as_str().unwrap().contains("onnx runtime exploded"));
}

#[tokio::test]
async fn test_model_not_loaded_is_unavailable() {
    let app = app_with(None).await;
    let (status, body) = post_json(app, "/predict_webcam/", json!({"frame": TINY_PNG_BASE64})).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["errorType"], "service_unavailable");
}

#[tokio::test]
async fn test_get_not_allowed() {
    let app = app_with(None).await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/predict_webcam/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
