// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod predict_webcam;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::{HealthResponse, RootResponse, LIVENESS_MESSAGE};
pub use http_server::{create_app, start_server, AppState, MAX_REQUEST_BODY_SIZE};
pub use predict_webcam::{
    predict_webcam_handler, FeedbackResponse, PredictWebcamRequest, PredictWebcamResponse,
};
