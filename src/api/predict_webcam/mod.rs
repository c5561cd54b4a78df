// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Webcam prediction endpoint module
//!
//! Provides POST /predict_webcam/ for squat form feedback.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::predict_webcam_handler;
pub use request::PredictWebcamRequest;
pub use response::{FeedbackResponse, PredictWebcamResponse, NO_FEEDBACK_MESSAGE, NO_FRAME_MESSAGE};
