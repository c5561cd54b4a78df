// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Webcam prediction response types

use serde::{Deserialize, Serialize};

use crate::analysis::FrameAnalysis;

/// Message returned when the request carries no frame
pub const NO_FRAME_MESSAGE: &str = "No frame received";

/// Feedback returned when the processor flagged nothing
pub const NO_FEEDBACK_MESSAGE: &str = "No feedback detected";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub feedback: String,
    /// Good reps so far (session requests only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squat_count: Option<u32>,
    /// Improper reps so far (session requests only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improper_squat_count: Option<u32>,
}

/// Body of `POST /predict_webcam/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PredictWebcamResponse {
    Feedback(FeedbackResponse),
    Rejected { error: String },
}

impl PredictWebcamResponse {
    pub fn no_frame() -> Self {
        PredictWebcamResponse::Rejected {
            error: NO_FRAME_MESSAGE.to_string(),
        }
    }

    /// Build the feedback body; counters are reported only for sessions
    pub fn from_analysis(analysis: &FrameAnalysis, with_counts: bool) -> Self {
        let feedback = analysis
            .feedback_text()
            .unwrap_or_else(|| NO_FEEDBACK_MESSAGE.to_string());

        PredictWebcamResponse::Feedback(FeedbackResponse {
            feedback,
            squat_count: with_counts.then_some(analysis.squat_count),
            improper_squat_count: with_counts.then_some(analysis.improper_squat),
        })
    }
}
