// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::Serialize;

/// Corrections and notices produced while analysing a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    BendBackwards,
    BendForward,
    KneeOverToe,
    SquatTooDeep,
    LowerHips,
    CameraNotAligned,
    InactivityReset,
}

impl FeedbackKind {
    /// Posture flags that stay on screen for a number of frames, by slot
    pub const DISPLAY_SLOTS: [FeedbackKind; 4] = [
        FeedbackKind::BendBackwards,
        FeedbackKind::BendForward,
        FeedbackKind::KneeOverToe,
        FeedbackKind::SquatTooDeep,
    ];

    pub fn message(&self) -> &'static str {
        match self {
            FeedbackKind::BendBackwards => "BEND BACKWARDS",
            FeedbackKind::BendForward => "BEND FORWARD",
            FeedbackKind::KneeOverToe => "KNEE FALLING OVER TOE",
            FeedbackKind::SquatTooDeep => "SQUAT TOO DEEP",
            FeedbackKind::LowerHips => "LOWER YOUR HIPS",
            FeedbackKind::CameraNotAligned => "CAMERA NOT ALIGNED PROPERLY!!!",
            FeedbackKind::InactivityReset => "RESETTING COUNTERS DUE TO INACTIVITY!!!",
        }
    }
}

/// Join feedback messages for the response body; `None` when nothing was flagged
pub fn render_feedback(kinds: &[FeedbackKind]) -> Option<String> {
    if kinds.is_empty() {
        return None;
    }
    Some(
        kinds
            .iter()
            .map(FeedbackKind::message)
            .collect::<Vec<_>>()
            .join(" | "),
    )
}
