// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Webcam prediction request types

use serde::{Deserialize, Serialize};

use crate::analysis::Mode;

/// Request for webcam frame analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictWebcamRequest {
    /// Base64-encoded frame, optionally as a data URL
    #[serde(default)]
    pub frame: Option<String>,

    /// "beginner" or "pro"; anything else means beginner
    #[serde(default)]
    pub mode: Option<String>,

    /// Client-chosen id that keeps rep counts across frames
    #[serde(default, alias = "session_id")]
    pub session_id: Option<String>,
}

impl PredictWebcamRequest {
    /// The frame payload, if one was actually sent
    pub fn frame(&self) -> Option<&str> {
        self.frame.as_deref().filter(|f| !f.trim().is_empty())
    }

    pub fn mode(&self) -> Mode {
        Mode::from_request(self.mode.as_deref())
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|s| !s.is_empty())
    }
}
