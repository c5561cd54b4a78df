// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Pose Correction API

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-webcam-squat-feedback-2025-11-02";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-11-02";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "webcam-frames",
    "data-url-frames",
    "movenet-onnx",
    "squat-feedback",
    "beginner-pro-thresholds",
    "threshold-overrides",
    "rep-counting-sessions",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Pose Correction API {} ({})", VERSION_NUMBER, BUILD_DATE)
}
