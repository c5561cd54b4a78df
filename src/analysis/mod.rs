// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Squat form analysis
//!
//! Components:
//! - `geometry` - joint angles in pixel space
//! - `thresholds` - beginner/pro threshold sets and TOML overrides
//! - `state` - squat state sequence and rep counting
//! - `feedback` - feedback messages
//! - `processor` - per-frame pipeline tying the above together

pub mod feedback;
pub mod geometry;
pub mod processor;
pub mod state;
pub mod thresholds;

pub use feedback::{render_feedback, FeedbackKind};
pub use geometry::{find_angle, vertical_angle, Point};
pub use processor::{FrameAnalysis, FrameProcessor, JointAngles, DEFAULT_MIN_KEYPOINT_CONFIDENCE};
pub use state::{SquatState, StateTracker};
pub use thresholds::{AngleRange, ConfigError, Mode, Thresholds, ThresholdsConfig};
