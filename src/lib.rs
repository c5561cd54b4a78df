// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod pose;
pub mod sessions;
pub mod version;
pub mod vision;

pub use analysis::{FrameAnalysis, FrameProcessor, Mode, Thresholds, ThresholdsConfig};
pub use api::{create_app, start_server, AppState};
pub use config::ServerConfig;
pub use pose::{MoveNetEstimator, Pose, PoseEstimator};
