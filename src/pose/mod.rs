// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pose estimation
//!
//! - `keypoint` - MoveNet keypoint layout and pose container
//! - `preprocess` - frame to tensor conversion
//! - `estimator` - ONNX Runtime backed MoveNet model

pub mod estimator;
pub mod keypoint;
pub mod preprocess;

pub use estimator::{MoveNetEstimator, PoseEstimator, PoseModelConfig};
pub use keypoint::{Keypoint, KeypointIndex, Pose};
pub use preprocess::{preprocess_for_movenet, MOVENET_INPUT_SIZE};
