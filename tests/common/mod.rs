// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared fixtures: stub pose estimators and frames
#![allow(dead_code)]

use anyhow::Result;
use image::DynamicImage;
use pose_correction_api::pose::{Keypoint, KeypointIndex, Pose, PoseEstimator};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// 1x1 red PNG image (base64)
pub const TINY_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

/// Side-view pose from positions on a 1000x1000 grid, left side nearer the camera
pub fn side_pose(
    shoulder: (f32, f32),
    hip: (f32, f32),
    knee: (f32, f32),
    ankle: (f32, f32),
) -> Pose {
    let n = |(x, y): (f32, f32)| Keypoint::new(x / 1000.0, y / 1000.0, 0.9);
    let mut pose = Pose::new([Keypoint::new(0.5, 0.5, 0.9); KeypointIndex::COUNT]);
    pose.set(KeypointIndex::Nose, n((shoulder.0 + 10.0, shoulder.1 - 80.0)));
    pose.set(KeypointIndex::LeftShoulder, n(shoulder));
    pose.set(KeypointIndex::RightShoulder, n((shoulder.0 + 2.0, shoulder.1)));
    pose.set(KeypointIndex::LeftHip, n(hip));
    pose.set(KeypointIndex::RightHip, n((hip.0 + 2.0, hip.1)));
    pose.set(KeypointIndex::LeftKnee, n(knee));
    pose.set(KeypointIndex::RightKnee, n((knee.0 + 2.0, knee.1)));
    pose.set(KeypointIndex::LeftAnkle, n(ankle));
    pose.set(KeypointIndex::RightAnkle, n((ankle.0 + 2.0, ankle.1 - 5.0)));
    pose
}

pub fn standing() -> Pose {
    side_pose((500.0, 200.0), (500.0, 500.0), (505.0, 700.0), (500.0, 900.0))
}

/// Knee-vertical 45 degrees
pub fn half_squat() -> Pose {
    side_pose((546.0, 297.0), (450.0, 560.0), (590.0, 700.0), (560.0, 900.0))
}

/// Knee-vertical 80 degrees
pub fn deep_squat() -> Pose {
    side_pose((547.0, 408.0), (420.0, 680.0), (620.0, 715.0), (590.0, 900.0))
}

/// Knee-vertical 75 degrees: bottom of the squat for beginners, between states for pros
pub fn beginner_depth_squat() -> Pose {
    // hip - knee = (-193, -52)
    side_pose((547.0, 408.0), (420.0, 680.0), (613.0, 732.0), (590.0, 900.0))
}

/// Knee-vertical 45 degrees with the shin 40 degrees off vertical
pub fn forward_knee_squat() -> Pose {
    side_pose((546.0, 297.0), (450.0, 560.0), (590.0, 700.0), (462.0, 853.0))
}

/// Hips below the knees, knee-vertical 105 degrees
pub fn too_deep_squat() -> Pose {
    side_pose((547.0, 408.0), (427.0, 767.0), (620.0, 715.0), (590.0, 900.0))
}

/// Knee-vertical 45 degrees with the torso almost vertical
pub fn upright_squat() -> Pose {
    side_pose((460.0, 260.0), (450.0, 560.0), (590.0, 700.0), (560.0, 900.0))
}

/// Always returns the same pose
pub struct FixedPoseEstimator {
    pose: Pose,
    pub calls: AtomicUsize,
}

impl FixedPoseEstimator {
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            calls: AtomicUsize::new(0),
        }
    }
}

impl PoseEstimator for FixedPoseEstimator {
    fn estimate(&self, _frame: &DynamicImage) -> Result<Pose> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pose.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Plays back poses in order, then repeats the last one
pub struct ScriptedPoseEstimator {
    poses: Mutex<VecDeque<Pose>>,
    last: Mutex<Pose>,
}

impl ScriptedPoseEstimator {
    pub fn new(poses: Vec<Pose>) -> Self {
        Self {
            poses: Mutex::new(poses.into()),
            last: Mutex::new(Pose::default()),
        }
    }
}

impl PoseEstimator for ScriptedPoseEstimator {
    fn estimate(&self, _frame: &DynamicImage) -> Result<Pose> {
        let next = self.poses.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(pose) = next {
            *last = pose;
        }
        Ok(last.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub struct FailingPoseEstimator;

impl PoseEstimator for FailingPoseEstimator {
    fn estimate(&self, _frame: &DynamicImage) -> Result<Pose> {
        anyhow::bail!("onnx runtime exploded")
    }

    fn name(&self) -> &str {
        "failing"
    }
}
