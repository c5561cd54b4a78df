// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Beginner versus pro thresholds on the same movement

use pose_correction_api::analysis::{
    ConfigError, FeedbackKind, FrameAnalysis, FrameProcessor, Mode, SquatState, Thresholds,
    ThresholdsConfig, DEFAULT_MIN_KEYPOINT_CONFIDENCE,
};
use pose_correction_api::pose::Pose;
use std::io::Write;
use std::time::{Duration, Instant};

use crate::common::{beginner_depth_squat, forward_knee_squat, half_squat, standing};

fn run(thresholds: Thresholds, poses: &[Pose]) -> Vec<FrameAnalysis> {
    let start = Instant::now();
    let mut processor = FrameProcessor::new(thresholds, DEFAULT_MIN_KEYPOINT_CONFIDENCE, start);
    poses
        .iter()
        .enumerate()
        .map(|(i, pose)| {
            processor.process_pose(pose, 1000, 1000, start + Duration::from_millis(100 * i as u64))
        })
        .collect()
}

fn beginner_depth_rep() -> Vec<Pose> {
    vec![
        standing(),
        half_squat(),
        beginner_depth_squat(),
        half_squat(),
        standing(),
    ]
}

#[test]
fn test_beginner_depth_counts_for_beginner() {
    let frames = run(Thresholds::beginner(), &beginner_depth_rep());

    assert_eq!(frames[2].state, Some(SquatState::S3));
    let last = frames.last().unwrap();
    assert_eq!(last.squat_count, 1);
    assert_eq!(last.improper_squat, 0);
}

#[test]
fn test_beginner_depth_is_improper_for_pro() {
    let frames = run(Thresholds::pro(), &beginner_depth_rep());

    // Between the transition and pass ranges for pros
    assert_eq!(frames[2].state, None);
    assert!(frames[2].feedback.contains(&FeedbackKind::LowerHips));
    assert_eq!(
        frames[2].feedback_text().as_deref(),
        Some("LOWER YOUR HIPS")
    );

    let last = frames.last().unwrap();
    assert_eq!(last.squat_count, 0);
    assert_eq!(last.improper_squat, 1);
}

#[test]
fn test_shin_angle_tolerance_differs() {
    let beginner = run(Thresholds::beginner(), &[forward_knee_squat()]);
    let pro = run(Thresholds::pro(), &[forward_knee_squat()]);

    assert!(beginner[0].feedback.is_empty());
    assert_eq!(pro[0].feedback, vec![FeedbackKind::KneeOverToe]);
}

#[test]
fn test_thresholds_file_overrides_one_mode() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[pro]").unwrap();
    writeln!(file, "pass = [70.0, 95.0]").unwrap();
    writeln!(file, "knee_thresh = [50.0, 70.0, 95.0]").unwrap();

    let config = ThresholdsConfig::load(file.path()).unwrap();
    assert_eq!(config.get(Mode::Beginner), &Thresholds::beginner());

    let pro = config.get(Mode::Pro).clone();
    assert_eq!(pro.ankle_thresh, 30.0);

    // With the relaxed depth, the beginner-depth rep now counts for pros too
    let frames = run(pro, &beginner_depth_rep());
    assert_eq!(frames.last().unwrap().squat_count, 1);
}

#[test]
fn test_thresholds_file_rejects_unknown_keys() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[beginner]\nknee_angle = 10.0").unwrap();

    assert!(matches!(
        ThresholdsConfig::load(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_thresholds_file_rejects_inverted_range() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[beginner]\ntrans = [65.0, 35.0]").unwrap();

    assert!(matches!(
        ThresholdsConfig::load(file.path()),
        Err(ConfigError::Invalid {
            mode: Mode::Beginner,
            ..
        })
    ));
}
