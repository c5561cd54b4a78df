// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-frame squat analysis
//!
//! `FrameProcessor` turns a pose into feedback. It keeps a `StateTracker`
//! between calls, so feeding it consecutive webcam frames counts reps; a
//! fresh processor per frame still yields the posture checks for that frame.

use anyhow::Result;
use image::DynamicImage;
use std::time::Instant;
use tracing::debug;

use super::feedback::{render_feedback, FeedbackKind};
use super::geometry::{find_angle, vertical_angle, Point};
use super::state::{SquatState, StateTracker};
use super::thresholds::Thresholds;
use crate::pose::{KeypointIndex, Pose, PoseEstimator};

/// Default minimum keypoint score for a landmark to be trusted
pub const DEFAULT_MIN_KEYPOINT_CONFIDENCE: f32 = 0.3;

/// Angles measured on a frame, in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointAngles {
    /// Shoulder-nose-shoulder angle
    pub offset: f32,
    pub hip_vertical: Option<f32>,
    pub knee_vertical: Option<f32>,
    pub ankle_vertical: Option<f32>,
}

/// Outcome of processing one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnalysis {
    pub pose_detected: bool,
    pub state: Option<SquatState>,
    pub angles: Option<JointAngles>,
    pub feedback: Vec<FeedbackKind>,
    pub squat_count: u32,
    pub improper_squat: u32,
}

impl FrameAnalysis {
    /// Feedback text for the response, `None` when nothing was flagged
    pub fn feedback_text(&self) -> Option<String> {
        render_feedback(&self.feedback)
    }
}

/// Side of the body facing the camera
struct Side {
    shoulder: Point,
    hip: Point,
    knee: Point,
    ankle: Point,
}

pub struct FrameProcessor {
    thresholds: Thresholds,
    min_keypoint_confidence: f32,
    tracker: StateTracker,
}

impl FrameProcessor {
    pub fn new(thresholds: Thresholds, min_keypoint_confidence: f32, now: Instant) -> Self {
        Self {
            thresholds,
            min_keypoint_confidence,
            tracker: StateTracker::new(now),
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Swap thresholds without losing tracking state
    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.thresholds = thresholds;
    }

    pub fn tracker(&self) -> &StateTracker {
        &self.tracker
    }

    /// Run the pose model on `frame` and analyse the result
    pub fn process(
        &mut self,
        frame: &DynamicImage,
        estimator: &dyn PoseEstimator,
        now: Instant,
    ) -> Result<FrameAnalysis> {
        let pose = estimator.estimate(frame)?;
        Ok(self.process_pose(&pose, frame.width(), frame.height(), now))
    }

    /// Analyse an already estimated pose for a frame of `width`x`height`
    pub fn process_pose(&mut self, pose: &Pose, width: u32, height: u32, now: Instant) -> FrameAnalysis {
        if !pose.has_squat_landmarks(self.min_keypoint_confidence) {
            return self.process_missing_pose(now);
        }

        let px = |idx: KeypointIndex| Point::from(pose.get(idx).to_pixel(width, height));

        let nose = px(KeypointIndex::Nose);
        let left_shoulder = px(KeypointIndex::LeftShoulder);
        let right_shoulder = px(KeypointIndex::RightShoulder);

        let offset = find_angle(left_shoulder, right_shoulder, nose);
        if offset > self.thresholds.offset_thresh {
            return self.process_misaligned(offset, now);
        }

        self.tracker.inactive_front.reset(now);

        let left = Side {
            shoulder: left_shoulder,
            hip: px(KeypointIndex::LeftHip),
            knee: px(KeypointIndex::LeftKnee),
            ankle: px(KeypointIndex::LeftAnkle),
        };
        let right = Side {
            shoulder: right_shoulder,
            hip: px(KeypointIndex::RightHip),
            knee: px(KeypointIndex::RightKnee),
            ankle: px(KeypointIndex::RightAnkle),
        };

        // The side nearer the camera spans more of the frame vertically
        let left_span = (left.ankle.y - left.shoulder.y).abs();
        let right_span = (right.ankle.y - right.shoulder.y).abs();
        let side = if left_span > right_span { left } else { right };

        let hip_angle = vertical_angle(side.shoulder, side.hip);
        let knee_angle = vertical_angle(side.hip, side.knee);
        let ankle_angle = vertical_angle(side.knee, side.ankle);

        let t = &self.thresholds;
        let tracker = &mut self.tracker;

        let current = SquatState::classify(knee_angle, &t.hip_knee_vert);
        tracker.curr_state = current;
        tracker.update_sequence(current);

        if current == Some(SquatState::S1) {
            tracker.complete_rep();
        } else {
            let single_s2 = tracker.s2_count() == 1;

            if hip_angle > t.hip_thresh[1] {
                tracker.display_text[0] = true;
            } else if hip_angle < t.hip_thresh[0] && single_s2 {
                tracker.display_text[1] = true;
            }

            if t.knee_thresh[0] < knee_angle && knee_angle < t.knee_thresh[1] && single_s2 {
                tracker.lower_hips = true;
            } else if knee_angle > t.knee_thresh[2] {
                tracker.display_text[3] = true;
                tracker.incorrect_posture = true;
            }

            if ankle_angle > t.ankle_thresh {
                tracker.display_text[2] = true;
                tracker.incorrect_posture = true;
            }
        }

        let mut inactivity_reset = false;
        if tracker.curr_state == tracker.prev_state {
            if tracker.inactive.tick(now).as_secs_f64() >= t.inactive_thresh {
                tracker.reset_counters();
                inactivity_reset = true;
            }
        } else {
            tracker.inactive.reset(now);
        }

        if tracker.contains(SquatState::S3) || current == Some(SquatState::S1) {
            tracker.lower_hips = false;
        }

        let mut feedback: Vec<FeedbackKind> = FeedbackKind::DISPLAY_SLOTS
            .iter()
            .zip(tracker.display_text.iter())
            .filter(|(_, shown)| **shown)
            .map(|(&kind, _)| kind)
            .collect();
        if tracker.lower_hips {
            feedback.push(FeedbackKind::LowerHips);
        }
        if inactivity_reset {
            feedback.push(FeedbackKind::InactivityReset);
            tracker.inactive.reset(now);
        }

        tracker.age_display(t.cnt_frame_thresh);
        tracker.prev_state = current;

        debug!(
            "hip {:.1} knee {:.1} ankle {:.1} state {:?} seq {:?}",
            hip_angle, knee_angle, ankle_angle, current, tracker.state_seq
        );

        FrameAnalysis {
            pose_detected: true,
            state: current,
            angles: Some(JointAngles {
                offset,
                hip_vertical: Some(hip_angle),
                knee_vertical: Some(knee_angle),
                ankle_vertical: Some(ankle_angle),
            }),
            feedback,
            squat_count: tracker.squat_count,
            improper_squat: tracker.improper_squat,
        }
    }

    /// The user is facing the camera; side-view angles would be meaningless
    fn process_misaligned(&mut self, offset: f32, now: Instant) -> FrameAnalysis {
        let tracker = &mut self.tracker;
        let mut feedback = vec![FeedbackKind::CameraNotAligned];

        if tracker.inactive_front.tick(now).as_secs_f64() >= self.thresholds.inactive_thresh {
            tracker.reset_counters();
            tracker.inactive_front.reset(now);
            feedback.push(FeedbackKind::InactivityReset);
        }

        // A descent interrupted by facing the camera is abandoned
        tracker.inactive.reset(now);
        tracker.state_seq.clear();
        tracker.prev_state = None;
        tracker.curr_state = None;

        debug!("camera misaligned, offset angle {:.1}", offset);

        FrameAnalysis {
            pose_detected: true,
            state: None,
            angles: Some(JointAngles {
                offset,
                ..Default::default()
            }),
            feedback,
            squat_count: tracker.squat_count,
            improper_squat: tracker.improper_squat,
        }
    }

    fn process_missing_pose(&mut self, now: Instant) -> FrameAnalysis {
        let tracker = &mut self.tracker;
        let mut feedback = Vec::new();

        if tracker.inactive.tick(now).as_secs_f64() >= self.thresholds.inactive_thresh {
            tracker.reset_counters();
            tracker.inactive.reset(now);
            feedback.push(FeedbackKind::InactivityReset);
        }

        tracker.prev_state = None;
        tracker.curr_state = None;
        tracker.incorrect_posture = false;
        tracker.clear_display();
        tracker.inactive_front.reset(now);

        FrameAnalysis {
            pose_detected: false,
            state: None,
            angles: None,
            feedback,
            squat_count: tracker.squat_count,
            improper_squat: tracker.improper_squat,
        }
    }
}
