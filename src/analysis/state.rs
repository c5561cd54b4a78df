// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Squat state machine

use serde::Serialize;
use std::time::{Duration, Instant};

use super::thresholds::HipKneeVertical;

/// Squat phase derived from the knee-vertical angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SquatState {
    /// Standing
    S1,
    /// Transition
    S2,
    /// Bottom of the squat
    S3,
}

impl SquatState {
    /// Classify a knee-vertical angle; angles in the gaps between ranges have no state
    pub fn classify(knee_vertical_angle: f32, ranges: &HipKneeVertical) -> Option<Self> {
        let angle = knee_vertical_angle.trunc();
        if ranges.normal.contains(angle) {
            Some(SquatState::S1)
        } else if ranges.trans.contains(angle) {
            Some(SquatState::S2)
        } else if ranges.pass.contains(angle) {
            Some(SquatState::S3)
        } else {
            None
        }
    }
}

/// Accumulates idle time between `tick`s
#[derive(Debug, Clone)]
pub struct InactivityTimer {
    started: Instant,
    elapsed: Duration,
}

impl InactivityTimer {
    pub fn new(now: Instant) -> Self {
        Self {
            started: now,
            elapsed: Duration::ZERO,
        }
    }

    /// Add the time since the last tick and return the total
    pub fn tick(&mut self, now: Instant) -> Duration {
        self.elapsed += now.saturating_duration_since(self.started);
        self.started = now;
        self.elapsed
    }

    pub fn reset(&mut self, now: Instant) {
        self.started = now;
        self.elapsed = Duration::ZERO;
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Per-user squat tracking state, carried from frame to frame
#[derive(Debug, Clone)]
pub struct StateTracker {
    pub state_seq: Vec<SquatState>,
    pub prev_state: Option<SquatState>,
    pub curr_state: Option<SquatState>,
    /// Side-view inactivity
    pub inactive: InactivityTimer,
    /// Front-view (camera misaligned) inactivity
    pub inactive_front: InactivityTimer,
    /// Active posture flags, indexed like `FeedbackKind::DISPLAY_SLOTS`
    pub display_text: [bool; 4],
    pub count_frames: [u32; 4],
    pub lower_hips: bool,
    pub incorrect_posture: bool,
    pub squat_count: u32,
    pub improper_squat: u32,
}

impl StateTracker {
    pub fn new(now: Instant) -> Self {
        Self {
            state_seq: Vec::with_capacity(3),
            prev_state: None,
            curr_state: None,
            inactive: InactivityTimer::new(now),
            inactive_front: InactivityTimer::new(now),
            display_text: [false; 4],
            count_frames: [0; 4],
            lower_hips: false,
            incorrect_posture: false,
            squat_count: 0,
            improper_squat: 0,
        }
    }

    fn count(&self, state: SquatState) -> usize {
        self.state_seq.iter().filter(|&&s| s == state).count()
    }

    pub fn s2_count(&self) -> usize {
        self.count(SquatState::S2)
    }

    pub fn contains(&self, state: SquatState) -> bool {
        self.state_seq.contains(&state)
    }

    /// Extend the state sequence
    ///
    /// The only sequence that counts as a rep is `[S2, S3, S2]`: S2 is recorded
    /// once on the way down and once more after S3, and S3 only after S2.
    pub fn update_sequence(&mut self, state: Option<SquatState>) {
        match state {
            Some(SquatState::S2) => {
                let has_s3 = self.contains(SquatState::S3);
                let s2 = self.s2_count();
                if (!has_s3 && s2 == 0) || (has_s3 && s2 == 1) {
                    self.state_seq.push(SquatState::S2);
                }
            }
            Some(SquatState::S3) => {
                if !self.contains(SquatState::S3) && self.contains(SquatState::S2) {
                    self.state_seq.push(SquatState::S3);
                }
            }
            _ => {}
        }
    }

    /// Score the finished attempt when the user stands back up
    pub fn complete_rep(&mut self) {
        if self.state_seq.len() == 3 && !self.incorrect_posture {
            self.squat_count += 1;
        } else if self.contains(SquatState::S2) && self.state_seq.len() == 1 {
            self.improper_squat += 1;
        } else if self.incorrect_posture {
            self.improper_squat += 1;
        }
        self.state_seq.clear();
        self.incorrect_posture = false;
    }

    pub fn reset_counters(&mut self) {
        self.squat_count = 0;
        self.improper_squat = 0;
    }

    pub fn clear_display(&mut self) {
        self.display_text = [false; 4];
        self.count_frames = [0; 4];
    }

    /// Advance frame counters of shown flags and expire those shown long enough
    pub fn age_display(&mut self, cnt_frame_thresh: u32) {
        for (shown, count) in self.display_text.iter_mut().zip(self.count_frames.iter_mut()) {
            if *shown {
                *count += 1;
            }
            if *count > cnt_frame_thresh {
                *shown = false;
                *count = 0;
            }
        }
    }
}
