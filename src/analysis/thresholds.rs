// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Squat thresholds for beginner and pro modes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read thresholds file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse thresholds file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid thresholds for {mode}: {message}")]
    Invalid { mode: Mode, message: String },
}

/// Difficulty mode selected by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Beginner,
    Pro,
}

impl Mode {
    /// Resolve the mode field of a request
    ///
    /// Matching is case-insensitive; absent or unknown values fall back to beginner.
    pub fn from_request(mode: Option<&str>) -> Self {
        match mode.map(|m| m.trim().to_lowercase()) {
            Some(m) if m == "pro" => Mode::Pro,
            _ => Mode::Beginner,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Beginner => "beginner",
            Mode::Pro => "pro",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive angle range in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub min: f32,
    pub max: f32,
}

impl AngleRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, angle: f32) -> bool {
        self.min <= angle && angle <= self.max
    }
}

/// Knee-vertical angle ranges for the three squat states
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HipKneeVertical {
    /// Standing (s1)
    pub normal: AngleRange,
    /// Transition (s2)
    pub trans: AngleRange,
    /// Deep enough to count (s3)
    pub pass: AngleRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub hip_knee_vert: HipKneeVertical,
    /// Hip-vertical bounds: below [0] bend forward, above [1] bend backwards
    pub hip_thresh: [f32; 2],
    /// Ankle-vertical angle above which the knee is past the toes
    pub ankle_thresh: f32,
    /// Knee-vertical bounds: (0, 1) lower hips, above [2] too deep
    pub knee_thresh: [f32; 3],
    /// Shoulder-nose-shoulder angle above which the camera is facing the user
    pub offset_thresh: f32,
    /// Seconds without a state change before counters reset
    pub inactive_thresh: f64,
    /// Frames a feedback message stays visible
    pub cnt_frame_thresh: u32,
}

impl Thresholds {
    pub fn beginner() -> Self {
        Self {
            hip_knee_vert: HipKneeVertical {
                normal: AngleRange::new(0.0, 32.0),
                trans: AngleRange::new(35.0, 65.0),
                pass: AngleRange::new(70.0, 95.0),
            },
            hip_thresh: [10.0, 50.0],
            ankle_thresh: 45.0,
            knee_thresh: [50.0, 70.0, 95.0],
            offset_thresh: 35.0,
            inactive_thresh: 15.0,
            cnt_frame_thresh: 50,
        }
    }

    pub fn pro() -> Self {
        Self {
            hip_knee_vert: HipKneeVertical {
                normal: AngleRange::new(0.0, 32.0),
                trans: AngleRange::new(35.0, 65.0),
                pass: AngleRange::new(80.0, 95.0),
            },
            hip_thresh: [15.0, 50.0],
            ankle_thresh: 30.0,
            knee_thresh: [50.0, 80.0, 95.0],
            offset_thresh: 35.0,
            inactive_thresh: 15.0,
            cnt_frame_thresh: 50,
        }
    }

    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Beginner => Self::beginner(),
            Mode::Pro => Self::pro(),
        }
    }

    fn validate(&self, mode: Mode) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::Invalid { mode, message };

        for (name, range) in [
            ("normal", self.hip_knee_vert.normal),
            ("trans", self.hip_knee_vert.trans),
            ("pass", self.hip_knee_vert.pass),
        ] {
            if range.min > range.max {
                return Err(invalid(format!(
                    "{} range min {} exceeds max {}",
                    name, range.min, range.max
                )));
            }
        }
        if self.hip_thresh[0] > self.hip_thresh[1] {
            return Err(invalid("hip_thresh must be ascending".to_string()));
        }
        if !self.knee_thresh.windows(2).all(|w| w[0] <= w[1]) {
            return Err(invalid("knee_thresh must be ascending".to_string()));
        }
        if self.inactive_thresh < 0.0 {
            return Err(invalid("inactive_thresh must not be negative".to_string()));
        }
        Ok(())
    }
}

/// Partial thresholds read from TOML; absent fields keep the mode defaults
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThresholdOverrides {
    normal: Option<[f32; 2]>,
    trans: Option<[f32; 2]>,
    pass: Option<[f32; 2]>,
    hip_thresh: Option<[f32; 2]>,
    ankle_thresh: Option<f32>,
    knee_thresh: Option<[f32; 3]>,
    offset_thresh: Option<f32>,
    inactive_thresh: Option<f64>,
    cnt_frame_thresh: Option<u32>,
}

impl ThresholdOverrides {
    fn apply(self, base: &mut Thresholds) {
        let range = |r: [f32; 2]| AngleRange::new(r[0], r[1]);
        if let Some(r) = self.normal {
            base.hip_knee_vert.normal = range(r);
        }
        if let Some(r) = self.trans {
            base.hip_knee_vert.trans = range(r);
        }
        if let Some(r) = self.pass {
            base.hip_knee_vert.pass = range(r);
        }
        if let Some(v) = self.hip_thresh {
            base.hip_thresh = v;
        }
        if let Some(v) = self.ankle_thresh {
            base.ankle_thresh = v;
        }
        if let Some(v) = self.knee_thresh {
            base.knee_thresh = v;
        }
        if let Some(v) = self.offset_thresh {
            base.offset_thresh = v;
        }
        if let Some(v) = self.inactive_thresh {
            base.inactive_thresh = v;
        }
        if let Some(v) = self.cnt_frame_thresh {
            base.cnt_frame_thresh = v;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThresholdsFile {
    #[serde(default)]
    beginner: ThresholdOverrides,
    #[serde(default)]
    pro: ThresholdOverrides,
}

/// The threshold set for each mode
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdsConfig {
    pub beginner: Thresholds,
    pub pro: Thresholds,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            beginner: Thresholds::beginner(),
            pro: Thresholds::pro(),
        }
    }
}

impl ThresholdsConfig {
    pub fn get(&self, mode: Mode) -> &Thresholds {
        match mode {
            Mode::Beginner => &self.beginner,
            Mode::Pro => &self.pro,
        }
    }

    /// Parse `[beginner]` / `[pro]` override tables
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ThresholdsFile = toml::from_str(content)?;
        let mut config = Self::default();
        file.beginner.apply(&mut config.beginner);
        file.pro.apply(&mut config.pro);
        config.beginner.validate(Mode::Beginner)?;
        config.pro.validate(Mode::Pro)?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
