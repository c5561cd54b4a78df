// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::analysis::{ConfigError, ThresholdsConfig, DEFAULT_MIN_KEYPOINT_CONFIDENCE};
use crate::pose::PoseModelConfig;
use crate::sessions::SessionStoreConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub pose_model: PoseModelConfig,
    /// Optional TOML file overriding beginner/pro thresholds
    pub thresholds_file: Option<PathBuf>,
    pub min_keypoint_confidence: f32,
    pub session_ttl: Duration,
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            pose_model: PoseModelConfig::default(),
            thresholds_file: None,
            min_keypoint_confidence: DEFAULT_MIN_KEYPOINT_CONFIDENCE,
            session_ttl: Duration::from_secs(300),
            max_sessions: 1000,
        }
    }
}

impl ServerConfig {
    /// Thresholds from the override file, or the built-in sets
    pub fn load_thresholds(&self) -> Result<ThresholdsConfig, ConfigError> {
        match &self.thresholds_file {
            Some(path) => ThresholdsConfig::load(path),
            None => Ok(ThresholdsConfig::default()),
        }
    }

    pub fn session_config(&self) -> SessionStoreConfig {
        SessionStoreConfig {
            session_ttl: self.session_ttl,
            max_sessions: self.max_sessions,
            min_keypoint_confidence: self.min_keypoint_confidence,
        }
    }
}
