// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::pose::{PoseModelConfig, MOVENET_INPUT_SIZE};

/// Pose Correction API server
#[derive(Parser, Debug)]
#[command(name = "pose-correction-api")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Squat form feedback for webcam frames", long_about = None)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "API_PORT", default_value_t = 8000)]
    pub port: u16,

    /// MoveNet ONNX model file
    #[arg(long, env = "POSE_MODEL_PATH", default_value = "./models/movenet-lightning.onnx")]
    pub model_path: String,

    /// Model input resolution (192 for Lightning, 256 for Thunder)
    #[arg(long, env = "POSE_INPUT_SIZE", default_value_t = MOVENET_INPUT_SIZE)]
    pub input_size: u32,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "POSE_THREADS", default_value_t = 4)]
    pub threads: usize,

    /// TOML file overriding beginner/pro thresholds
    #[arg(long, env = "THRESHOLDS_FILE")]
    pub thresholds_file: Option<PathBuf>,

    /// Minimum keypoint score for a landmark to count as detected
    #[arg(long, env = "MIN_KEYPOINT_CONFIDENCE", default_value_t = 0.3)]
    pub min_keypoint_confidence: f32,

    /// Seconds before an idle session is dropped
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 300)]
    pub session_ttl_secs: u64,

    /// Maximum concurrent sessions
    #[arg(long, env = "MAX_SESSIONS", default_value_t = 1000)]
    pub max_sessions: usize,
}

impl Cli {
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            pose_model: PoseModelConfig {
                model_path: self.model_path,
                input_size: self.input_size,
                intra_threads: self.threads,
            },
            thresholds_file: self.thresholds_file,
            min_keypoint_confidence: self.min_keypoint_confidence.clamp(0.0, 1.0),
            session_ttl: Duration::from_secs(self.session_ttl_secs),
            max_sessions: self.max_sessions.max(1),
        }
    }
}
