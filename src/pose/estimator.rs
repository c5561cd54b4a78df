// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pose estimation backends
//!
//! `MoveNetEstimator` runs a MoveNet single-pose ONNX model on CPU through
//! ONNX Runtime. Request handlers only see the `PoseEstimator` trait.

use anyhow::{Context, Result};
use image::DynamicImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::keypoint::{Keypoint, KeypointIndex, Pose};
use super::preprocess::{preprocess_for_movenet, MOVENET_INPUT_SIZE};

/// Extracts a single pose from a frame
pub trait PoseEstimator: Send + Sync {
    /// Run the model on a decoded frame
    fn estimate(&self, frame: &DynamicImage) -> Result<Pose>;

    /// Model name reported by the health endpoint
    fn name(&self) -> &str;
}

/// Configuration for loading the pose model
#[derive(Debug, Clone)]
pub struct PoseModelConfig {
    /// Path to the MoveNet ONNX file
    pub model_path: String,
    /// Square input resolution (192 for Lightning, 256 for Thunder)
    pub input_size: u32,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
}

impl Default for PoseModelConfig {
    fn default() -> Self {
        Self {
            model_path: "./models/movenet-lightning.onnx".to_string(),
            input_size: MOVENET_INPUT_SIZE,
            intra_threads: 4,
        }
    }
}

/// MoveNet single-pose model
#[derive(Clone)]
pub struct MoveNetEstimator {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    input_name: String,
    input_size: u32,
}

impl std::fmt::Debug for MoveNetEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveNetEstimator")
            .field("input_name", &self.input_name)
            .field("input_size", &self.input_size)
            .finish_non_exhaustive()
    }
}

impl MoveNetEstimator {
    /// Load the MoveNet model
    ///
    /// # Errors
    /// Returns error if the model file is missing or ONNX Runtime rejects it.
    pub fn new(config: &PoseModelConfig) -> Result<Self> {
        let model_path = Path::new(&config.model_path);

        if !model_path.exists() {
            anyhow::bail!("Pose model not found: {}", model_path.display());
        }

        info!("Loading MoveNet pose model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(config.intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load pose model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "input".to_string());

        debug!("Pose model input: {}", input_name);
        info!("✅ MoveNet pose model loaded (CPU-only)");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            input_size: config.input_size,
        })
    }
}

impl PoseEstimator for MoveNetEstimator {
    fn estimate(&self, frame: &DynamicImage) -> Result<Pose> {
        let input = preprocess_for_movenet(frame, self.input_size);
        let input_tensor = Tensor::from_array(input).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Pose model session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .context("Pose inference failed")?;

        // MoveNet output is [1, 1, 17, 3] as (y, x, score)
        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let shape = output.shape().to_vec();
        if shape.len() != 4 || shape[2] < KeypointIndex::COUNT || shape[3] < 3 {
            anyhow::bail!("Unexpected pose output shape: {:?}", shape);
        }

        let mut keypoints = [Keypoint::default(); KeypointIndex::COUNT];
        for (i, keypoint) in keypoints.iter_mut().enumerate() {
            let y = output[[0, 0, i, 0]];
            let x = output[[0, 0, i, 1]];
            let confidence = output[[0, 0, i, 2]];
            *keypoint = Keypoint::new(x, y, confidence);
        }

        let pose = Pose::new(keypoints);
        debug!("Pose estimated, mean confidence {:.2}", pose.average_confidence());

        Ok(pose)
    }

    fn name(&self) -> &str {
        "movenet"
    }
}
