// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use pose_correction_api::{
    api::{start_server, AppState},
    cli::Cli,
    pose::{MoveNetEstimator, PoseEstimator},
    version,
};
use std::{env, sync::Arc};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("🚀 Starting {}", version::get_version_string());
    info!("📦 Build version: {}", version::VERSION);
    info!("Features: {}", version::FEATURES.join(", "));

    let config = Cli::parse().into_config();

    let thresholds = config
        .load_thresholds()
        .context("Failed to load thresholds")?;
    if let Some(path) = &config.thresholds_file {
        info!("Loaded threshold overrides from {}", path.display());
    }

    // A missing model keeps the server up; predictions answer 503 until it is fixed
    let estimator: Option<Arc<dyn PoseEstimator>> = match MoveNetEstimator::new(&config.pose_model)
    {
        Ok(model) => Some(Arc::new(model)),
        Err(e) => {
            warn!("⚠️ Pose model unavailable: {:#}", e);
            None
        }
    };

    let state = AppState::new(estimator, thresholds, config.session_config());

    start_server(&config, state).await
}
