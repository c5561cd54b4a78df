// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, root_handler};
use super::predict_webcam::predict_webcam_handler;
use crate::analysis::ThresholdsConfig;
use crate::config::ServerConfig;
use crate::pose::PoseEstimator;
use crate::sessions::{SessionStore, SessionStoreConfig};

/// Largest accepted request body (16MB)
///
/// Leaves room for the base64 form of a `MAX_FRAME_SIZE` frame plus the JSON
/// envelope, so oversized frames reach the decoder and fail with a JSON error.
pub const MAX_REQUEST_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Process-wide pose model; `None` until loaded
    pub pose_estimator: Arc<RwLock<Option<Arc<dyn PoseEstimator>>>>,
    pub thresholds: Arc<ThresholdsConfig>,
    pub sessions: Arc<SessionStore>,
    pub min_keypoint_confidence: f32,
}

impl AppState {
    pub fn new(
        pose_estimator: Option<Arc<dyn PoseEstimator>>,
        thresholds: ThresholdsConfig,
        session_config: SessionStoreConfig,
    ) -> Self {
        let min_keypoint_confidence = session_config.min_keypoint_confidence;
        Self {
            pose_estimator: Arc::new(RwLock::new(pose_estimator)),
            thresholds: Arc::new(thresholds),
            sessions: Arc::new(SessionStore::new(session_config)),
            min_keypoint_confidence,
        }
    }

    /// State with default thresholds and no pose model
    pub fn new_for_test() -> Self {
        Self::new(None, ThresholdsConfig::default(), SessionStoreConfig::default())
    }

    pub async fn set_pose_estimator(&self, estimator: Arc<dyn PoseEstimator>) {
        *self.pose_estimator.write().await = Some(estimator);
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("thresholds", &self.thresholds)
            .field("min_keypoint_confidence", &self.min_keypoint_confidence)
            .finish_non_exhaustive()
    }
}

/// Build the router with CORS fully open
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        // Frame analysis, with and without the trailing slash
        .route("/predict_webcam/", post(predict_webcam_handler))
        .route("/predict_webcam", post(predict_webcam_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = create_app(Arc::new(state));

    let addr = format!("{}:{}", config.host, config.port).parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Pose correction API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
