// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-client analysis sessions
//!
//! A webcam client that sends a `sessionId` gets the same `FrameProcessor`
//! for every frame, so reps are counted across requests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::analysis::{FrameProcessor, Mode, Thresholds};

#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// Idle time after which a session is dropped
    pub session_ttl: Duration,
    pub max_sessions: usize,
    pub min_keypoint_confidence: f32,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(300),
            max_sessions: 1000,
            min_keypoint_confidence: crate::analysis::DEFAULT_MIN_KEYPOINT_CONFIDENCE,
        }
    }
}

/// A tracked client
pub struct AnalysisSession {
    pub processor: FrameProcessor,
    pub mode: Mode,
}

struct SessionEntry {
    session: Arc<Mutex<AnalysisSession>>,
    last_seen: Instant,
}

pub struct SessionStore {
    config: SessionStoreConfig,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(config: SessionStoreConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &SessionStoreConfig {
        &self.config
    }

    /// Fetch or create the session for `session_id`
    ///
    /// Expired sessions are evicted first. A new session starts with the
    /// thresholds for `mode`; an existing one is switched to them if the
    /// client changed mode, keeping its counters.
    pub async fn get_or_create(
        &self,
        session_id: &str,
        mode: Mode,
        thresholds: &Thresholds,
        now: Instant,
    ) -> Arc<Mutex<AnalysisSession>> {
        let mut sessions = self.sessions.write().await;

        self.evict_expired(&mut sessions, now);

        if let Some(entry) = sessions.get_mut(session_id) {
            entry.last_seen = now;
            let session = entry.session.clone();
            drop(sessions);

            let mut guard = session.lock().await;
            if guard.mode != mode {
                debug!(session_id, from = %guard.mode, to = %mode, "Session mode changed");
                guard.mode = mode;
                guard.processor.set_thresholds(thresholds.clone());
            }
            drop(guard);
            return session;
        }

        if sessions.len() >= self.config.max_sessions {
            if let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone())
            {
                sessions.remove(&oldest);
                debug!(session_id = %oldest, "Evicted oldest session at capacity");
            }
        }

        let session = Arc::new(Mutex::new(AnalysisSession {
            processor: FrameProcessor::new(
                thresholds.clone(),
                self.config.min_keypoint_confidence,
                now,
            ),
            mode,
        }));
        sessions.insert(
            session_id.to_string(),
            SessionEntry {
                session: session.clone(),
                last_seen: now,
            },
        );
        info!(session_id, %mode, "Started analysis session");

        session
    }

    /// Drop sessions idle longer than the TTL, returning how many went
    pub async fn cleanup_expired(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        self.evict_expired(&mut sessions, now)
    }

    fn evict_expired(&self, sessions: &mut HashMap<String, SessionEntry>, now: Instant) -> usize {
        let ttl = self.config.session_ttl;
        let before = sessions.len();
        sessions.retain(|_, entry| now.saturating_duration_since(entry.last_seen) < ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} expired sessions", evicted);
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }
}
