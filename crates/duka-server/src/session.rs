//! Per-browser sessions
//!
//! Every session owns one [`Controller`]; all controllers share the same
//! [`Sources`], so a single HTTP client talks to the content API. Sessions
//! live in a bounded cache and are dropped after sitting idle.

use crate::error::ApiError;
use duka_core::{Controller, ServerConfig, Sources};
use moka::future::Cache;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use ulid::Ulid;

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    sessions: Cache<Ulid, Arc<Controller>>,
    sources: Sources,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions.entry_count())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State with the default idle timeout and session bound
    #[must_use]
    pub fn new(sources: Sources) -> Self {
        Self::from_config(sources, &ServerConfig::default())
    }

    #[must_use]
    pub fn from_config(sources: Sources, config: &ServerConfig) -> Self {
        Self::with_limits(sources, config.session_idle(), config.max_sessions)
    }

    /// State whose sessions expire after `idle` without a request
    #[must_use]
    pub fn with_limits(sources: Sources, idle: Duration, max_sessions: u64) -> Self {
        let sessions = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle)
            .eviction_listener(|id, _, cause| {
                tracing::info!(session = %id, ?cause, "session dropped");
            })
            .build();

        Self { sessions, sources }
    }

    /// Open a new session
    pub async fn create(&self) -> (Ulid, Arc<Controller>) {
        let id = Ulid::new();
        let controller = Arc::new(Controller::with_sources(&self.sources));
        self.sessions.insert(id, controller.clone()).await;

        tracing::info!(session = %id, active = self.sessions.entry_count(), "session opened");
        (id, controller)
    }

    /// Look up a session by its string id, refreshing its idle timer
    ///
    /// # Errors
    /// [`ApiError::SessionNotFound`] for malformed, unknown or expired ids
    pub async fn get(&self, id: &str) -> Result<Arc<Controller>, ApiError> {
        let key = parse_id(id)?;
        self.sessions
            .get(&key)
            .await
            .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))
    }

    /// Close a session
    ///
    /// # Errors
    /// [`ApiError::SessionNotFound`] for malformed, unknown or expired ids
    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        let key = parse_id(id)?;
        self.sessions
            .remove(&key)
            .await
            .map(|_| tracing::info!(session = %key, "session closed"))
            .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))
    }

    /// Live sessions, after pending expirations and evictions have run
    pub async fn len(&self) -> u64 {
        self.sessions.run_pending_tasks().await;
        self.sessions.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn parse_id(id: &str) -> Result<Ulid, ApiError> {
    Ulid::from_str(id).map_err(|_| ApiError::SessionNotFound(id.to_string()))
}
