//! Application state shared across all route handlers.
//!
//! Everything here is read-only after startup, so handlers clone the state
//! freely and never lock.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use wayfarer_core::config::WayfarerConfig;
use wayfarer_core::{Catalogs, Result, SuggestionResolver};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<WayfarerConfig>,
    /// Stage resolver over the startup catalogs.
    pub resolver: SuggestionResolver,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
    /// Wall-clock start time reported by /health.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create a new AppState over the given catalogs.
    pub fn new(config: WayfarerConfig, catalogs: Catalogs) -> Self {
        Self {
            config: Arc::new(config),
            resolver: SuggestionResolver::new(Arc::new(catalogs)),
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Build the catalogs described by `config` (built-ins plus extra
    /// cities) and wrap them in a new state.
    pub fn from_config(config: WayfarerConfig) -> Result<Self> {
        let catalogs = Catalogs::builtin().with_extra_cities(&config.catalog.extra_cities)?;
        Ok(Self::new(config, catalogs))
    }
}
