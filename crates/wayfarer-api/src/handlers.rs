//! Route handler functions for all API endpoints.

use std::collections::BTreeMap;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wayfarer_core::{Suggestion, SuggestionKind};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Query parameter types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct AutocompleteParams {
    /// Raw text of the input box; missing means empty.
    #[serde(default)]
    pub q: String,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub started_at: DateTime<Utc>,
    pub catalog_sizes: BTreeMap<SuggestionKind, usize>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /autocomplete - staged suggestions for the text typed so far.
pub async fn autocomplete(
    State(state): State<AppState>,
    params: Result<Query<AutocompleteParams>, QueryRejection>,
) -> Result<Json<Vec<Suggestion>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let suggestions = state.resolver.resolve(&params.q);
    tracing::debug!(
        query_len = params.q.len(),
        count = suggestions.len(),
        "Autocomplete served"
    );

    Ok(Json(suggestions))
}

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        started_at: state.started_at,
        catalog_sizes: state.resolver.catalogs().sizes(),
    })
}
