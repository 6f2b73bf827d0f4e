//! Request and response types for the REST API.

use serde::{Deserialize, Serialize};

use crate::models::{DayStamp, Flag};
use crate::view::{GridPage, ViewMode};

/// Response for GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}

/// Query parameters for GET /v1/venues/{venue}/grid
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridQuery {
    /// Active projection; defaults to the per-unit view.
    #[serde(default)]
    pub view: ViewMode,
    /// Optional exact model-name filter.
    pub model: Option<String>,
}

/// Response for GET /v1/venues/{venue}/grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridResponse {
    pub venue: String,
    pub loaded_days: usize,
    #[serde(flatten)]
    pub page: GridPage,
}

/// Response for POST /v1/venues/{venue}/window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadWindowResponse {
    /// "loaded", "already_loading", or "stale"
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requested: Vec<DayStamp>,
    #[serde(default)]
    pub fetched: usize,
}

/// Request body for POST /v1/venues/{venue}/flags
#[derive(Debug, Clone, Deserialize)]
pub struct FlagEditRequest {
    pub day: DayStamp,
    pub row_id: String,
    pub flag: Flag,
}

/// Response for POST /v1/venues/{venue}/flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagEditResponse {
    /// Whether the edit spread across the whole model.
    pub whole_model: bool,
    /// Units covered by the write-set.
    pub targeted: usize,
    /// Entries the store actually persisted; 0 means the day document does
    /// not exist yet and the edit is local-only until the day is refetched.
    pub persisted: usize,
}

/// Response for GET /v1/venues/{venue}/models
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelListResponse {
    pub models: Vec<String>,
    pub total: usize,
}
