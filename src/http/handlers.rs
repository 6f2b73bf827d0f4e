//! HTTP handlers for the REST API.
//!
//! Each handler resolves the venue's loader session and delegates to the
//! core library; no business logic lives here.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    FlagEditRequest, FlagEditResponse, GridQuery, GridResponse, HealthResponse,
    LoadWindowResponse, ModelListResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::loader::LoadOutcome;
use crate::view;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let store_status = match state.store.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {e}"),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        store: store_status,
    }))
}

/// GET /v1/venues/{venue}/grid?view=unit|model&model=NAME
///
/// The currently materialized grid for a venue. Loads the first window on
/// demand when the session has no days yet.
pub async fn get_grid(
    State(state): State<AppState>,
    Path(venue): Path<String>,
    Query(query): Query<GridQuery>,
) -> HandlerResult<GridResponse> {
    let session = state.session(&venue);

    if session.loaded_days().is_empty() {
        session.load_next_window().await?;
    }

    let unit_view = session.unit_view();
    let model_view = session.model_view();
    let page = view::project(&unit_view, &model_view, query.view, query.model.as_deref());

    Ok(Json(GridResponse {
        venue,
        loaded_days: session.loaded_days().len(),
        page,
    }))
}

/// POST /v1/venues/{venue}/window
///
/// Load the next window of days going further back in time. A request
/// arriving while a fetch is in flight is dropped and reported as
/// "already_loading"; the client retries on its next scroll event.
pub async fn load_window(
    State(state): State<AppState>,
    Path(venue): Path<String>,
) -> HandlerResult<LoadWindowResponse> {
    let session = state.session(&venue);

    let response = match session.load_next_window().await? {
        LoadOutcome::Loaded { requested, fetched } => LoadWindowResponse {
            status: "loaded".to_string(),
            requested,
            fetched,
        },
        LoadOutcome::AlreadyLoading => LoadWindowResponse {
            status: "already_loading".to_string(),
            requested: Vec::new(),
            fetched: 0,
        },
        LoadOutcome::Stale => LoadWindowResponse {
            status: "stale".to_string(),
            requested: Vec::new(),
            fetched: 0,
        },
    };

    Ok(Json(response))
}

/// POST /v1/venues/{venue}/flags
///
/// Apply a flag edit to a unit row. Whole-model semantics for flag 9 are
/// handled by the overlay; the response reports how far the edit spread and
/// whether persistence reached the day's document.
pub async fn edit_flag(
    State(state): State<AppState>,
    Path(venue): Path<String>,
    Json(request): Json<FlagEditRequest>,
) -> HandlerResult<FlagEditResponse> {
    let session = state.session(&venue);

    let outcome = session
        .annotate(request.day, &request.row_id, request.flag)
        .await?;

    Ok(Json(FlagEditResponse {
        whole_model: outcome.plan.is_whole_model(),
        targeted: outcome.plan.writes.len(),
        persisted: outcome.persisted,
    }))
}

/// GET /v1/venues/{venue}/models
///
/// Distinct model names present in the per-unit view, for the filter
/// control.
pub async fn list_models(
    State(state): State<AppState>,
    Path(venue): Path<String>,
) -> HandlerResult<ModelListResponse> {
    let session = state.session(&venue);
    let models = view::model_names(&session.unit_view());
    let total = models.len();

    Ok(Json(ModelListResponse { models, total }))
}

/// DELETE /v1/venues/{venue}/session
///
/// Discard a venue's session so the next request rebuilds from scratch.
pub async fn reset_session(
    State(state): State<AppState>,
    Path(venue): Path<String>,
) -> HandlerResult<serde_json::Value> {
    state.evict_session(&venue);
    Ok(Json(serde_json::json!({ "status": "reset", "venue": venue })))
}
