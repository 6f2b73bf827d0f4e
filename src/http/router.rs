//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        .route("/venues/{venue}/grid", get(handlers::get_grid))
        .route("/venues/{venue}/window", post(handlers::load_window))
        .route("/venues/{venue}/flags", post(handlers::edit_flag))
        .route("/venues/{venue}/models", get(handlers::list_models))
        .route("/venues/{venue}/session", delete(handlers::reset_session));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSettings;
    use crate::store::StoreFactory;

    #[test]
    fn test_router_creation() {
        let store = StoreFactory::create_memory();
        let state = AppState::new(store, GridSettings::default());
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
