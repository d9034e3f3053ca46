//! Route definitions and router construction.
//!
//! This module defines the HTTP routes and creates the main router.

use axum::Router;
use axum::routing::get;
use dexstream_core::contracts::http::{EVENTS_PATH, HEALTH_PATH, INDEX_PATH};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %o, "Ignoring unparseable CORS origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Create the main application router.
///
/// Serves the viewer page, the record stream and the health check.
/// Compression leaves `text/event-stream` bodies alone.
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);

    Router::new()
        .route(INDEX_PATH, get(handlers::index::page))
        .route(EVENTS_PATH, get(handlers::events::stream))
        .route(HEALTH_PATH, get(handlers::health::check))
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(cors_config))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}
