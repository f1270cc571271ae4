//! API Routes
//!
//! Configures the Axum router with the completion and details endpoints.

use std::any::Any;

use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::error::ApiError;

use super::handlers::{
    health_handler, package_details_handler, path_details_handler, path_handler,
    popular_handler, root_path_handler, search_handler, stats_handler,
    std_path_details_handler, std_path_handler, std_root_path_handler,
    std_version_details_handler, std_versions_handler, std_versions_prefix_handler,
    version_details_handler, versions_handler, versions_prefix_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/x` - Popular modules
/// - `GET /api/x/:pkg` - Module name search
/// - `GET /api/x/:pkg/` and `/api/x/:pkg/:ver` - Version completions
/// - `GET /api/x/:pkg/:ver/*path` - Path completions
/// - `GET /api/std[/:ver[/*path]]` - Same for the standard library
/// - `GET /api/details/...` - Markdown blurbs
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin, editors call this from anywhere
/// - Tracing: Logs all requests
/// - Catch panic: A panicking handler answers 500 instead of dropping the connection
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        // Module search and versions
        .route("/api/x", get(popular_handler))
        .route("/api/x/", get(popular_handler))
        .route("/api/x/:pkg", get(search_handler))
        .route("/api/x/:pkg/", get(versions_handler))
        .route("/api/x/:pkg/:ver", get(versions_prefix_handler))
        // Paths within a version
        .route("/api/x/:pkg/:ver/", get(root_path_handler))
        .route("/api/x/:pkg/:ver/*path", get(path_handler))
        // Standard library
        .route("/api/std", get(std_versions_handler))
        .route("/api/std/", get(std_versions_handler))
        .route("/api/std/:ver", get(std_versions_prefix_handler))
        .route("/api/std/:ver/", get(std_root_path_handler))
        .route("/api/std/:ver/*path", get(std_path_handler))
        // Details
        .route("/api/details/x/:pkg", get(package_details_handler))
        .route("/api/details/x/:pkg/:ver", get(version_details_handler))
        .route("/api/details/x/:pkg/:ver/*path", get(path_details_handler))
        .route("/api/details/std/:ver", get(std_version_details_handler))
        .route("/api/details/std/:ver/*path", get(std_path_details_handler))
        // Service
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::Internal(detail).into_response()
}
