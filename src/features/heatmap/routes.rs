use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::heatmap::handlers;
use crate::features::heatmap::services::HeatmapService;

/// Create public heatmap routes
pub fn routes(heatmap_service: Arc<HeatmapService>) -> Router {
    Router::new()
        .route("/api/data", get(handlers::list_provinces))
        .route("/api/province/{id}", get(handlers::get_province))
        .route("/api/news", get(handlers::latest_news))
        .with_state(heatmap_service)
}

/// Store diagnostics, mounted outside production only
pub fn debug_routes(heatmap_service: Arc<HeatmapService>) -> Router {
    Router::new()
        .route("/api/debug", get(handlers::get_diagnostics))
        .with_state(heatmap_service)
}
