use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::map::handlers;
use crate::features::map::services::MapViewService;

/// Create public map presentation routes
pub fn routes(map_service: Arc<MapViewService>) -> Router {
    Router::new()
        .route("/api/map/view", get(handlers::get_map_view))
        .route("/api/map/hover", get(handlers::get_hover))
        // Map outline, registered by the client before drawing
        .route("/china.json", get(handlers::get_map_shape))
        .with_state(map_service)
}
