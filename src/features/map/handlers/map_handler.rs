use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, EndpointError, EnvelopeExt};
use crate::core::extractor::AppQuery;
use crate::features::map::dtos::*;
use crate::features::map::map_shape::FeatureCollection;
use crate::features::map::services::MapViewService;
use crate::shared::types::ApiResponse;

/// Chart model for the province heat map
#[utoipa::path(
    get,
    path = "/api/map/view",
    tag = "Map",
    params(MapViewQuery),
    responses(
        (status = 200, description = "Regions, colour scale, summary and latest news", body = ApiResponse<MapViewDto>),
        (status = 500, description = "Province data unavailable, `data` is null")
    )
)]
pub async fn get_map_view(
    State(service): State<Arc<MapViewService>>,
    query: Result<AppQuery<MapViewQuery>, AppError>,
) -> Result<Json<ApiResponse<MapViewDto>>, EndpointError> {
    let AppQuery(query) = query.or_null("Failed to build map view")?;
    let view = service
        .build_view(query.title)
        .await
        .or_null("Failed to build map view")?;
    Ok(Json(ApiResponse::success(view)))
}

/// Tooltip and news cursor for a hovered region
#[utoipa::path(
    get,
    path = "/api/map/hover",
    tag = "Map",
    params(HoverQuery),
    responses(
        (status = 200, description = "Hover panel; unknown regions get a no-data tooltip", body = ApiResponse<HoverViewDto>),
        (status = 400, description = "Missing or invalid parameters, `data` is null"),
        (status = 500, description = "Province data unavailable, `data` is null")
    )
)]
pub async fn get_hover(
    State(service): State<Arc<MapViewService>>,
    query: Result<AppQuery<HoverQuery>, AppError>,
) -> Result<Json<ApiResponse<HoverViewDto>>, EndpointError> {
    let AppQuery(query) = query.or_null("Failed to build hover view")?;
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))
        .or_null("Failed to build hover view")?;

    let view = service
        .hover(query)
        .await
        .or_null("Failed to build hover view")?;
    Ok(Json(ApiResponse::success(view)))
}

/// GeoJSON outline the map is drawn on
#[utoipa::path(
    get,
    path = "/china.json",
    tag = "Map",
    responses(
        (status = 200, description = "Map shape, or the placeholder outline", body = FeatureCollection)
    )
)]
pub async fn get_map_shape(State(service): State<Arc<MapViewService>>) -> Json<FeatureCollection> {
    Json(service.shape().as_ref().clone())
}
