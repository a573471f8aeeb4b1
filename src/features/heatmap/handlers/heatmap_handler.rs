use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, EndpointError, EnvelopeExt};
use crate::core::extractor::AppQuery;
use crate::features::heatmap::dtos::*;
use crate::features::heatmap::services::HeatmapService;
use crate::shared::types::ApiResponse;

type EndpointResult<T> = Result<Json<ApiResponse<T>>, EndpointError>;

/// All provinces with cities and their most recent news
#[utoipa::path(
    get,
    path = "/api/data",
    tag = "Heatmap",
    responses(
        (status = 200, description = "Provinces ordered by record count", body = ApiResponse<Vec<ProvinceDto>>),
        (status = 500, description = "Store failure, `data` is an empty list")
    )
)]
pub async fn list_provinces(
    State(service): State<Arc<HeatmapService>>,
) -> EndpointResult<Vec<ProvinceDto>> {
    let provinces = service
        .list_provinces()
        .await
        .or_empty_list("Failed to fetch map data")?;
    Ok(Json(ApiResponse::success(provinces)))
}

/// One province with all of its cities and up to 20 recent news items
#[utoipa::path(
    get,
    path = "/api/province/{id}",
    tag = "Heatmap",
    params(
        ("id" = String, Path, description = "Province ID")
    ),
    responses(
        (status = 200, description = "Province detail", body = ApiResponse<ProvinceDto>),
        (status = 404, description = "Province not found, `data` is null"),
        (status = 500, description = "Store failure, `data` is null")
    )
)]
pub async fn get_province(
    State(service): State<Arc<HeatmapService>>,
    Path(id): Path<String>,
) -> EndpointResult<ProvinceDto> {
    let province = service
        .get_province(&id)
        .await
        .or_null("Failed to fetch province detail")?;
    Ok(Json(ApiResponse::success(province)))
}

/// Latest news across all provinces
#[utoipa::path(
    get,
    path = "/api/news",
    tag = "Heatmap",
    params(NewsQuery),
    responses(
        (status = 200, description = "News, newest first", body = ApiResponse<Vec<NewsItemDto>>),
        (status = 400, description = "Invalid limit, `data` is an empty list"),
        (status = 500, description = "Store failure, `data` is an empty list")
    )
)]
pub async fn latest_news(
    State(service): State<Arc<HeatmapService>>,
    query: Result<AppQuery<NewsQuery>, AppError>,
) -> EndpointResult<Vec<NewsItemDto>> {
    let AppQuery(query) = query.or_empty_list("Failed to fetch news")?;
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))
        .or_empty_list("Failed to fetch news")?;

    let news = service
        .latest_news(query.limit)
        .await
        .or_empty_list("Failed to fetch news")?;
    Ok(Json(ApiResponse::success(news)))
}

/// Store connectivity and table overview
#[utoipa::path(
    get,
    path = "/api/debug",
    tag = "Heatmap",
    responses(
        (status = 200, description = "Store diagnostics", body = ApiResponse<DiagnosticsDto>),
        (status = 500, description = "Store unreachable")
    )
)]
pub async fn get_diagnostics(
    State(service): State<Arc<HeatmapService>>,
) -> EndpointResult<DiagnosticsDto> {
    let diagnostics = service
        .diagnostics()
        .await
        .or_null("Database diagnostics failed")?;
    Ok(Json(ApiResponse::success(diagnostics)))
}
