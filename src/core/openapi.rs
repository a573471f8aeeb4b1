use utoipa::{Modify, OpenApi};

use crate::features::heatmap::{dtos as heatmap_dtos, handlers as heatmap_handlers};
use crate::features::map::{dtos as map_dtos, handlers as map_handlers, map_shape};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Heatmap
        heatmap_handlers::list_provinces,
        heatmap_handlers::get_province,
        heatmap_handlers::latest_news,
        heatmap_handlers::get_diagnostics,
        // Map
        map_handlers::get_map_view,
        map_handlers::get_hover,
        map_handlers::get_map_shape,
    ),
    components(
        schemas(
            // Heatmap
            heatmap_dtos::ProvinceDto,
            heatmap_dtos::ProvinceDetailsDto,
            heatmap_dtos::CityDto,
            heatmap_dtos::NewsItemDto,
            heatmap_dtos::NewsLocationDto,
            heatmap_dtos::DiagnosticsDto,
            heatmap_dtos::TableCountsDto,
            ApiResponse<Vec<heatmap_dtos::ProvinceDto>>,
            ApiResponse<heatmap_dtos::ProvinceDto>,
            ApiResponse<Vec<heatmap_dtos::NewsItemDto>>,
            ApiResponse<heatmap_dtos::DiagnosticsDto>,
            // Map
            map_dtos::MapViewDto,
            map_dtos::VisualMapDto,
            map_dtos::MapRegionDto,
            map_dtos::DashboardSummaryDto,
            map_dtos::HotProvinceDto,
            map_dtos::HoverViewDto,
            map_dtos::HoverStep,
            map_dtos::NewsCursorDto,
            map_shape::FeatureCollection,
            map_shape::Feature,
            ApiResponse<map_dtos::MapViewDto>,
            ApiResponse<map_dtos::HoverViewDto>,
        )
    ),
    tags(
        (name = "Heatmap", description = "Province, city and news aggregation"),
        (name = "Map", description = "Choropleth view, hover panels and map outline"),
    ),
    info(
        title = "Deploy Heatmap API",
        version = "0.1.0",
        description = "Province deployment heat-map data",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_public_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/data",
            "/api/province/{id}",
            "/api/news",
            "/api/map/view",
            "/api/map/hover",
            "/china.json",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Heatmap".to_string(),
            version: "9.9.9".to_string(),
            description: "test".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Heatmap");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
