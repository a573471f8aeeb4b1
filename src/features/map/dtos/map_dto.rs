use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::heatmap::dtos::{NewsItemDto, ProvinceDto};
use crate::features::map::news_cursor::Step;

// ============================================================================
// Query parameters
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MapViewQuery {
    /// Overrides the configured chart title
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HoverStep {
    Prev,
    Next,
}

impl From<HoverStep> for Step {
    fn from(step: HoverStep) -> Self {
        match step {
            HoverStep::Prev => Step::Prev,
            HoverStep::Next => Step::Next,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct HoverQuery {
    /// Region name as drawn on the map
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// Current news index; omitted on a fresh hover
    #[serde(default)]
    pub index: usize,
    /// Move the news cursor one item back or forward
    pub step: Option<HoverStep>,
}

// ============================================================================
// Map view
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapViewDto {
    pub title: String,
    pub visual_map: VisualMapDto,
    pub regions: Vec<MapRegionDto>,
    /// Shape regions without any province data
    pub unmatched_regions: Vec<String>,
    pub summary: DashboardSummaryDto,
    pub latest_news: Vec<NewsItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisualMapDto {
    pub min: f64,
    pub max: f64,
    /// Colour stops, lowest first
    pub colors: Vec<String>,
}

/// One filled region of the choropleth
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapRegionDto {
    /// Name as used by the map shape
    pub name: String,
    pub province_id: String,
    pub province_name: String,
    pub value: f64,
    pub count: i64,
    pub fill_color: String,
    /// Pre-rendered, escaped HTML
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummaryDto {
    /// Sum of `count` over all provinces
    pub total_records: i64,
    /// Provinces with `count > 0`
    pub provinces_with_data: usize,
    /// Highest `value`, 0 without data
    pub peak_value: f64,
    pub hot_provinces: Vec<HotProvinceDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HotProvinceDto {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub count: i64,
}

// ============================================================================
// Hover view
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HoverViewDto {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<ProvinceDto>,
    pub tooltip: String,
    pub news: NewsCursorDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsCursorDto {
    pub index: usize,
    /// 1-based, 0 when there is no news
    pub position: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<NewsItemDto>,
}
