use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::heatmap::models::NewsRow;
use crate::shared::constants::DEFAULT_NEWS_LIMIT;

fn default_news_limit() -> i64 {
    DEFAULT_NEWS_LIMIT
}

/// Query parameters for the latest-news endpoint
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct NewsQuery {
    /// Number of items to return (default: 10, no upper bound)
    #[serde(default = "default_news_limit")]
    #[param(minimum = 0, example = 10)]
    #[validate(range(min = 0, message = "limit must not be negative"))]
    pub limit: i64,
}

/// Province with its aggregated counts and optional detail block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProvinceDto {
    pub id: String,
    pub name: String,
    /// Relevance score
    pub value: f64,
    /// Number of source records attributed to the province
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ProvinceDetailsDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProvinceDetailsDto {
    pub cities: Vec<CityDto>,
    /// Omitted when the province has no news
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news: Option<Vec<NewsItemDto>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CityDto {
    pub name: String,
    pub count: i64,
    /// Free-text deployment lines
    pub details: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news: Option<Vec<NewsItemDto>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsItemDto {
    pub id: String,
    pub title: String,
    pub content: String,
    pub url: String,
    /// ISO-8601 timestamp
    pub publish_date: String,
    pub location: NewsLocationDto,
    pub relevance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_info: Option<String>,
}

/// Denormalized location names, rendered as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewsLocationDto {
    pub province: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

impl From<NewsRow> for NewsItemDto {
    fn from(row: NewsRow) -> Self {
        Self {
            publish_date: row.publish_date.to_iso_string(),
            id: row.id,
            title: row.title,
            content: row.content,
            url: row.url,
            location: NewsLocationDto {
                province: row.province_name,
                city: row.city_name,
                district: row.district,
            },
            relevance: row.relevance,
            deployment_info: row.deployment_info,
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TableCountsDto {
    pub provinces: i64,
    pub cities: i64,
    pub news: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsDto {
    pub connection_time: String,
    pub tables: Vec<String>,
    pub counts: TableCountsDto,
    /// First rows of `provinces`, without details
    pub province_samples: Vec<ProvinceDto>,
}
