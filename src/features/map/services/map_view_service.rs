use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::heatmap::dtos::{NewsItemDto, ProvinceDto};
use crate::features::heatmap::HeatmapService;
use crate::features::map::color_scale::ColorScale;
use crate::features::map::dtos::*;
use crate::features::map::map_shape::FeatureCollection;
use crate::features::map::news_cursor::NewsCursor;
use crate::features::map::region_name::{find_province, names_match, shape_name_for};
use crate::features::map::tooltip::{render_missing_tooltip, render_province_tooltip};
use crate::shared::constants::{HOT_PROVINCES_LIMIT, MAP_LATEST_NEWS_LIMIT};

/// Builds the chart model and hover panels on top of the heatmap data
pub struct MapViewService {
    heatmap: Arc<HeatmapService>,
    shape: Arc<FeatureCollection>,
    shape_names: Vec<String>,
    scale: ColorScale,
    title: String,
}

impl MapViewService {
    pub fn new(
        heatmap: Arc<HeatmapService>,
        shape: Arc<FeatureCollection>,
        scale: ColorScale,
        title: String,
    ) -> Self {
        let shape_names = shape.region_names();
        Self {
            heatmap,
            shape,
            shape_names,
            scale,
            title,
        }
    }

    /// The outline registered at startup
    pub fn shape(&self) -> Arc<FeatureCollection> {
        Arc::clone(&self.shape)
    }

    pub async fn build_view(&self, title: Option<String>) -> Result<MapViewDto> {
        let provinces = self.heatmap.list_provinces().await?;

        let latest_news = self
            .heatmap
            .latest_news(MAP_LATEST_NEWS_LIMIT)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Latest news unavailable for map view: {}", e);
                Vec::new()
            });

        let regions = provinces
            .iter()
            .map(|province| -> Result<MapRegionDto> {
                let name = shape_name_for(&self.shape_names, &province.name).to_string();
                let tooltip = render_province_tooltip(&name, province)?;
                Ok(MapRegionDto {
                    province_id: province.id.clone(),
                    province_name: province.name.clone(),
                    value: province.value,
                    count: province.count,
                    fill_color: self.scale.hex_for(province.value),
                    tooltip,
                    name,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let unmatched_regions: Vec<String> = self
            .shape_names
            .iter()
            .filter(|shape_name| !provinces.iter().any(|p| names_match(shape_name, &p.name)))
            .cloned()
            .collect();

        tracing::debug!(
            "Built map view with {} regions, {} shape regions without data",
            regions.len(),
            unmatched_regions.len()
        );

        Ok(MapViewDto {
            title: title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| self.title.clone()),
            visual_map: VisualMapDto {
                min: self.scale.min(),
                max: self.scale.max(),
                colors: self.scale.stops_hex(),
            },
            regions,
            unmatched_regions,
            summary: summarize(&provinces),
            latest_news,
        })
    }

    pub async fn hover(&self, query: HoverQuery) -> Result<HoverViewDto> {
        let provinces = self.heatmap.list_provinces().await?;

        let Some(province) = find_province(&provinces, &query.name) else {
            return Ok(HoverViewDto {
                tooltip: render_missing_tooltip(&query.name)?,
                name: query.name,
                province: None,
                news: cursor_dto(NewsCursor::start(0), None),
            });
        };

        let news = province
            .details
            .as_ref()
            .and_then(|d| d.news.as_deref())
            .unwrap_or_default();

        let mut cursor = NewsCursor::at(query.index, news.len());
        if let Some(step) = query.step {
            cursor = cursor.step(step.into());
        }

        Ok(HoverViewDto {
            tooltip: render_province_tooltip(&query.name, province)?,
            news: cursor_dto(cursor, news.get(cursor.index()).cloned()),
            province: Some(province.clone()),
            name: query.name,
        })
    }
}

fn cursor_dto(cursor: NewsCursor, item: Option<NewsItemDto>) -> NewsCursorDto {
    NewsCursorDto {
        index: cursor.index(),
        position: cursor.position(),
        total: cursor.total(),
        has_prev: cursor.has_prev(),
        has_next: cursor.has_next(),
        item,
    }
}

/// Headline numbers shown next to the map
pub fn summarize(provinces: &[ProvinceDto]) -> DashboardSummaryDto {
    let mut hot: Vec<&ProvinceDto> = provinces.iter().collect();
    hot.sort_by(|a, b| b.value.total_cmp(&a.value));

    DashboardSummaryDto {
        total_records: provinces.iter().map(|p| p.count).sum(),
        provinces_with_data: provinces.iter().filter(|p| p.count > 0).count(),
        peak_value: provinces
            .iter()
            .map(|p| p.value)
            .fold(None, |peak: Option<f64>, v| Some(peak.map_or(v, |p| p.max(v))))
            .unwrap_or(0.0),
        hot_provinces: hot
            .into_iter()
            .take(HOT_PROVINCES_LIMIT)
            .map(|p| HotProvinceDto {
                id: p.id.clone(),
                name: p.name.clone(),
                value: p.value,
                count: p.count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::heatmap::mapper::province_summary;
    use crate::features::heatmap::store::{FixtureStore, HeatmapStore};
    use crate::shared::test_helpers::{province_row, FailingStore};

    fn service(store: impl HeatmapStore + 'static, shape: FeatureCollection) -> MapViewService {
        MapViewService::new(
            Arc::new(HeatmapService::new(Arc::new(store))),
            Arc::new(shape),
            ColorScale::default(),
            "DeepSeek 部署热力图".to_string(),
        )
    }

    #[test]
    fn test_summary() {
        let provinces: Vec<ProvinceDto> = [
            ("11", "北京市", 95.0, 42),
            ("54", "西藏自治区", 30.0, 0),
            ("44", "广东省", 90.0, 37),
            ("31", "上海市", 93.0, 39),
            ("32", "江苏省", 88.0, 35),
            ("33", "浙江省", 86.0, 34),
        ]
        .into_iter()
        .map(|(id, name, value, count)| province_summary(province_row(id, name, value, count)))
        .collect();

        let summary = summarize(&provinces);
        assert_eq!(summary.total_records, 187);
        assert_eq!(summary.provinces_with_data, 5);
        assert_eq!(summary.peak_value, 95.0);
        let hot: Vec<&str> = summary.hot_provinces.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(hot, vec!["北京市", "上海市", "广东省", "江苏省", "浙江省"]);
    }

    #[test]
    fn test_summary_without_data() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.peak_value, 0.0);
        assert!(summary.hot_provinces.is_empty());
    }

    #[tokio::test]
    async fn test_view_reconciles_shape_names() {
        let shape: FeatureCollection = serde_json::from_value(serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"name": "广东"}, "geometry": null},
                {"type": "Feature", "properties": {"name": "南海诸岛"}, "geometry": null}
            ]
        }))
        .unwrap();
        let service = service(FixtureStore::development(), shape);

        let view = service.build_view(None).await.unwrap();
        assert_eq!(view.title, "DeepSeek 部署热力图");
        assert_eq!(view.regions.len(), 34);
        assert_eq!(view.visual_map.colors.len(), 6);

        let guangdong = view.regions.iter().find(|r| r.province_id == "44").unwrap();
        assert_eq!(guangdong.name, "广东");
        assert_eq!(guangdong.province_name, "广东省");
        assert_eq!(guangdong.fill_color, "#d73027");
        assert!(guangdong.tooltip.contains("城市部署情况"));

        assert_eq!(view.unmatched_regions, vec!["南海诸岛"]);
        assert_eq!(view.latest_news.len(), 5);
        assert_eq!(view.summary.provinces_with_data, 34);
    }

    #[tokio::test]
    async fn test_view_title_override() {
        let service = service(FixtureStore::development(), FeatureCollection::placeholder());
        let view = service.build_view(Some("自定义".to_string())).await.unwrap();
        assert_eq!(view.title, "自定义");
    }

    #[tokio::test]
    async fn test_view_fails_when_provinces_fail() {
        let service = service(FailingStore, FeatureCollection::placeholder());
        assert!(matches!(
            service.build_view(None).await,
            Err(AppError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_hover_clamps_cursor() {
        let service = service(FixtureStore::development(), FeatureCollection::placeholder());

        let view = service
            .hover(HoverQuery {
                name: "广东".to_string(),
                index: 2,
                step: Some(HoverStep::Next),
            })
            .await
            .unwrap();

        assert_eq!(view.province.as_ref().unwrap().id, "44");
        assert_eq!(view.news.total, 3);
        assert_eq!(view.news.index, 2);
        assert_eq!(view.news.position, 3);
        assert!(!view.news.has_next);
        assert!(view.news.item.is_some());
    }

    #[tokio::test]
    async fn test_hover_unknown_region() {
        let service = service(FixtureStore::development(), FeatureCollection::placeholder());

        let view = service
            .hover(HoverQuery {
                name: "南海诸岛".to_string(),
                index: 0,
                step: None,
            })
            .await
            .unwrap();

        assert!(view.province.is_none());
        assert_eq!(view.tooltip, "南海诸岛<br/>暂无数据");
        assert_eq!(view.news.total, 0);
        assert!(view.news.item.is_none());
    }
}
