#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use axum_test::TestServer;
#[cfg(test)]
use chrono::{TimeZone, Utc};
#[cfg(test)]
use fake::faker::lorem::en::{Paragraph, Sentence};
#[cfg(test)]
use fake::Fake;

#[cfg(test)]
use crate::features::heatmap::models::{
    CityRow, NewsRow, ProvinceDetailRows, ProvinceRow, ProvinceSnapshot, PublishDate,
    StoreDiagnostics,
};
#[cfg(test)]
use crate::features::heatmap::store::{HeatmapStore, StoreResult};
#[cfg(test)]
use crate::features::heatmap::{self, HeatmapService};
#[cfg(test)]
use crate::features::map::{self, color_scale::ColorScale, map_shape::FeatureCollection};

#[cfg(test)]
pub fn province_row(id: &str, name: &str, value: f64, count: i64) -> ProvinceRow {
    ProvinceRow {
        id: id.to_string(),
        name: name.to_string(),
        value,
        count,
    }
}

#[cfg(test)]
pub fn city_row(id: &str, province_id: &str, name: &str, count: i64) -> CityRow {
    CityRow {
        id: id.to_string(),
        province_id: province_id.to_string(),
        name: name.to_string(),
        count,
        details: (1..=count).map(|i| format!("{}部署点{}", name, i)).collect(),
    }
}

/// News published at midnight UTC on 2024-01-`day`
#[cfg(test)]
pub fn news_row(id: &str, province_id: &str, province_name: &str, day: u32) -> NewsRow {
    let published = Utc
        .with_ymd_and_hms(2024, 1, day, 0, 0, 0)
        .single()
        .expect("valid test date");

    NewsRow {
        id: id.to_string(),
        title: Sentence(3..8).fake(),
        content: Paragraph(1..3).fake(),
        url: format!("https://example.com/news/{}", id),
        publish_date: PublishDate::Timestamp(published),
        relevance: (60..100).fake::<i32>() as f64,
        deployment_info: None,
        province_id: province_id.to_string(),
        city_id: None,
        district: None,
        province_name: province_name.to_string(),
        city_name: None,
        rank: None,
    }
}

/// Store whose every query fails the way an exhausted pool does
#[cfg(test)]
pub struct FailingStore;

#[cfg(test)]
#[async_trait]
impl HeatmapStore for FailingStore {
    async fn fetch_all_provinces(&self) -> StoreResult<ProvinceSnapshot> {
        Err(sqlx::Error::PoolTimedOut)
    }

    async fn fetch_province(&self, _id: &str) -> StoreResult<Option<ProvinceDetailRows>> {
        Err(sqlx::Error::PoolTimedOut)
    }

    async fn fetch_latest_news(&self, _limit: i64) -> StoreResult<Vec<NewsRow>> {
        Err(sqlx::Error::PoolTimedOut)
    }

    async fn diagnostics(&self) -> StoreResult<StoreDiagnostics> {
        Err(sqlx::Error::PoolTimedOut)
    }
}

#[cfg(test)]
fn heatmap_service(store: impl HeatmapStore + 'static) -> Arc<HeatmapService> {
    Arc::new(HeatmapService::new(Arc::new(store)))
}

/// Heatmap routes, including diagnostics, over `store`
#[cfg(test)]
pub fn heatmap_server(store: impl HeatmapStore + 'static) -> TestServer {
    let service = heatmap_service(store);
    let app = heatmap::routes(Arc::clone(&service)).merge(heatmap::debug_routes(service));
    TestServer::new(app).expect("test server")
}

/// Map routes over `store`, drawn on the placeholder outline
#[cfg(test)]
pub fn map_server(store: impl HeatmapStore + 'static) -> TestServer {
    let service = Arc::new(map::MapViewService::new(
        heatmap_service(store),
        Arc::new(FeatureCollection::placeholder()),
        ColorScale::default(),
        "DeepSeek 部署热力图".to_string(),
    ));
    TestServer::new(map::routes(service)).expect("test server")
}
