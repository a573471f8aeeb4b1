use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::heatmap::dtos::{DiagnosticsDto, NewsItemDto, ProvinceDto, TableCountsDto};
use crate::features::heatmap::mapper;
use crate::features::heatmap::store::HeatmapStore;

/// Read-side aggregation over the province / city / news store
pub struct HeatmapService {
    store: Arc<dyn HeatmapStore>,
}

impl HeatmapService {
    pub fn new(store: Arc<dyn HeatmapStore>) -> Self {
        Self { store }
    }

    /// Every province with its cities and most recent news
    pub async fn list_provinces(&self) -> Result<Vec<ProvinceDto>> {
        let snapshot = self.store.fetch_all_provinces().await.map_err(|e| {
            tracing::error!("Failed to fetch provinces: {:?}", e);
            AppError::Database(e)
        })?;

        let provinces = mapper::assemble_provinces(snapshot);
        tracing::info!("Fetched {} provinces", provinces.len());
        Ok(provinces)
    }

    pub async fn get_province(&self, id: &str) -> Result<ProvinceDto> {
        let rows = self
            .store
            .fetch_province(id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch province {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Province not found".to_string()))?;

        let province = mapper::assemble_province(rows);
        if let Some(details) = &province.details {
            tracing::info!(
                "Fetched province {} with {} cities and {} news",
                province.name,
                details.cities.len(),
                details.news.as_ref().map_or(0, Vec::len)
            );
        }
        Ok(province)
    }

    /// Newest news across all provinces; `limit` is trusted to be non-negative
    pub async fn latest_news(&self, limit: i64) -> Result<Vec<NewsItemDto>> {
        let rows = self.store.fetch_latest_news(limit).await.map_err(|e| {
            tracing::error!("Failed to fetch latest news: {:?}", e);
            AppError::Database(e)
        })?;

        let news = mapper::assemble_news(rows);
        tracing::info!("Fetched {} latest news items", news.len());
        Ok(news)
    }

    pub async fn diagnostics(&self) -> Result<DiagnosticsDto> {
        let diagnostics = self.store.diagnostics().await.map_err(|e| {
            tracing::error!("Database diagnostics failed: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(DiagnosticsDto {
            connection_time: diagnostics.connection_time,
            tables: diagnostics.tables,
            counts: TableCountsDto {
                provinces: diagnostics.province_count,
                cities: diagnostics.city_count,
                news: diagnostics.news_count,
            },
            province_samples: diagnostics
                .province_samples
                .into_iter()
                .map(mapper::province_summary)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::heatmap::store::FixtureStore;
    use crate::shared::test_helpers::{news_row, province_row, FailingStore};

    fn service_with(store: impl HeatmapStore + 'static) -> HeatmapService {
        HeatmapService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_get_province_not_found() {
        let service = service_with(FixtureStore::development());
        let err = service.get_province("99").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_latest_news_is_newest_first() {
        let news = (1..=5)
            .map(|day| news_row(&format!("n{}", day), "44", "广东省", day))
            .collect();
        let service = service_with(FixtureStore::from_rows(
            vec![province_row("44", "广东省", 90.0, 37)],
            Vec::new(),
            news,
        ));

        let ids: Vec<String> = service
            .latest_news(3)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec!["n5", "n4", "n3"]);
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_database_error() {
        let service = service_with(FailingStore);
        assert!(matches!(
            service.list_provinces().await,
            Err(AppError::Database(_))
        ));
        assert!(matches!(
            service.get_province("44").await,
            Err(AppError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_diagnostics_counts() {
        let service = service_with(FixtureStore::development());
        let diagnostics = service.diagnostics().await.unwrap();
        assert_eq!(diagnostics.counts.provinces, 34);
        assert_eq!(diagnostics.province_samples.len(), 5);
        assert!(diagnostics.province_samples[0].details.is_none());
    }
}
