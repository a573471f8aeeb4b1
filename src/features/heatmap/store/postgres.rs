use std::time::Instant;

use async_trait::async_trait;
use chrono::SecondsFormat;
use sqlx::PgPool;

use super::{HeatmapStore, StoreResult};
use crate::core::database::{check_connection, is_pool_fatal, FatalSignal};
use crate::features::heatmap::models::{
    CityRow, NewsRow, ProvinceDetailRows, ProvinceRow, ProvinceSnapshot, StoreDiagnostics,
};
use crate::shared::constants::{ALL_PROVINCES_NEWS_WINDOW, PROVINCE_DETAIL_NEWS_WINDOW};

const PROVINCE_SAMPLE_SIZE: i64 = 5;

/// Store backed by the shared Postgres pool
pub struct PgHeatmapStore {
    pool: PgPool,
    fatal: FatalSignal,
}

impl PgHeatmapStore {
    pub fn new(pool: PgPool, fatal: FatalSignal) -> Self {
        Self { pool, fatal }
    }

    /// Log one finished query and raise the fatal signal if the pool is gone
    fn observe<T>(
        &self,
        query: &'static str,
        started: Instant,
        result: StoreResult<T>,
        rows: impl Fn(&T) -> usize,
    ) -> StoreResult<T> {
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(value) => {
                tracing::debug!(query, duration_ms, rows = rows(value), "Executed query");
            }
            Err(e) => {
                tracing::error!(query, duration_ms, "Query failed: {:?}", e);
                if is_pool_fatal(e) {
                    self.fatal.trip(&e.to_string());
                }
            }
        }
        result
    }

    async fn fetch_cities(&self, province_id: Option<&str>) -> StoreResult<Vec<CityRow>> {
        let started = Instant::now();
        let result = match province_id {
            Some(id) => {
                sqlx::query_as::<_, CityRow>(
                    r#"
                    SELECT id, province_id, name, count, details
                    FROM cities
                    WHERE province_id::text = $1
                    ORDER BY count DESC
                    "#,
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, CityRow>(
                    r#"
                    SELECT id, province_id, name, count, details
                    FROM cities
                    ORDER BY count DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        };
        self.observe("cities", started, result, Vec::len)
    }
}

#[async_trait]
impl HeatmapStore for PgHeatmapStore {
    async fn fetch_all_provinces(&self) -> StoreResult<ProvinceSnapshot> {
        let started = Instant::now();
        let provinces = sqlx::query_as::<_, ProvinceRow>(
            r#"
            SELECT id, name, value, count
            FROM provinces
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        let provinces = self.observe("provinces", started, provinces, Vec::len)?;

        if provinces.is_empty() {
            return Ok(ProvinceSnapshot::default());
        }

        let cities = self.fetch_cities(None).await?;

        let started = Instant::now();
        let news = sqlx::query_as::<_, NewsRow>(
            r#"
            WITH ranked_news AS (
                SELECT
                    n.*,
                    p.name AS province_name,
                    c.name AS city_name,
                    ROW_NUMBER() OVER (
                        PARTITION BY n.province_id ORDER BY n.publish_date DESC
                    ) AS rn
                FROM news n
                JOIN provinces p ON n.province_id = p.id
                LEFT JOIN cities c ON n.city_id = c.id
            )
            SELECT
                id, title, content, url, publish_date,
                relevance, deployment_info, province_id, city_id, district,
                province_name, city_name, rn
            FROM ranked_news
            WHERE rn <= $1
            ORDER BY province_id, rn
            "#,
        )
        .bind(ALL_PROVINCES_NEWS_WINDOW as i64)
        .fetch_all(&self.pool)
        .await;
        let news = self.observe("ranked_news", started, news, Vec::len)?;

        Ok(ProvinceSnapshot {
            provinces,
            cities,
            news,
        })
    }

    async fn fetch_province(&self, id: &str) -> StoreResult<Option<ProvinceDetailRows>> {
        let started = Instant::now();
        let province = sqlx::query_as::<_, ProvinceRow>(
            r#"
            SELECT id, name, value, count
            FROM provinces
            WHERE id::text = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        let province = self.observe("province_by_id", started, province, |row| {
            usize::from(row.is_some())
        })?;

        let Some(province) = province else {
            return Ok(None);
        };

        let cities = self.fetch_cities(Some(&province.id)).await?;

        let started = Instant::now();
        let news = sqlx::query_as::<_, NewsRow>(
            r#"
            SELECT
                n.id, n.title, n.content, n.url,
                n.publish_date, n.relevance, n.deployment_info,
                n.province_id, n.city_id, n.district,
                p.name AS province_name,
                c.name AS city_name
            FROM news n
            JOIN provinces p ON n.province_id = p.id
            LEFT JOIN cities c ON n.city_id = c.id
            WHERE n.province_id::text = $1
            ORDER BY n.publish_date DESC
            LIMIT $2
            "#,
        )
        .bind(&province.id)
        .bind(PROVINCE_DETAIL_NEWS_WINDOW as i64)
        .fetch_all(&self.pool)
        .await;
        let news = self.observe("province_news", started, news, Vec::len)?;

        Ok(Some(ProvinceDetailRows {
            province,
            cities,
            news,
        }))
    }

    async fn fetch_latest_news(&self, limit: i64) -> StoreResult<Vec<NewsRow>> {
        let started = Instant::now();
        let news = sqlx::query_as::<_, NewsRow>(
            r#"
            SELECT
                n.id, n.title, n.content, n.url,
                n.publish_date, n.relevance, n.deployment_info,
                n.province_id, n.city_id, n.district,
                p.name AS province_name,
                c.name AS city_name
            FROM news n
            JOIN provinces p ON n.province_id = p.id
            LEFT JOIN cities c ON n.city_id = c.id
            ORDER BY n.publish_date DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        self.observe("latest_news", started, news, Vec::len)
    }

    async fn diagnostics(&self) -> StoreResult<StoreDiagnostics> {
        let started = Instant::now();
        let now = check_connection(&self.pool).await;
        let now = self.observe("now", started, now, |_| 1)?;

        let started = Instant::now();
        let tables = sqlx::query_scalar::<_, String>(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = 'public'
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        let tables = self.observe("tables", started, tables, Vec::len)?;

        let started = Instant::now();
        let counts = futures::future::try_join3(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM provinces").fetch_one(&self.pool),
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cities").fetch_one(&self.pool),
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM news").fetch_one(&self.pool),
        )
        .await;
        let (province_count, city_count, news_count) =
            self.observe("table_counts", started, counts, |_| 3)?;

        let started = Instant::now();
        let samples = sqlx::query_as::<_, ProvinceRow>(
            r#"
            SELECT id, name, value, count
            FROM provinces
            LIMIT $1
            "#,
        )
        .bind(PROVINCE_SAMPLE_SIZE)
        .fetch_all(&self.pool)
        .await;
        let province_samples = self.observe("province_samples", started, samples, Vec::len)?;

        Ok(StoreDiagnostics {
            connection_time: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            tables,
            province_count,
            city_count,
            news_count,
            province_samples,
        })
    }
}
