//! Read access to the `provinces`, `cities` and `news` tables.

mod fixtures;
mod postgres;

pub use fixtures::FixtureStore;
pub use postgres::PgHeatmapStore;

use async_trait::async_trait;

use crate::features::heatmap::models::{
    NewsRow, ProvinceDetailRows, ProvinceSnapshot, StoreDiagnostics,
};

pub type StoreResult<T> = std::result::Result<T, sqlx::Error>;

#[async_trait]
pub trait HeatmapStore: Send + Sync {
    /// All provinces and cities, plus the most recent news of each province
    /// ranked per province and cut to the overview window
    async fn fetch_all_provinces(&self) -> StoreResult<ProvinceSnapshot>;

    /// One province with its cities and recent news; `None` when the id matches nothing
    async fn fetch_province(&self, id: &str) -> StoreResult<Option<ProvinceDetailRows>>;

    /// Newest news across all provinces
    async fn fetch_latest_news(&self, limit: i64) -> StoreResult<Vec<NewsRow>>;

    async fn diagnostics(&self) -> StoreResult<StoreDiagnostics>;
}
