mod city;
pub mod decode;
mod news;
mod province;

pub use city::CityRow;
pub use news::{NewsRow, PublishDate};
pub use province::ProvinceRow;

/// Rows behind the "all provinces" view, one query each
#[derive(Debug, Clone, Default)]
pub struct ProvinceSnapshot {
    pub provinces: Vec<ProvinceRow>,
    pub cities: Vec<CityRow>,
    /// Ranked per province, already cut to the view's window by the query
    pub news: Vec<NewsRow>,
}

/// Rows behind the single-province view
#[derive(Debug, Clone)]
pub struct ProvinceDetailRows {
    pub province: ProvinceRow,
    pub cities: Vec<CityRow>,
    pub news: Vec<NewsRow>,
}

/// Store health snapshot for the debug endpoint
#[derive(Debug, Clone)]
pub struct StoreDiagnostics {
    pub connection_time: String,
    pub tables: Vec<String>,
    pub province_count: i64,
    pub city_count: i64,
    pub news_count: i64,
    pub province_samples: Vec<ProvinceRow>,
}
