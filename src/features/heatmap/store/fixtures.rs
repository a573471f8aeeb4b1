use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use super::{HeatmapStore, StoreResult};
use crate::features::heatmap::models::{
    CityRow, NewsRow, ProvinceDetailRows, ProvinceRow, ProvinceSnapshot, PublishDate,
    StoreDiagnostics,
};
use crate::shared::constants::{ALL_PROVINCES_NEWS_WINDOW, PROVINCE_DETAIL_NEWS_WINDOW};

/// In-memory store answering with the same contract as the Postgres queries.
///
/// Served when running locally without `DATABASE_URL`, and used by tests.
#[derive(Debug, Clone, Default)]
pub struct FixtureStore {
    provinces: Vec<ProvinceRow>,
    cities: Vec<CityRow>,
    news: Vec<NewsRow>,
}

impl FixtureStore {
    pub fn from_rows(provinces: Vec<ProvinceRow>, cities: Vec<CityRow>, news: Vec<NewsRow>) -> Self {
        Self {
            provinces,
            cities,
            news,
        }
    }

    /// Deterministic sample data covering every province
    pub fn development() -> Self {
        let provinces: Vec<ProvinceRow> = SAMPLE_PROVINCES
            .iter()
            .map(|(id, name, value, count)| ProvinceRow {
                id: id.to_string(),
                name: name.to_string(),
                value: *value,
                count: *count,
            })
            .collect();

        let mut cities = Vec::new();
        let mut news = Vec::new();
        for (province_name, city_names) in SAMPLE_CITIES {
            let Some(province) = provinces.iter().find(|p| p.name == *province_name) else {
                continue;
            };

            for (idx, city_name) in city_names.iter().enumerate() {
                let count = ((province.count as usize + idx * 3) % 10 + 1) as i64;
                cities.push(CityRow {
                    id: format!("{}{:02}", province.id, idx + 1),
                    province_id: province.id.clone(),
                    name: city_name.to_string(),
                    count,
                    details: (1..=count)
                        .map(|i| format!("{}{}部署点{}", province.name, city_name, i))
                        .collect(),
                });
            }

            for idx in 0..3 {
                news.push(sample_news(province, city_names, &cities, idx));
            }
        }

        Self::from_rows(provinces, cities, news)
    }

    /// News of one province, newest first
    fn province_news(&self, province_id: &str) -> Vec<NewsRow> {
        let mut rows: Vec<NewsRow> = self
            .news
            .iter()
            .filter(|n| n.province_id == province_id)
            .cloned()
            .collect();
        sort_newest_first(&mut rows);
        rows
    }
}

#[async_trait]
impl HeatmapStore for FixtureStore {
    async fn fetch_all_provinces(&self) -> StoreResult<ProvinceSnapshot> {
        if self.provinces.is_empty() {
            return Ok(ProvinceSnapshot::default());
        }

        let mut provinces = self.provinces.clone();
        provinces.sort_by(|a, b| b.count.cmp(&a.count));

        let mut cities = self.cities.clone();
        cities.sort_by(|a, b| b.count.cmp(&a.count));

        let mut by_province: HashMap<&str, Vec<NewsRow>> = HashMap::new();
        for row in &self.news {
            by_province
                .entry(row.province_id.as_str())
                .or_default()
                .push(row.clone());
        }

        let mut news = Vec::new();
        let mut province_ids: Vec<&str> = by_province.keys().copied().collect();
        province_ids.sort_unstable();
        for province_id in province_ids {
            let Some(mut rows) = by_province.remove(province_id) else {
                continue;
            };
            sort_newest_first(&mut rows);
            news.extend(
                rows.into_iter()
                    .take(ALL_PROVINCES_NEWS_WINDOW)
                    .enumerate()
                    .map(|(idx, mut row)| {
                        row.rank = Some(idx as i64 + 1);
                        row
                    }),
            );
        }

        Ok(ProvinceSnapshot {
            provinces,
            cities,
            news,
        })
    }

    async fn fetch_province(&self, id: &str) -> StoreResult<Option<ProvinceDetailRows>> {
        let Some(province) = self.provinces.iter().find(|p| p.id == id).cloned() else {
            return Ok(None);
        };

        let mut cities: Vec<CityRow> = self
            .cities
            .iter()
            .filter(|c| c.province_id == province.id)
            .cloned()
            .collect();
        cities.sort_by(|a, b| b.count.cmp(&a.count));

        let mut news = self.province_news(&province.id);
        news.truncate(PROVINCE_DETAIL_NEWS_WINDOW);

        Ok(Some(ProvinceDetailRows {
            province,
            cities,
            news,
        }))
    }

    async fn fetch_latest_news(&self, limit: i64) -> StoreResult<Vec<NewsRow>> {
        let mut news = self.news.clone();
        sort_newest_first(&mut news);
        news.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(news)
    }

    async fn diagnostics(&self) -> StoreResult<StoreDiagnostics> {
        Ok(StoreDiagnostics {
            connection_time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            tables: vec![
                "provinces".to_string(),
                "cities".to_string(),
                "news".to_string(),
            ],
            province_count: self.provinces.len() as i64,
            city_count: self.cities.len() as i64,
            news_count: self.news.len() as i64,
            province_samples: self.provinces.iter().take(5).cloned().collect(),
        })
    }
}

fn sort_newest_first(rows: &mut [NewsRow]) {
    rows.sort_by(|a, b| b.publish_date.sort_key().cmp(&a.publish_date.sort_key()));
}

fn sample_news(
    province: &ProvinceRow,
    city_names: &[&str],
    cities: &[CityRow],
    idx: usize,
) -> NewsRow {
    let seed = province.count as usize + idx;
    let deployment = DEPLOYMENT_TYPES[seed % DEPLOYMENT_TYPES.len()];
    let scenario = SCENARIOS[seed % SCENARIOS.len()];
    let institution = INSTITUTIONS[(seed * 3) % INSTITUTIONS.len()];
    let city_name = city_names[idx % city_names.len()];
    let city_id = cities
        .iter()
        .find(|c| c.province_id == province.id && c.name == city_name)
        .map(|c| c.id.clone());
    let date = format!("2025-02-{:02}", (seed * 7) % 28 + 1);
    let site = format!("{}{}{}", province.name, city_name, institution);

    NewsRow {
        id: format!("news-{}-{}", province.id, idx),
        title: format!("{}成功部署{}", site, deployment),
        content: format!(
            "{}，{}宣布成功部署{}，将应用于{}场景。该项目是DeepSeek在{}的重要落地项目之一。",
            date, site, deployment, scenario, province.name
        ),
        url: format!("https://example.com/news/{}-{}", province.id, idx),
        publish_date: PublishDate::Text(date),
        relevance: (60 + (seed * 13) % 40) as f64,
        deployment_info: Some(format!(
            "部署模型: {}\n应用场景: {}\n部署单位: {}",
            deployment, scenario, site
        )),
        province_id: province.id.clone(),
        city_id,
        district: None,
        province_name: province.name.clone(),
        city_name: Some(city_name.to_string()),
        rank: None,
    }
}

const SAMPLE_PROVINCES: &[(&str, &str, f64, i64)] = &[
    ("11", "北京市", 95.0, 42),
    ("12", "天津市", 82.0, 23),
    ("13", "河北省", 78.0, 31),
    ("14", "山西省", 67.0, 19),
    ("15", "内蒙古自治区", 55.0, 12),
    ("21", "辽宁省", 74.0, 27),
    ("22", "吉林省", 68.0, 18),
    ("23", "黑龙江省", 65.0, 17),
    ("31", "上海市", 93.0, 39),
    ("32", "江苏省", 88.0, 35),
    ("33", "浙江省", 86.0, 34),
    ("34", "安徽省", 72.0, 24),
    ("35", "福建省", 76.0, 25),
    ("36", "江西省", 63.0, 16),
    ("37", "山东省", 85.0, 32),
    ("41", "河南省", 75.0, 28),
    ("42", "湖北省", 77.0, 29),
    ("43", "湖南省", 73.0, 26),
    ("44", "广东省", 90.0, 37),
    ("45", "广西壮族自治区", 66.0, 18),
    ("46", "海南省", 62.0, 14),
    ("50", "重庆市", 79.0, 30),
    ("51", "四川省", 80.0, 31),
    ("52", "贵州省", 64.0, 17),
    ("53", "云南省", 67.0, 19),
    ("54", "西藏自治区", 30.0, 5),
    ("61", "陕西省", 71.0, 23),
    ("62", "甘肃省", 58.0, 13),
    ("63", "青海省", 45.0, 8),
    ("64", "宁夏回族自治区", 52.0, 10),
    ("65", "新疆维吾尔自治区", 48.0, 9),
    ("71", "台湾省", 56.0, 12),
    ("81", "香港特别行政区", 69.0, 20),
    ("82", "澳门特别行政区", 60.0, 15),
];

const SAMPLE_CITIES: &[(&str, &[&str])] = &[
    ("北京市", &["朝阳区", "海淀区", "丰台区", "石景山区", "通州区"]),
    ("上海市", &["静安区", "徐汇区", "黄浦区", "浦东新区", "长宁区"]),
    ("广东省", &["广州市", "深圳市", "珠海市", "佛山市", "东莞市"]),
    ("山西省", &["太原市", "大同市", "晋中市", "长治市", "运城市"]),
    ("四川省", &["成都市", "绵阳市", "德阳市", "宜宾市", "自贡市"]),
];

const DEPLOYMENT_TYPES: &[&str] = &[
    "DeepSeek-V2大模型",
    "DeepSeek-Coder编程助手",
    "DeepSeek-Math数学模型",
    "DeepSeek-VL视觉大模型",
    "DeepSeek-MoE混合专家模型",
];

const SCENARIOS: &[&str] = &[
    "政务服务",
    "智慧医疗",
    "金融风控",
    "教育科研",
    "智能客服",
    "内容创作",
    "代码开发",
    "智慧交通",
];

const INSTITUTIONS: &[&str] = &[
    "科技园",
    "研究院",
    "大学",
    "医院",
    "政务中心",
    "数据中心",
    "企业总部",
    "产业园区",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{news_row, province_row};

    #[tokio::test]
    async fn test_development_data_covers_all_provinces() {
        let store = FixtureStore::development();
        let snapshot = store.fetch_all_provinces().await.unwrap();

        assert_eq!(snapshot.provinces.len(), 34);
        assert_eq!(snapshot.provinces[0].name, "北京市");
        assert_eq!(snapshot.cities.len(), 25);
        assert!(snapshot
            .cities
            .iter()
            .all(|c| c.details.len() as i64 == c.count));
        assert_eq!(snapshot.news.len(), 15);
    }

    #[tokio::test]
    async fn test_overview_ranks_news_per_province() {
        let news = (1..=8)
            .map(|day| news_row(&format!("n{}", day), "44", "广东省", day))
            .collect();
        let store = FixtureStore::from_rows(
            vec![province_row("44", "广东省", 90.0, 37)],
            Vec::new(),
            news,
        );

        let snapshot = store.fetch_all_provinces().await.unwrap();
        assert_eq!(snapshot.news.len(), ALL_PROVINCES_NEWS_WINDOW);
        assert_eq!(snapshot.news[0].id, "n8");
        assert_eq!(snapshot.news[0].rank, Some(1));
        assert_eq!(snapshot.news[4].rank, Some(5));
    }

    #[tokio::test]
    async fn test_unknown_province_is_none() {
        let store = FixtureStore::development();
        assert!(store.fetch_province("99").await.unwrap().is_none());
        assert!(store.fetch_province("44").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_latest_news_limit() {
        let store = FixtureStore::development();
        assert_eq!(store.fetch_latest_news(4).await.unwrap().len(), 4);
        assert!(store.fetch_latest_news(0).await.unwrap().is_empty());
        assert_eq!(store.fetch_latest_news(500).await.unwrap().len(), 15);
    }
}
