//! Shapes flat store rows into the nested province / city / news structure.
//!
//! Everything here is a pure transformation of rows that already satisfy the
//! store's query contract.

use std::collections::HashMap;

use crate::features::heatmap::dtos::{CityDto, NewsItemDto, ProvinceDetailsDto, ProvinceDto};
use crate::features::heatmap::models::{
    CityRow, NewsRow, ProvinceDetailRows, ProvinceRow, ProvinceSnapshot,
};
use crate::shared::constants::{ALL_PROVINCES_NEWS_WINDOW, PROVINCE_DETAIL_NEWS_WINDOW};

/// Build the "all provinces" view: provinces by count, each with its cities and
/// at most [`ALL_PROVINCES_NEWS_WINDOW`] most recent news items
pub fn assemble_provinces(snapshot: ProvinceSnapshot) -> Vec<ProvinceDto> {
    let ProvinceSnapshot {
        mut provinces,
        cities,
        news,
    } = snapshot;

    let mut cities_by_province: HashMap<String, Vec<CityRow>> = HashMap::new();
    for city in cities {
        cities_by_province
            .entry(city.province_id.clone())
            .or_default()
            .push(city);
    }

    let mut news_by_province: HashMap<String, Vec<NewsRow>> = HashMap::new();
    for item in news {
        news_by_province
            .entry(item.province_id.clone())
            .or_default()
            .push(item);
    }

    sort_by_count_desc(&mut provinces, |p| p.count);

    provinces
        .into_iter()
        .map(|province| {
            let cities = cities_by_province.remove(&province.id).unwrap_or_default();
            let news = news_by_province.remove(&province.id).unwrap_or_default();
            build_province(province, cities, news, ALL_PROVINCES_NEWS_WINDOW)
        })
        .collect()
}

/// Build the single-province view with at most [`PROVINCE_DETAIL_NEWS_WINDOW`] news
pub fn assemble_province(rows: ProvinceDetailRows) -> ProvinceDto {
    build_province(
        rows.province,
        rows.cities,
        rows.news,
        PROVINCE_DETAIL_NEWS_WINDOW,
    )
}

/// Shape news rows that are already globally ordered by the query
pub fn assemble_news(mut rows: Vec<NewsRow>) -> Vec<NewsItemDto> {
    sort_by_recency(&mut rows);
    rows.into_iter().map(NewsItemDto::from).collect()
}

/// Province fields only, no detail block
pub fn province_summary(row: ProvinceRow) -> ProvinceDto {
    ProvinceDto {
        id: row.id,
        name: row.name,
        value: row.value,
        count: row.count,
        details: None,
    }
}

fn build_province(
    province: ProvinceRow,
    mut cities: Vec<CityRow>,
    news: Vec<NewsRow>,
    news_window: usize,
) -> ProvinceDto {
    sort_by_count_desc(&mut cities, |c| c.count);
    let cities = cities.into_iter().map(city_dto).collect();

    let news = news_window_of(news, news_window);
    let news = if news.is_empty() { None } else { Some(news) };

    ProvinceDto {
        details: Some(ProvinceDetailsDto { cities, news }),
        ..province_summary(province)
    }
}

fn city_dto(row: CityRow) -> CityDto {
    CityDto {
        name: row.name,
        count: row.count,
        details: row.details,
        news: None,
    }
}

/// Keep rows ranked inside the window, newest first, capped at the window size
fn news_window_of(news: Vec<NewsRow>, window: usize) -> Vec<NewsItemDto> {
    let mut kept: Vec<NewsRow> = news
        .into_iter()
        .filter(|row| row.rank.is_none_or(|rank| rank >= 1 && rank as usize <= window))
        .collect();
    sort_by_recency(&mut kept);
    kept.truncate(window);
    kept.into_iter().map(NewsItemDto::from).collect()
}

/// Newest first; undated text sorts last, keeping its relative order
fn sort_by_recency(rows: &mut [NewsRow]) {
    rows.sort_by(|a, b| b.publish_date.sort_key().cmp(&a.publish_date.sort_key()));
}

fn sort_by_count_desc<T>(items: &mut [T], count: impl Fn(&T) -> i64) {
    items.sort_by(|a, b| count(b).cmp(&count(a)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::heatmap::models::PublishDate;
    use crate::shared::test_helpers::{city_row, news_row, province_row};

    #[test]
    fn test_provinces_ordered_by_count_desc() {
        let snapshot = ProvinceSnapshot {
            provinces: vec![
                province_row("11", "北京市", 95.0, 10),
                province_row("44", "广东省", 90.0, 37),
                province_row("31", "上海市", 93.0, 20),
            ],
            cities: Vec::new(),
            news: Vec::new(),
        };

        let ids: Vec<String> = assemble_provinces(snapshot)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["44", "31", "11"]);
    }

    #[test]
    fn test_cities_grouped_and_ordered_per_province() {
        let snapshot = ProvinceSnapshot {
            provinces: vec![
                province_row("44", "广东省", 90.0, 37),
                province_row("51", "四川省", 80.0, 31),
            ],
            cities: vec![
                city_row("1", "44", "珠海市", 2),
                city_row("2", "51", "成都市", 9),
                city_row("3", "44", "深圳市", 8),
            ],
            news: Vec::new(),
        };

        let provinces = assemble_provinces(snapshot);
        let guangdong = provinces[0].details.as_ref().unwrap();
        let names: Vec<&str> = guangdong.cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["深圳市", "珠海市"]);
        assert!(guangdong.news.is_none());

        let sichuan = provinces[1].details.as_ref().unwrap();
        assert_eq!(sichuan.cities.len(), 1);
        assert_eq!(sichuan.cities[0].name, "成都市");
    }

    #[test]
    fn test_all_provinces_view_keeps_five_newest() {
        let news: Vec<NewsRow> = (1..=7)
            .map(|day| {
                let mut row = news_row(&format!("n{}", day), "44", "广东省", day);
                row.rank = Some(8 - i64::from(day));
                row
            })
            .collect();
        let snapshot = ProvinceSnapshot {
            provinces: vec![province_row("44", "广东省", 90.0, 37)],
            cities: Vec::new(),
            news,
        };

        let provinces = assemble_provinces(snapshot);
        let news = provinces[0]
            .details
            .as_ref()
            .unwrap()
            .news
            .as_ref()
            .unwrap();
        let ids: Vec<&str> = news.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n7", "n6", "n5", "n4", "n3"]);
    }

    #[test]
    fn test_single_province_view_caps_at_twenty() {
        let news: Vec<NewsRow> = (1..=25)
            .map(|day| news_row(&format!("n{}", day), "44", "广东省", day))
            .collect();
        let rows = ProvinceDetailRows {
            province: province_row("44", "广东省", 90.0, 37),
            cities: Vec::new(),
            news,
        };

        let province = assemble_province(rows);
        let news = province.details.unwrap().news.unwrap();
        assert_eq!(news.len(), PROVINCE_DETAIL_NEWS_WINDOW);
        assert_eq!(news[0].id, "n25");
        assert!(news
            .windows(2)
            .all(|pair| pair[0].publish_date >= pair[1].publish_date));
    }

    #[test]
    fn test_news_item_shape() {
        let mut row = news_row("n1", "44", "广东省", 3);
        row.city_name = Some("深圳市".to_string());
        row.district = Some("南山区".to_string());
        row.deployment_info = Some("部署模型: DeepSeek-V2".to_string());

        let item = NewsItemDto::from(row);
        assert_eq!(item.publish_date, "2024-01-03T00:00:00.000Z");
        assert_eq!(item.location.province, "广东省");
        assert_eq!(item.location.city.as_deref(), Some("深圳市"));
        assert_eq!(item.location.district.as_deref(), Some("南山区"));

        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("publishDate").is_some());
        assert!(json.get("deploymentInfo").is_some());
    }

    #[test]
    fn test_text_dates_survive_mapping() {
        let mut older = news_row("old", "44", "广东省", 1);
        older.publish_date = PublishDate::Text("2024-01-01".to_string());
        let newer = news_row("new", "44", "广东省", 2);

        let items = assemble_news(vec![older, newer]);
        assert_eq!(items[0].id, "new");
        assert_eq!(items[1].publish_date, "2024-01-01");
    }
}
