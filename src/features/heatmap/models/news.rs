use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::decode;

/// Publish date as the store handed it over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishDate {
    Timestamp(DateTime<Utc>),
    /// Already formatted; passed through untouched
    Text(String),
}

impl PublishDate {
    /// ISO-8601 with millisecond precision and a `Z` suffix for structured dates,
    /// the stored string otherwise
    pub fn to_iso_string(&self) -> String {
        match self {
            PublishDate::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            PublishDate::Text(text) => text.clone(),
        }
    }

    /// Instant used for recency ordering; `None` for text that is not a date
    pub fn sort_key(&self) -> Option<DateTime<Utc>> {
        match self {
            PublishDate::Timestamp(ts) => Some(*ts),
            PublishDate::Text(text) => parse_text_date(text.trim()),
        }
    }
}

fn parse_text_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn decode_publish_date(row: &PgRow, column: &str) -> Result<PublishDate, sqlx::Error> {
    if let Ok(ts) = row.try_get::<DateTime<Utc>, _>(column) {
        return Ok(PublishDate::Timestamp(ts));
    }
    if let Ok(naive) = row.try_get::<NaiveDateTime, _>(column) {
        return Ok(PublishDate::Timestamp(naive.and_utc()));
    }
    if let Ok(date) = row.try_get::<NaiveDate, _>(column) {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(PublishDate::Timestamp(naive.and_utc()));
        }
    }
    row.try_get::<String, _>(column).map(PublishDate::Text)
}

/// A `news` row joined with its province and (optional) city names
#[derive(Debug, Clone, PartialEq)]
pub struct NewsRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub url: String,
    pub publish_date: PublishDate,
    pub relevance: f64,
    pub deployment_info: Option<String>,
    pub province_id: String,
    pub city_id: Option<String>,
    pub district: Option<String>,
    pub province_name: String,
    pub city_name: Option<String>,
    /// Recency rank within the province (1 = most recent), when the query ranks
    pub rank: Option<i64>,
}

impl<'r> FromRow<'r, PgRow> for NewsRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode::text_or_integer(row, "id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            url: row.try_get("url")?,
            publish_date: decode_publish_date(row, "publish_date")?,
            relevance: decode::number(row, "relevance")?,
            deployment_info: row.try_get("deployment_info")?,
            province_id: decode::text_or_integer(row, "province_id")?,
            city_id: decode::optional_text_or_integer(row, "city_id")?,
            district: row.try_get("district")?,
            province_name: row.try_get("province_name")?,
            city_name: row.try_get("city_name")?,
            rank: row.try_get::<Option<i64>, _>("rn").ok().flatten(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_renders_iso_with_millis() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 5, 8, 30, 0).unwrap();
        assert_eq!(
            PublishDate::Timestamp(ts).to_iso_string(),
            "2024-01-05T08:30:00.000Z"
        );
    }

    #[test]
    fn test_text_passes_through_unchanged() {
        let date = PublishDate::Text("2025-02-03".to_string());
        assert_eq!(date.to_iso_string(), "2025-02-03");
    }

    #[test]
    fn test_structured_and_text_forms_are_format_stable() {
        let ts = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()
            + chrono::Duration::milliseconds(250);
        let structured = PublishDate::Timestamp(ts);
        let as_text = PublishDate::Text(structured.to_iso_string());

        assert_eq!(structured.to_iso_string(), as_text.to_iso_string());
        assert_eq!(structured.sort_key(), as_text.sort_key());
    }

    #[test]
    fn test_sort_key_for_text_dates() {
        let midnight = Utc.with_ymd_and_hms(2025, 2, 3, 0, 0, 0).unwrap();
        assert_eq!(
            PublishDate::Text("2025-02-03".to_string()).sort_key(),
            Some(midnight)
        );
        assert_eq!(
            PublishDate::Text("2025-02-03 00:00:00".to_string()).sort_key(),
            Some(midnight)
        );
        assert_eq!(PublishDate::Text("last week".to_string()).sort_key(), None);
    }
}
