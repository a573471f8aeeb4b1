//! Column decoders tolerant of how the store happens to type a column.
//!
//! Identifiers may live in text or integer columns, scores in float, integer or
//! NUMERIC columns. Each decoder tries the representations in turn and reports
//! the error of the last attempt.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::Row;

pub fn text_or_integer(row: &PgRow, column: &str) -> Result<String, sqlx::Error> {
    if let Ok(value) = row.try_get::<String, _>(column) {
        return Ok(value);
    }
    if let Ok(value) = row.try_get::<i64, _>(column) {
        return Ok(value.to_string());
    }
    row.try_get::<i32, _>(column).map(|value| value.to_string())
}

pub fn optional_text_or_integer(row: &PgRow, column: &str) -> Result<Option<String>, sqlx::Error> {
    if let Ok(value) = row.try_get::<Option<String>, _>(column) {
        return Ok(value);
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(column) {
        return Ok(value.map(|v| v.to_string()));
    }
    row.try_get::<Option<i32>, _>(column)
        .map(|value| value.map(|v| v.to_string()))
}

pub fn number(row: &PgRow, column: &str) -> Result<f64, sqlx::Error> {
    if let Ok(value) = row.try_get::<f64, _>(column) {
        return Ok(value);
    }
    if let Ok(value) = row.try_get::<f32, _>(column) {
        return Ok(f64::from(value));
    }
    if let Ok(value) = row.try_get::<i32, _>(column) {
        return Ok(f64::from(value));
    }
    if let Ok(value) = row.try_get::<i64, _>(column) {
        return Ok(value as f64);
    }
    let value = row.try_get::<Decimal, _>(column)?;
    value.to_f64().ok_or_else(|| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("NUMERIC value {} does not fit in f64", value).into(),
    })
}

pub fn count(row: &PgRow, column: &str) -> Result<i64, sqlx::Error> {
    if let Ok(value) = row.try_get::<i64, _>(column) {
        return Ok(value);
    }
    if let Ok(value) = row.try_get::<i32, _>(column) {
        return Ok(i64::from(value));
    }
    row.try_get::<i16, _>(column).map(i64::from)
}

/// `text[]` or a JSON array of strings; NULL becomes an empty list
pub fn string_list(row: &PgRow, column: &str) -> Result<Vec<String>, sqlx::Error> {
    if let Ok(value) = row.try_get::<Option<Vec<String>>, _>(column) {
        return Ok(value.unwrap_or_default());
    }
    row.try_get::<Option<sqlx::types::Json<Vec<String>>>, _>(column)
        .map(|value| value.map(|json| json.0).unwrap_or_default())
}
