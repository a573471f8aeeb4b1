use sqlx::postgres::PgRow;
use sqlx::FromRow;

use super::decode;

/// Row of the `cities` table
#[derive(Debug, Clone, PartialEq)]
pub struct CityRow {
    pub id: String,
    pub province_id: String,
    pub name: String,
    pub count: i64,
    /// Free-text deployment lines
    pub details: Vec<String>,
}

impl<'r> FromRow<'r, PgRow> for CityRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode::text_or_integer(row, "id")?,
            province_id: decode::text_or_integer(row, "province_id")?,
            name: sqlx::Row::try_get(row, "name")?,
            count: decode::count(row, "count")?,
            details: decode::string_list(row, "details")?,
        })
    }
}
