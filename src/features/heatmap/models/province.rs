use sqlx::postgres::PgRow;
use sqlx::FromRow;

use super::decode;

/// Row of the `provinces` table
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceRow {
    pub id: String,
    pub name: String,
    /// Relevance score, computed upstream independently of `count`
    pub value: f64,
    pub count: i64,
}

impl<'r> FromRow<'r, PgRow> for ProvinceRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode::text_or_integer(row, "id")?,
            name: sqlx::Row::try_get(row, "name")?,
            value: decode::number(row, "value")?,
            count: decode::count(row, "count")?,
        })
    }
}
