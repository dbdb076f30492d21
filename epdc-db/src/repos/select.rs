//! Dropdown projection shared by every entity

use epdc_core::nulls;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;

/// `{id, name}` pair for select lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectItem {
    pub id: i64,
    pub name: String,
}

impl SelectItem {
    pub(crate) fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            name: nulls::text(row.try_get("name")?),
        })
    }

    pub(crate) fn from_rows(rows: &[PgRow]) -> Result<Vec<Self>, sqlx::Error> {
        rows.iter().map(Self::from_row).collect()
    }
}
