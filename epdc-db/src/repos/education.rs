//! Education (training period) repository

use chrono::{NaiveDate, NaiveDateTime};
use epdc_core::{month_string_for, nulls};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::DbError;

/// Training period. Dates are `dd.mm.yyyy`; the `_str` fields carry the
/// spelled-out form and are only filled by [`EducationRepo::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub id: i64,
    pub start_date: String,
    pub end_date: String,
    pub start_str: String,
    pub end_str: String,
    pub note: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Education {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            start_date: nulls::ru_date(row.try_get("start_date")?),
            end_date: nulls::ru_date(row.try_get("end_date")?),
            note: nulls::text(row.try_get("note")?),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            ..Self::default()
        })
    }

    fn from_list_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let start: Option<NaiveDate> = row.try_get("start_date")?;
        let end: Option<NaiveDate> = row.try_get("end_date")?;
        Ok(Self {
            start_str: start.map(month_string_for).unwrap_or_default(),
            end_str: end.map(month_string_for).unwrap_or_default(),
            ..Self::from_row(row)?
        })
    }
}

const SELECT_EDUCATION: &str =
    "SELECT id, start_date, end_date, note, created_at, updated_at FROM educations";

pub struct EducationRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> EducationRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn get(&self, id: i64) -> Result<Education, DbError> {
        if id == 0 {
            return Ok(Education::default());
        }
        let row = sqlx::query(&format!("{SELECT_EDUCATION} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("education", id))?;

        Ok(Education::from_row(&row)?)
    }

    /// All periods by start date, with the spelled-out dates filled in.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn list(&self) -> Result<Vec<Education>, DbError> {
        let rows = sqlx::query(&format!("{SELECT_EDUCATION} ORDER BY start_date ASC"))
            .fetch_all(self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(Education::from_list_row)
            .collect::<Result<_, _>>()?)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn create(&self, education: &Education) -> Result<i64, DbError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO educations (start_date, end_date, note, created_at, updated_at)
            VALUES ($1, $2, $3, now(), now())
            RETURNING id
            "#,
        )
        .bind(nulls::ru_date_or_null(&education.start_date))
        .bind(nulls::ru_date_or_null(&education.end_date))
        .bind(nulls::text_or_null(&education.note))
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn update(&self, education: &Education) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE educations
            SET start_date = $2, end_date = $3, note = $4, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(education.id)
        .bind(nulls::ru_date_or_null(&education.start_date))
        .bind(nulls::ru_date_or_null(&education.end_date))
        .bind(nulls::text_or_null(&education.note))
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("education", education.id));
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        if id == 0 {
            return Ok(());
        }
        sqlx::query("DELETE FROM educations WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
