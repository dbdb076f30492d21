//! Siren type repository

use chrono::NaiveDateTime;
use epdc_core::nulls;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::{DbError, SelectItem};

/// Siren type: a model name and its audible radius in metres
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SirenType {
    pub id: i64,
    pub name: String,
    pub radius: i64,
    pub note: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl SirenType {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            name: nulls::text(row.try_get("name")?),
            radius: nulls::id(row.try_get("radius")?),
            note: nulls::text(row.try_get("note")?),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

const SELECT_SIREN_TYPE: &str =
    "SELECT id, name, radius, note, created_at, updated_at FROM siren_types";

pub struct SirenTypeRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SirenTypeRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn get(&self, id: i64) -> Result<SirenType, DbError> {
        if id == 0 {
            return Ok(SirenType::default());
        }
        let row = sqlx::query(&format!("{SELECT_SIREN_TYPE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("siren type", id))?;

        Ok(SirenType::from_row(&row)?)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn list(&self) -> Result<Vec<SirenType>, DbError> {
        let rows = sqlx::query(&format!("{SELECT_SIREN_TYPE} ORDER BY name ASC"))
            .fetch_all(self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(SirenType::from_row)
            .collect::<Result<_, _>>()?)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn select(&self) -> Result<Vec<SelectItem>, DbError> {
        let rows = sqlx::query("SELECT id, name FROM siren_types ORDER BY name ASC")
            .fetch_all(self.pool)
            .await?;

        Ok(SelectItem::from_rows(&rows)?)
    }

    /// Insert a siren type, radius included.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn create(&self, siren_type: &SirenType) -> Result<i64, DbError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO siren_types (name, radius, note, created_at, updated_at)
            VALUES ($1, $2, $3, now(), now())
            RETURNING id
            "#,
        )
        .bind(nulls::text_or_null(&siren_type.name))
        .bind(nulls::id_or_null(siren_type.radius))
        .bind(nulls::text_or_null(&siren_type.note))
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn update(&self, siren_type: &SirenType) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE siren_types
            SET name = $2, radius = $3, note = $4, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(siren_type.id)
        .bind(nulls::text_or_null(&siren_type.name))
        .bind(nulls::id_or_null(siren_type.radius))
        .bind(nulls::text_or_null(&siren_type.note))
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("siren type", siren_type.id));
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        if id == 0 {
            return Ok(());
        }
        sqlx::query("DELETE FROM siren_types WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
