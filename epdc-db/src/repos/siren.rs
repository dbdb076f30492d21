//! Siren repository

use chrono::NaiveDateTime;
use epdc_core::nulls;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::DbError;

/// Warning siren installed at an address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Siren {
    pub id: i64,
    pub num_id: i64,
    pub num_pass: String,
    pub type_id: i64,
    pub address: String,
    pub radio: String,
    pub desk: String,
    pub contact_id: i64,
    pub company_id: i64,
    pub latitude: String,
    pub longitude: String,
    pub stage: i64,
    pub own: String,
    pub note: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Siren {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            num_id: nulls::id(row.try_get("num_id")?),
            num_pass: nulls::text(row.try_get("num_pass")?),
            type_id: nulls::id(row.try_get("type_id")?),
            address: nulls::text(row.try_get("address")?),
            radio: nulls::text(row.try_get("radio")?),
            desk: nulls::text(row.try_get("desk")?),
            contact_id: nulls::id(row.try_get("contact_id")?),
            company_id: nulls::id(row.try_get("company_id")?),
            latitude: nulls::text(row.try_get("latitude")?),
            longitude: nulls::text(row.try_get("longitude")?),
            stage: nulls::id(row.try_get("stage")?),
            own: nulls::text(row.try_get("own")?),
            note: nulls::text(row.try_get("note")?),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Siren with its type, contact and company names joined in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SirenListItem {
    #[serde(flatten)]
    pub siren: Siren,
    pub type_name: String,
    pub contact_name: String,
    pub company_name: String,
}

impl SirenListItem {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            siren: Siren::from_row(row)?,
            type_name: nulls::text(row.try_get("type_name")?),
            contact_name: nulls::text(row.try_get("contact_name")?),
            company_name: nulls::text(row.try_get("company_name")?),
        })
    }
}

const SIREN_COLUMNS: &str = r#"
    s.id, s.num_id, s.num_pass, s.type_id, s.address, s.radio, s.desk,
    s.contact_id, s.company_id, s.latitude, s.longitude, s.stage, s.own,
    s.note, s.created_at, s.updated_at
"#;

pub struct SirenRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SirenRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn get(&self, id: i64) -> Result<Siren, DbError> {
        if id == 0 {
            return Ok(Siren::default());
        }
        let row = sqlx::query(&format!(
            "SELECT {SIREN_COLUMNS} FROM sirens AS s WHERE s.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("siren", id))?;

        Ok(Siren::from_row(&row)?)
    }

    /// All sirens by number, with type, contact and company names.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn list(&self) -> Result<Vec<SirenListItem>, DbError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT
                {SIREN_COLUMNS},
                t.name AS type_name,
                p.name AS contact_name,
                c.name AS company_name
            FROM sirens AS s
            LEFT JOIN siren_types AS t ON t.id = s.type_id
            LEFT JOIN contacts AS p ON p.id = s.contact_id
            LEFT JOIN companies AS c ON c.id = s.company_id
            ORDER BY s.num_id ASC NULLS LAST
            "#
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(SirenListItem::from_row)
            .collect::<Result<_, _>>()?)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn create(&self, siren: &Siren) -> Result<i64, DbError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sirens (
                num_id, num_pass, type_id, address, radio, desk, contact_id,
                company_id, latitude, longitude, stage, own, note,
                created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, now(), now()
            )
            RETURNING id
            "#,
        )
        .bind(nulls::id_or_null(siren.num_id))
        .bind(nulls::text_or_null(&siren.num_pass))
        .bind(nulls::id_or_null(siren.type_id))
        .bind(nulls::text_or_null(&siren.address))
        .bind(nulls::text_or_null(&siren.radio))
        .bind(nulls::text_or_null(&siren.desk))
        .bind(nulls::id_or_null(siren.contact_id))
        .bind(nulls::id_or_null(siren.company_id))
        .bind(nulls::text_or_null(&siren.latitude))
        .bind(nulls::text_or_null(&siren.longitude))
        .bind(nulls::id_or_null(siren.stage))
        .bind(nulls::text_or_null(&siren.own))
        .bind(nulls::text_or_null(&siren.note))
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn update(&self, siren: &Siren) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE sirens SET
                num_id = $2, num_pass = $3, type_id = $4, address = $5,
                radio = $6, desk = $7, contact_id = $8, company_id = $9,
                latitude = $10, longitude = $11, stage = $12, own = $13,
                note = $14, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(siren.id)
        .bind(nulls::id_or_null(siren.num_id))
        .bind(nulls::text_or_null(&siren.num_pass))
        .bind(nulls::id_or_null(siren.type_id))
        .bind(nulls::text_or_null(&siren.address))
        .bind(nulls::text_or_null(&siren.radio))
        .bind(nulls::text_or_null(&siren.desk))
        .bind(nulls::id_or_null(siren.contact_id))
        .bind(nulls::id_or_null(siren.company_id))
        .bind(nulls::text_or_null(&siren.latitude))
        .bind(nulls::text_or_null(&siren.longitude))
        .bind(nulls::id_or_null(siren.stage))
        .bind(nulls::text_or_null(&siren.own))
        .bind(nulls::text_or_null(&siren.note))
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("siren", siren.id));
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        if id == 0 {
            return Ok(());
        }
        sqlx::query("DELETE FROM sirens WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_item_flattens_siren_fields() {
        let item = SirenListItem {
            siren: Siren {
                id: 4,
                num_id: 1021,
                ..Siren::default()
            },
            type_name: "С-40".into(),
            ..SirenListItem::default()
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["num_id"], 1021);
        assert_eq!(json["type_name"], "С-40");
        assert!(json.get("siren").is_none());
    }
}
