//! Practice (exercise/drill) repository

use chrono::{NaiveDate, NaiveDateTime};
use epdc_core::{month_string, month_string_for, nulls};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::DbError;

/// Practice record from database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Practice {
    pub id: i64,
    pub company_id: i64,
    pub kind_id: i64,
    pub topic: String,
    /// `dd.mm.yyyy`
    pub date_of_practice: String,
    /// e.g. `"12 мая 2016 года"`
    pub date_str: String,
    pub note: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Practice {
    /// Build practices from an aggregate of ISO dates. Only the date fields
    /// are set.
    pub fn from_joined_dates(value: Option<&str>) -> Vec<Self> {
        nulls::split_joined_dates(value)
            .into_iter()
            .filter(|d| !d.is_empty())
            .map(|date| Self {
                date_str: month_string(&date),
                date_of_practice: date,
                ..Self::default()
            })
            .collect()
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let date: Option<NaiveDate> = row.try_get("date_of_practice")?;
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            company_id: nulls::id(row.try_get("company_id")?),
            kind_id: nulls::id(row.try_get("kind_id")?),
            topic: nulls::text(row.try_get("topic")?),
            date_of_practice: nulls::ru_date(date),
            date_str: date.map(month_string_for).unwrap_or_default(),
            note: nulls::text(row.try_get("note")?),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Practice row for the list view, with company and kind names joined in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeListItem {
    pub id: i64,
    pub company_name: String,
    pub kind_name: String,
    pub topic: String,
    pub date_of_practice: String,
    pub date_str: String,
}

impl PracticeListItem {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let date: Option<NaiveDate> = row.try_get("date_of_practice")?;
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            company_name: nulls::text(row.try_get("company_name")?),
            kind_name: nulls::text(row.try_get("kind_name")?),
            topic: nulls::text(row.try_get("topic")?),
            date_of_practice: nulls::ru_date(date),
            date_str: date.map(month_string_for).unwrap_or_default(),
        })
    }
}

const SELECT_PRACTICE: &str = r#"
    SELECT id, company_id, kind_id, topic, date_of_practice, note, created_at, updated_at
    FROM practices
"#;

pub struct PracticeRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PracticeRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn get(&self, id: i64) -> Result<Practice, DbError> {
        if id == 0 {
            return Ok(Practice::default());
        }
        let row = sqlx::query(&format!("{SELECT_PRACTICE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("practice", id))?;

        Ok(Practice::from_row(&row)?)
    }

    /// All practices by date, with company and kind names.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn list(&self) -> Result<Vec<PracticeListItem>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                p.id,
                c.name AS company_name,
                k.name AS kind_name,
                p.topic,
                p.date_of_practice
            FROM practices AS p
            LEFT JOIN companies AS c ON c.id = p.company_id
            LEFT JOIN kinds AS k ON k.id = p.kind_id
            ORDER BY p.date_of_practice ASC NULLS LAST
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(PracticeListItem::from_row)
            .collect::<Result<_, _>>()?)
    }

    /// Practices of one company, by date. Id 0 gives an empty list.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn list_for_company(&self, company_id: i64) -> Result<Vec<Practice>, DbError> {
        if company_id == 0 {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(&format!(
            "{SELECT_PRACTICE} WHERE company_id = $1 ORDER BY date_of_practice ASC"
        ))
        .bind(company_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(Practice::from_row).collect::<Result<_, _>>()?)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn create(&self, practice: &Practice) -> Result<i64, DbError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO practices
                (company_id, kind_id, topic, date_of_practice, note, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, now(), now())
            RETURNING id
            "#,
        )
        .bind(nulls::id_or_null(practice.company_id))
        .bind(nulls::id_or_null(practice.kind_id))
        .bind(nulls::text_or_null(&practice.topic))
        .bind(nulls::ru_date_or_null(&practice.date_of_practice))
        .bind(nulls::text_or_null(&practice.note))
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn update(&self, practice: &Practice) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE practices
            SET company_id = $2, kind_id = $3, topic = $4, date_of_practice = $5,
                note = $6, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(practice.id)
        .bind(nulls::id_or_null(practice.company_id))
        .bind(nulls::id_or_null(practice.kind_id))
        .bind(nulls::text_or_null(&practice.topic))
        .bind(nulls::ru_date_or_null(&practice.date_of_practice))
        .bind(nulls::text_or_null(&practice.note))
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("practice", practice.id));
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        if id == 0 {
            return Ok(());
        }
        sqlx::query("DELETE FROM practices WHERE id = $1")
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
    fn practices_from_date_aggregate() {
        let practices = Practice::from_joined_dates(Some("2016-05-12,2017-03-05"));
        assert_eq!(practices.len(), 2);
        assert_eq!(practices[0].date_of_practice, "12.05.2016");
        assert_eq!(practices[0].date_str, "12 мая 2016 года");
        assert_eq!(practices[1].date_str, "05 марта 2017 года");
    }

    #[test]
    fn unparseable_dates_are_dropped() {
        assert!(Practice::from_joined_dates(Some("junk")).is_empty());
        assert!(Practice::from_joined_dates(None).is_empty());
    }
}
