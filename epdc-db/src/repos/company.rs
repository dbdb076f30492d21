//! Company repository
//!
//! A company owns emails, phones and faxes. Writes store the company row
//! and its children in one transaction.

use chrono::NaiveDateTime;
use epdc_core::nulls;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::owner::{delete_children, store_children};
use super::{DbError, Email, Owner, Phone, Practice, SelectItem};

/// Company record with its child rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub scope_id: i64,
    pub note: String,
    pub emails: Vec<Email>,
    pub phones: Vec<Phone>,
    pub faxes: Vec<Phone>,
    /// Read-only; practices are edited through their own repository.
    pub practices: Vec<Practice>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Company {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            name: nulls::text(row.try_get("name")?),
            address: nulls::text(row.try_get("address")?),
            scope_id: nulls::id(row.try_get("scope_id")?),
            note: nulls::text(row.try_get("note")?),
            emails: Email::from_joined(row.try_get("emails")?),
            phones: Phone::from_joined(row.try_get("phones")?, false),
            faxes: Phone::from_joined(row.try_get("faxes")?, true),
            practices: Practice::from_joined_dates(row.try_get("practices")?),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Company row for the list view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyListItem {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub scope_name: String,
    pub phones: Vec<String>,
    pub faxes: Vec<String>,
    /// Practice dates, `dd.mm.yyyy`
    pub practices: Vec<String>,
}

impl CompanyListItem {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            name: nulls::text(row.try_get("name")?),
            address: nulls::text(row.try_get("address")?),
            scope_name: nulls::text(row.try_get("scope_name")?),
            phones: nulls::split_joined(row.try_get("phones")?),
            faxes: nulls::split_joined(row.try_get("faxes")?),
            practices: nulls::split_joined_dates(row.try_get("practices")?),
        })
    }
}

pub struct CompanyRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CompanyRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a company with its emails, phones, faxes and practice dates.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn get(&self, id: i64) -> Result<Company, DbError> {
        if id == 0 {
            return Ok(Company::default());
        }
        let row = sqlx::query(
            r#"
            SELECT
                c.id,
                c.name,
                c.address,
                c.scope_id,
                c.note,
                c.created_at,
                c.updated_at,
                array_to_string(array_agg(DISTINCT e.email), ',') AS emails,
                array_to_string(array_agg(DISTINCT p.phone), ',') AS phones,
                array_to_string(array_agg(DISTINCT f.phone), ',') AS faxes,
                array_to_string(array_agg(DISTINCT pr.date_of_practice), ',') AS practices
            FROM companies AS c
            LEFT JOIN emails AS e ON e.company_id = c.id
            LEFT JOIN phones AS p ON p.company_id = c.id AND p.fax = false
            LEFT JOIN phones AS f ON f.company_id = c.id AND f.fax = true
            LEFT JOIN practices AS pr ON pr.company_id = c.id
            WHERE c.id = $1
            GROUP BY c.id
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("company", id))?;

        Ok(Company::from_row(&row)?)
    }

    /// All companies by name, with scope name, phones, faxes and practice dates.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn list(&self) -> Result<Vec<CompanyListItem>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                c.id,
                c.name,
                c.address,
                s.name AS scope_name,
                array_to_string(array_agg(DISTINCT p.phone), ',') AS phones,
                array_to_string(array_agg(DISTINCT f.phone), ',') AS faxes,
                array_to_string(array_agg(DISTINCT pr.date_of_practice), ',') AS practices
            FROM companies AS c
            LEFT JOIN scopes AS s ON s.id = c.scope_id
            LEFT JOIN phones AS p ON p.company_id = c.id AND p.fax = false
            LEFT JOIN phones AS f ON f.company_id = c.id AND f.fax = true
            LEFT JOIN practices AS pr ON pr.company_id = c.id
            GROUP BY c.id, s.name
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(CompanyListItem::from_row)
            .collect::<Result<_, _>>()?)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn select(&self) -> Result<Vec<SelectItem>, DbError> {
        let rows = sqlx::query("SELECT id, name FROM companies ORDER BY name ASC")
            .fetch_all(self.pool)
            .await?;

        Ok(SelectItem::from_rows(&rows)?)
    }

    /// Insert a company and its emails, phones and faxes.
    #[instrument(level = "debug", skip(self, company), fields(name = %company.name), err(level = "warn"))]
    pub async fn create(&self, company: &Company) -> Result<i64, DbError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO companies (name, address, scope_id, note, created_at, updated_at)
            VALUES ($1, $2, $3, $4, now(), now())
            RETURNING id
            "#,
        )
        .bind(nulls::text_or_null(&company.name))
        .bind(nulls::text_or_null(&company.address))
        .bind(nulls::id_or_null(company.scope_id))
        .bind(nulls::text_or_null(&company.note))
        .fetch_one(&mut *tx)
        .await?;

        store_children(
            &mut *tx,
            Owner::Company(id),
            &company.emails,
            &company.phones,
            &company.faxes,
        )
        .await?;

        tx.commit().await?;
        tracing::info!(id, name = %company.name, "company created");
        Ok(id)
    }

    /// Save a company, replacing emails and reconciling phones and faxes.
    #[instrument(level = "debug", skip(self, company), fields(id = company.id), err(level = "warn"))]
    pub async fn update(&self, company: &Company) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE companies
            SET name = $2, address = $3, scope_id = $4, note = $5, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(company.id)
        .bind(nulls::text_or_null(&company.name))
        .bind(nulls::text_or_null(&company.address))
        .bind(nulls::id_or_null(company.scope_id))
        .bind(nulls::text_or_null(&company.note))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("company", company.id));
        }

        store_children(
            &mut *tx,
            Owner::Company(company.id),
            &company.emails,
            &company.phones,
            &company.faxes,
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Delete a company with its phones and emails. Id 0 is a no-op.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        if id == 0 {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        delete_children(&mut *tx, Owner::Company(id)).await?;
        sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(id, "company deleted");
        Ok(())
    }
}
