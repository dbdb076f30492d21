//! Contact (person) repository

use chrono::NaiveDateTime;
use epdc_core::nulls;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::owner::{delete_children, store_children};
use super::{DbError, Email, Owner, Phone, SelectItem};

/// Contact record with its child rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub company_id: i64,
    pub department_id: i64,
    pub post_id: i64,
    /// Civil-defence post
    pub post_go_id: i64,
    pub rank_id: i64,
    /// `dd.mm.yyyy`
    pub birthday: String,
    pub note: String,
    pub emails: Vec<Email>,
    pub phones: Vec<Phone>,
    pub faxes: Vec<Phone>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Contact {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            name: nulls::text(row.try_get("name")?),
            company_id: nulls::id(row.try_get("company_id")?),
            department_id: nulls::id(row.try_get("department_id")?),
            post_id: nulls::id(row.try_get("post_id")?),
            post_go_id: nulls::id(row.try_get("post_go_id")?),
            rank_id: nulls::id(row.try_get("rank_id")?),
            birthday: nulls::ru_date(row.try_get("birthday")?),
            note: nulls::text(row.try_get("note")?),
            emails: Email::from_joined(row.try_get("emails")?),
            phones: Phone::from_joined(row.try_get("phones")?, false),
            faxes: Phone::from_joined(row.try_get("faxes")?, true),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Contact row for the list view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactListItem {
    pub id: i64,
    pub name: String,
    pub company_name: String,
    pub department_name: String,
    pub post_name: String,
    pub phones: Vec<String>,
    pub faxes: Vec<String>,
}

impl ContactListItem {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            name: nulls::text(row.try_get("name")?),
            company_name: nulls::text(row.try_get("company_name")?),
            department_name: nulls::text(row.try_get("department_name")?),
            post_name: nulls::text(row.try_get("post_name")?),
            phones: nulls::split_joined(row.try_get("phones")?),
            faxes: nulls::split_joined(row.try_get("faxes")?),
        })
    }
}

/// Contact row for a company's staff list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCompanyItem {
    pub id: i64,
    pub name: String,
    pub department_name: String,
    pub post_name: String,
    pub post_go_name: String,
}

impl ContactCompanyItem {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            name: nulls::text(row.try_get("name")?),
            department_name: nulls::text(row.try_get("department_name")?),
            post_name: nulls::text(row.try_get("post_name")?),
            post_go_name: nulls::text(row.try_get("post_go_name")?),
        })
    }
}

pub struct ContactRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a contact with its emails, phones and faxes.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn get(&self, id: i64) -> Result<Contact, DbError> {
        if id == 0 {
            return Ok(Contact::default());
        }
        let row = sqlx::query(
            r#"
            SELECT
                c.id,
                c.name,
                c.company_id,
                c.department_id,
                c.post_id,
                c.post_go_id,
                c.rank_id,
                c.birthday,
                c.note,
                c.created_at,
                c.updated_at,
                array_to_string(array_agg(DISTINCT e.email), ',') AS emails,
                array_to_string(array_agg(DISTINCT p.phone), ',') AS phones,
                array_to_string(array_agg(DISTINCT f.phone), ',') AS faxes
            FROM contacts AS c
            LEFT JOIN emails AS e ON e.contact_id = c.id
            LEFT JOIN phones AS p ON p.contact_id = c.id AND p.fax = false
            LEFT JOIN phones AS f ON f.contact_id = c.id AND f.fax = true
            WHERE c.id = $1
            GROUP BY c.id
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("contact", id))?;

        Ok(Contact::from_row(&row)?)
    }

    /// All contacts by name, with company, department and post names.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn list(&self) -> Result<Vec<ContactListItem>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                c.id,
                c.name,
                co.name AS company_name,
                d.name AS department_name,
                po.name AS post_name,
                array_to_string(array_agg(DISTINCT ph.phone), ',') AS phones,
                array_to_string(array_agg(DISTINCT f.phone), ',') AS faxes
            FROM contacts AS c
            LEFT JOIN companies AS co ON co.id = c.company_id
            LEFT JOIN departments AS d ON d.id = c.department_id
            LEFT JOIN posts AS po ON po.id = c.post_id
            LEFT JOIN phones AS ph ON ph.contact_id = c.id AND ph.fax = false
            LEFT JOIN phones AS f ON f.contact_id = c.id AND f.fax = true
            GROUP BY c.id, co.name, d.name, po.name
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(ContactListItem::from_row)
            .collect::<Result<_, _>>()?)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn select(&self) -> Result<Vec<SelectItem>, DbError> {
        let rows = sqlx::query("SELECT id, name FROM contacts ORDER BY name ASC")
            .fetch_all(self.pool)
            .await?;

        Ok(SelectItem::from_rows(&rows)?)
    }

    /// Staff of one company, by name. Id 0 gives an empty list.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn list_by_company(
        &self,
        company_id: i64,
    ) -> Result<Vec<ContactCompanyItem>, DbError> {
        if company_id == 0 {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            r#"
            SELECT
                c.id,
                c.name,
                d.name AS department_name,
                po.name AS post_name,
                pog.name AS post_go_name
            FROM contacts AS c
            LEFT JOIN departments AS d ON d.id = c.department_id
            LEFT JOIN posts AS po ON po.id = c.post_id
            LEFT JOIN posts AS pog ON pog.id = c.post_go_id
            WHERE c.company_id = $1
            ORDER BY c.name ASC
            "#,
        )
        .bind(company_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(ContactCompanyItem::from_row)
            .collect::<Result<_, _>>()?)
    }

    /// Insert a contact and its emails, phones and faxes.
    #[instrument(level = "debug", skip(self, contact), fields(name = %contact.name), err(level = "warn"))]
    pub async fn create(&self, contact: &Contact) -> Result<i64, DbError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO contacts (
                name, company_id, department_id, post_id, post_go_id, rank_id,
                birthday, note, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now(), now())
            RETURNING id
            "#,
        )
        .bind(nulls::text_or_null(&contact.name))
        .bind(nulls::id_or_null(contact.company_id))
        .bind(nulls::id_or_null(contact.department_id))
        .bind(nulls::id_or_null(contact.post_id))
        .bind(nulls::id_or_null(contact.post_go_id))
        .bind(nulls::id_or_null(contact.rank_id))
        .bind(nulls::ru_date_or_null(&contact.birthday))
        .bind(nulls::text_or_null(&contact.note))
        .fetch_one(&mut *tx)
        .await?;

        store_children(
            &mut *tx,
            Owner::Contact(id),
            &contact.emails,
            &contact.phones,
            &contact.faxes,
        )
        .await?;

        tx.commit().await?;
        tracing::info!(id, name = %contact.name, "contact created");
        Ok(id)
    }

    /// Save a contact, replacing emails and reconciling phones and faxes.
    #[instrument(level = "debug", skip(self, contact), fields(id = contact.id), err(level = "warn"))]
    pub async fn update(&self, contact: &Contact) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE contacts SET
                name = $2, company_id = $3, department_id = $4, post_id = $5,
                post_go_id = $6, rank_id = $7, birthday = $8, note = $9,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(contact.id)
        .bind(nulls::text_or_null(&contact.name))
        .bind(nulls::id_or_null(contact.company_id))
        .bind(nulls::id_or_null(contact.department_id))
        .bind(nulls::id_or_null(contact.post_id))
        .bind(nulls::id_or_null(contact.post_go_id))
        .bind(nulls::id_or_null(contact.rank_id))
        .bind(nulls::ru_date_or_null(&contact.birthday))
        .bind(nulls::text_or_null(&contact.note))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("contact", contact.id));
        }

        store_children(
            &mut *tx,
            Owner::Contact(contact.id),
            &contact.emails,
            &contact.phones,
            &contact.faxes,
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Delete a contact with its phones and emails. Id 0 is a no-op.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        if id == 0 {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        delete_children(&mut *tx, Owner::Contact(id)).await?;
        sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(id, "contact deleted");
        Ok(())
    }
}
