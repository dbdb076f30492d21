//! Email repository
//!
//! Unlike phones, an owner's emails are replaced wholesale on save.

use epdc_core::nulls;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use tracing::instrument;

use super::{DbError, Owner};

/// Email record from database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub id: i64,
    pub company_id: i64,
    pub contact_id: i64,
    pub email: String,
    pub note: String,
}

impl Email {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Build emails from a comma-joined aggregate column.
    pub fn from_joined(value: Option<&str>) -> Vec<Self> {
        nulls::split_joined(value)
            .into_iter()
            .map(Self::new)
            .collect()
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            company_id: nulls::id(row.try_get("company_id")?),
            contact_id: nulls::id(row.try_get("contact_id")?),
            email: nulls::text(row.try_get("email")?),
            note: nulls::text(row.try_get("note")?),
        })
    }
}

const SELECT_EMAIL: &str = "SELECT id, company_id, contact_id, email, note FROM emails";

/// Delete an owner's emails, then insert `emails`, inside the caller's
/// transaction. Blank addresses are skipped.
pub(crate) async fn replace_for_owner(
    conn: &mut PgConnection,
    owner: Owner,
    emails: &[Email],
) -> Result<(), DbError> {
    delete_all_for_owner(&mut *conn, owner).await?;

    let (company_id, contact_id) = owner.columns();
    for email in emails.iter().filter(|e| !e.email.trim().is_empty()) {
        sqlx::query(
            r#"
            INSERT INTO emails (company_id, contact_id, email, note)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(company_id)
        .bind(contact_id)
        .bind(email.email.trim())
        .bind(nulls::text_or_null(&email.note))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub(crate) async fn delete_all_for_owner(
    conn: &mut PgConnection,
    owner: Owner,
) -> Result<(), DbError> {
    if owner.id() == 0 {
        return Ok(());
    }
    sqlx::query(&format!("DELETE FROM emails WHERE {} = $1", owner.column()))
        .bind(owner.id())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Email repository
pub struct EmailRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> EmailRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get one email by id.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn get(&self, id: i64) -> Result<Email, DbError> {
        if id == 0 {
            return Ok(Email::default());
        }
        let row = sqlx::query(&format!("{SELECT_EMAIL} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("email", id))?;

        Ok(Email::from_row(&row)?)
    }

    /// All emails, ordered by address.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn list(&self) -> Result<Vec<Email>, DbError> {
        let rows = sqlx::query(&format!("{SELECT_EMAIL} ORDER BY email ASC"))
            .fetch_all(self.pool)
            .await?;

        Ok(rows.iter().map(Email::from_row).collect::<Result<_, _>>()?)
    }

    /// Emails of one company or contact, ordered by address.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn list_for(&self, owner: Owner) -> Result<Vec<Email>, DbError> {
        if owner.id() == 0 {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(&format!(
            "{SELECT_EMAIL} WHERE {} = $1 ORDER BY email ASC",
            owner.column()
        ))
        .bind(owner.id())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(Email::from_row).collect::<Result<_, _>>()?)
    }

    /// Insert one email, returning its id.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn create(&self, email: &Email) -> Result<i64, DbError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO emails (company_id, contact_id, email, note)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(nulls::id_or_null(email.company_id))
        .bind(nulls::id_or_null(email.contact_id))
        .bind(nulls::text_or_null(&email.email))
        .bind(nulls::text_or_null(&email.note))
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Replace every email of an owner.
    #[instrument(level = "debug", skip(self, emails), err(level = "warn"))]
    pub async fn replace_for(&self, owner: Owner, emails: &[Email]) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        replace_for_owner(&mut *tx, owner, emails).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Save changes to one email.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn update(&self, email: &Email) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE emails
            SET company_id = $2, contact_id = $3, email = $4, note = $5
            WHERE id = $1
            "#,
        )
        .bind(email.id)
        .bind(nulls::id_or_null(email.company_id))
        .bind(nulls::id_or_null(email.contact_id))
        .bind(nulls::text_or_null(&email.email))
        .bind(nulls::text_or_null(&email.note))
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("email", email.id));
        }
        Ok(())
    }

    /// Delete one email. Id 0 is a no-op.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        if id == 0 {
            return Ok(());
        }
        sqlx::query("DELETE FROM emails WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Delete every email of an owner.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn delete_all_for(&self, owner: Owner) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        delete_all_for_owner(&mut *conn, owner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_emails_from_aggregate() {
        let emails = Email::from_joined(Some("info@romashka.ru,office@romashka.ru"));
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0].email, "info@romashka.ru");
        assert_eq!(emails[1].id, 0);
        assert!(Email::from_joined(Some("")).is_empty());
        assert!(Email::from_joined(None).is_empty());
    }
}
