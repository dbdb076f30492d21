//! Phone repository
//!
//! Phones and faxes share one table, split by the `fax` flag. Saving an
//! owner reconciles instead of rewriting: numbers no longer listed are
//! deleted, new numbers are inserted, untouched rows keep their ids.

use epdc_core::nulls;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use tracing::instrument;

use super::{DbError, Owner};

/// Phone (or fax) record from database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub id: i64,
    pub company_id: i64,
    pub contact_id: i64,
    pub phone: i64,
    pub fax: bool,
    pub note: String,
}

impl Phone {
    pub fn new(phone: i64, fax: bool) -> Self {
        Self {
            phone,
            fax,
            ..Self::default()
        }
    }

    /// Build phones from a comma-joined aggregate column.
    ///
    /// Segments that are not numbers are skipped.
    pub fn from_joined(value: Option<&str>, fax: bool) -> Vec<Self> {
        nulls::split_joined_numbers(value)
            .into_iter()
            .map(|n| Self::new(n, fax))
            .collect()
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            company_id: nulls::id(row.try_get("company_id")?),
            contact_id: nulls::id(row.try_get("contact_id")?),
            phone: nulls::id(row.try_get("phone")?),
            fax: nulls::flag(row.try_get("fax")?),
            note: nulls::text(row.try_get("note")?),
        })
    }
}

/// What a save has to change to make the stored numbers match the wanted ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneSyncPlan {
    pub remove: Vec<i64>,
    pub insert: Vec<i64>,
}

impl PhoneSyncPlan {
    /// Compare stored numbers against wanted numbers.
    ///
    /// Duplicates in `wanted` are inserted once; numbers present on both
    /// sides are left alone.
    pub fn new(stored: &[i64], wanted: &[i64]) -> Self {
        let remove = stored
            .iter()
            .copied()
            .filter(|n| !nulls::contains_id(*n, wanted))
            .collect();

        let mut insert: Vec<i64> = Vec::new();
        for &n in wanted {
            if !nulls::contains_id(n, stored) && !nulls::contains_id(n, &insert) {
                insert.push(n);
            }
        }

        Self { remove, insert }
    }

    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.insert.is_empty()
    }
}

/// Reconcile one owner's phones (or faxes) inside the caller's transaction.
/// Owner id 0 is absent and yields an empty plan.
pub(crate) async fn sync_for_owner(
    conn: &mut PgConnection,
    owner: Owner,
    fax: bool,
    phones: &[Phone],
) -> Result<PhoneSyncPlan, DbError> {
    if owner.id() == 0 {
        return Ok(PhoneSyncPlan::default());
    }
    let column = owner.column();

    let stored: Vec<i64> = sqlx::query_scalar::<_, Option<i64>>(&format!(
        "SELECT phone FROM phones WHERE {column} = $1 AND fax = $2"
    ))
    .bind(owner.id())
    .bind(fax)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .flatten()
    .collect();

    let wanted: Vec<i64> = phones.iter().map(|p| p.phone).filter(|&n| n != 0).collect();
    let plan = PhoneSyncPlan::new(&stored, &wanted);

    if !plan.remove.is_empty() {
        sqlx::query(&format!(
            "DELETE FROM phones WHERE {column} = $1 AND fax = $2 AND phone = ANY($3)"
        ))
        .bind(owner.id())
        .bind(fax)
        .bind(&plan.remove)
        .execute(&mut *conn)
        .await?;
    }

    let (company_id, contact_id) = owner.columns();
    for number in &plan.insert {
        let note = phones
            .iter()
            .find(|p| p.phone == *number)
            .map(|p| p.note.as_str())
            .unwrap_or_default();

        sqlx::query(
            r#"
            INSERT INTO phones (company_id, contact_id, phone, fax, note)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(company_id)
        .bind(contact_id)
        .bind(number)
        .bind(fax)
        .bind(nulls::text_or_null(note))
        .execute(&mut *conn)
        .await?;
    }

    tracing::debug!(
        owner = ?owner,
        fax,
        removed = plan.remove.len(),
        inserted = plan.insert.len(),
        "phones reconciled"
    );
    Ok(plan)
}

pub(crate) async fn delete_all_for_owner(
    conn: &mut PgConnection,
    owner: Owner,
) -> Result<(), DbError> {
    if owner.id() == 0 {
        return Ok(());
    }
    sqlx::query(&format!("DELETE FROM phones WHERE {} = $1", owner.column()))
        .bind(owner.id())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Phone repository
pub struct PhoneRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PhoneRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All phones (`fax = false`) or faxes (`fax = true`) of an owner.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn list_for(&self, owner: Owner, fax: bool) -> Result<Vec<Phone>, DbError> {
        if owner.id() == 0 {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(&format!(
            r#"
            SELECT id, company_id, contact_id, phone, fax, note
            FROM phones
            WHERE {} = $1 AND fax = $2
            ORDER BY phone ASC
            "#,
            owner.column()
        ))
        .bind(owner.id())
        .bind(fax)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(Phone::from_row).collect::<Result<_, _>>()?)
    }

    pub async fn phones_for(&self, owner: Owner) -> Result<Vec<Phone>, DbError> {
        self.list_for(owner, false).await
    }

    pub async fn faxes_for(&self, owner: Owner) -> Result<Vec<Phone>, DbError> {
        self.list_for(owner, true).await
    }

    /// Insert a single phone row, returning its id.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn create(&self, phone: &Phone) -> Result<i64, DbError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO phones (company_id, contact_id, phone, fax, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(nulls::id_or_null(phone.company_id))
        .bind(nulls::id_or_null(phone.contact_id))
        .bind(nulls::id_or_null(phone.phone))
        .bind(phone.fax)
        .bind(nulls::text_or_null(&phone.note))
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Make an owner's stored phones (or faxes) match `phones`. Owner id 0 is a no-op.
    #[instrument(level = "debug", skip(self, phones), err(level = "warn"))]
    pub async fn sync(
        &self,
        owner: Owner,
        fax: bool,
        phones: &[Phone],
    ) -> Result<PhoneSyncPlan, DbError> {
        let mut tx = self.pool.begin().await?;
        let plan = sync_for_owner(&mut *tx, owner, fax, phones).await?;
        tx.commit().await?;
        Ok(plan)
    }

    /// Delete every phone and fax of an owner. Owner id 0 is a no-op.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn delete_all_for(&self, owner: Owner) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        delete_all_for_owner(&mut *conn, owner).await
    }
}
