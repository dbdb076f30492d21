//! Name/note dictionaries
//!
//! Scopes, kinds, ranks and departments have identical tables, so one
//! repository serves all four, keyed by [`DictionaryKind`].

use chrono::NaiveDateTime;
use epdc_core::nulls;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::{DbError, SelectItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictionaryKind {
    /// Company field of activity
    Scope,
    /// Practice kind
    Kind,
    /// Contact rank
    Rank,
    /// Contact department
    Department,
}

impl DictionaryKind {
    pub const ALL: [DictionaryKind; 4] = [
        DictionaryKind::Scope,
        DictionaryKind::Kind,
        DictionaryKind::Rank,
        DictionaryKind::Department,
    ];

    pub fn table(self) -> &'static str {
        match self {
            DictionaryKind::Scope => "scopes",
            DictionaryKind::Kind => "kinds",
            DictionaryKind::Rank => "ranks",
            DictionaryKind::Department => "departments",
        }
    }

    /// Resource name used in not-found errors
    pub fn resource(self) -> &'static str {
        match self {
            DictionaryKind::Scope => "scope",
            DictionaryKind::Kind => "kind",
            DictionaryKind::Rank => "rank",
            DictionaryKind::Department => "department",
        }
    }
}

/// Dictionary row from database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub id: i64,
    pub name: String,
    pub note: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

pub type Scope = DictionaryEntry;
pub type Kind = DictionaryEntry;
pub type Rank = DictionaryEntry;
pub type Department = DictionaryEntry;

impl DictionaryEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            name: nulls::text(row.try_get("name")?),
            note: nulls::text(row.try_get("note")?),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Repository over one dictionary table
pub struct DictionaryRepo<'a> {
    pool: &'a PgPool,
    kind: DictionaryKind,
}

impl<'a> DictionaryRepo<'a> {
    pub fn new(pool: &'a PgPool, kind: DictionaryKind) -> Self {
        Self { pool, kind }
    }

    pub fn kind(&self) -> DictionaryKind {
        self.kind
    }

    /// Get one entry by id. Id 0 gives an empty entry.
    #[instrument(level = "debug", skip(self), fields(table = self.kind.table()), err(level = "warn"))]
    pub async fn get(&self, id: i64) -> Result<DictionaryEntry, DbError> {
        if id == 0 {
            return Ok(DictionaryEntry::default());
        }
        let row = sqlx::query(&format!(
            "SELECT id, name, note, created_at, updated_at FROM {} WHERE id = $1",
            self.kind.table()
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(self.kind.resource(), id))?;

        Ok(DictionaryEntry::from_row(&row)?)
    }

    /// All entries, ordered by name.
    #[instrument(level = "debug", skip(self), fields(table = self.kind.table()), err(level = "warn"))]
    pub async fn list(&self) -> Result<Vec<DictionaryEntry>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT id, name, note, created_at, updated_at FROM {} ORDER BY name ASC",
            self.kind.table()
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(DictionaryEntry::from_row)
            .collect::<Result<_, _>>()?)
    }

    #[instrument(level = "debug", skip(self), fields(table = self.kind.table()), err(level = "warn"))]
    pub async fn select(&self) -> Result<Vec<SelectItem>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT id, name FROM {} ORDER BY name ASC",
            self.kind.table()
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(SelectItem::from_rows(&rows)?)
    }

    /// Insert an entry, returning its id.
    #[instrument(level = "debug", skip(self), fields(table = self.kind.table()), err(level = "warn"))]
    pub async fn create(&self, entry: &DictionaryEntry) -> Result<i64, DbError> {
        let id: i64 = sqlx::query_scalar(&format!(
            r#"
            INSERT INTO {} (name, note, created_at, updated_at)
            VALUES ($1, $2, now(), now())
            RETURNING id
            "#,
            self.kind.table()
        ))
        .bind(nulls::text_or_null(&entry.name))
        .bind(nulls::text_or_null(&entry.note))
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(table = self.kind.table(), id, "dictionary entry created");
        Ok(id)
    }

    #[instrument(level = "debug", skip(self), fields(table = self.kind.table()), err(level = "warn"))]
    pub async fn update(&self, entry: &DictionaryEntry) -> Result<(), DbError> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET name = $2, note = $3, updated_at = now() WHERE id = $1",
            self.kind.table()
        ))
        .bind(entry.id)
        .bind(nulls::text_or_null(&entry.name))
        .bind(nulls::text_or_null(&entry.note))
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(self.kind.resource(), entry.id));
        }
        Ok(())
    }

    /// Delete an entry. Id 0 is a no-op.
    #[instrument(level = "debug", skip(self), fields(table = self.kind.table()), err(level = "warn"))]
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        if id == 0 {
            return Ok(());
        }
        sqlx::query(&format!("DELETE FROM {} WHERE id = $1", self.kind.table()))
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
    fn every_kind_has_its_own_table() {
        let tables: Vec<_> = DictionaryKind::ALL.iter().map(|k| k.table()).collect();
        assert_eq!(tables, ["scopes", "kinds", "ranks", "departments"]);
        assert_eq!(DictionaryKind::Department.resource(), "department");
    }

    #[test]
    fn dictionary_tables_exist_in_schema() {
        let names: Vec<_> = crate::schema::table_names().collect();
        for kind in DictionaryKind::ALL {
            assert!(names.contains(&kind.table()), "{} missing", kind.table());
        }
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&DictionaryKind::Rank).unwrap();
        assert_eq!(json, "\"rank\"");
    }
}
