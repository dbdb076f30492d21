//! Post repository
//!
//! Posts come in two flavours sharing one table: regular job titles and
//! civil-defence (`go = true`) posts.

use chrono::NaiveDateTime;
use epdc_core::nulls;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::{DbError, SelectItem};

/// Post record from database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub name: String,
    pub go: bool,
    pub note: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Post {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: nulls::id(row.try_get("id")?),
            name: nulls::text(row.try_get("name")?),
            go: nulls::flag(row.try_get("go")?),
            note: nulls::text(row.try_get("note")?),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

const SELECT_POST: &str = "SELECT id, name, go, note, created_at, updated_at FROM posts";

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn get(&self, id: i64) -> Result<Post, DbError> {
        if id == 0 {
            return Ok(Post::default());
        }
        let row = sqlx::query(&format!("{SELECT_POST} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("post", id))?;

        Ok(Post::from_row(&row)?)
    }

    /// All posts, ordered by name.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn list(&self) -> Result<Vec<Post>, DbError> {
        let rows = sqlx::query(&format!("{SELECT_POST} ORDER BY name ASC"))
            .fetch_all(self.pool)
            .await?;

        Ok(rows.iter().map(Post::from_row).collect::<Result<_, _>>()?)
    }

    /// Civil-defence posts (`go = true`) or regular ones.
    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn list_by_go(&self, go: bool) -> Result<Vec<Post>, DbError> {
        let rows = sqlx::query(&format!("{SELECT_POST} WHERE go = $1 ORDER BY name ASC"))
            .bind(go)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.iter().map(Post::from_row).collect::<Result<_, _>>()?)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn select(&self) -> Result<Vec<SelectItem>, DbError> {
        let rows = sqlx::query("SELECT id, name FROM posts ORDER BY name ASC")
            .fetch_all(self.pool)
            .await?;

        Ok(SelectItem::from_rows(&rows)?)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn select_by_go(&self, go: bool) -> Result<Vec<SelectItem>, DbError> {
        let rows = sqlx::query("SELECT id, name FROM posts WHERE go = $1 ORDER BY name ASC")
            .bind(go)
            .fetch_all(self.pool)
            .await?;

        Ok(SelectItem::from_rows(&rows)?)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn create(&self, post: &Post) -> Result<i64, DbError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (name, go, note, created_at, updated_at)
            VALUES ($1, $2, $3, now(), now())
            RETURNING id
            "#,
        )
        .bind(nulls::text_or_null(&post.name))
        .bind(post.go)
        .bind(nulls::text_or_null(&post.note))
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn update(&self, post: &Post) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET name = $2, go = $3, note = $4, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(nulls::text_or_null(&post.name))
        .bind(post.go)
        .bind(nulls::text_or_null(&post.note))
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("post", post.id));
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self), err(level = "warn"))]
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        if id == 0 {
            return Ok(());
        }
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
