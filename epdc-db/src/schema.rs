//! Schema bootstrap, run once at startup
//!
//! Every statement is `IF NOT EXISTS`, so running it against an existing
//! database is a no-op.

use sqlx::PgPool;

use crate::DbError;

/// Tables in creation order, each with its DDL
const TABLES: &[(&str, &str)] = &[
    (
        "scopes",
        r#"
        CREATE TABLE IF NOT EXISTS scopes (
            id BIGSERIAL PRIMARY KEY,
            name TEXT,
            note TEXT,
            created_at TIMESTAMP WITHOUT TIME ZONE,
            updated_at TIMESTAMP WITHOUT TIME ZONE,
            UNIQUE (name)
        )
        "#,
    ),
    (
        "kinds",
        r#"
        CREATE TABLE IF NOT EXISTS kinds (
            id BIGSERIAL PRIMARY KEY,
            name TEXT,
            note TEXT,
            created_at TIMESTAMP WITHOUT TIME ZONE,
            updated_at TIMESTAMP WITHOUT TIME ZONE,
            UNIQUE (name)
        )
        "#,
    ),
    (
        "ranks",
        r#"
        CREATE TABLE IF NOT EXISTS ranks (
            id BIGSERIAL PRIMARY KEY,
            name TEXT,
            note TEXT,
            created_at TIMESTAMP WITHOUT TIME ZONE,
            updated_at TIMESTAMP WITHOUT TIME ZONE,
            UNIQUE (name)
        )
        "#,
    ),
    (
        "departments",
        r#"
        CREATE TABLE IF NOT EXISTS departments (
            id BIGSERIAL PRIMARY KEY,
            name TEXT,
            note TEXT,
            created_at TIMESTAMP WITHOUT TIME ZONE,
            updated_at TIMESTAMP WITHOUT TIME ZONE,
            UNIQUE (name)
        )
        "#,
    ),
    (
        "posts",
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id BIGSERIAL PRIMARY KEY,
            name TEXT,
            go BOOLEAN NOT NULL DEFAULT FALSE,
            note TEXT,
            created_at TIMESTAMP WITHOUT TIME ZONE,
            updated_at TIMESTAMP WITHOUT TIME ZONE,
            UNIQUE (name, go)
        )
        "#,
    ),
    (
        "siren_types",
        r#"
        CREATE TABLE IF NOT EXISTS siren_types (
            id BIGSERIAL PRIMARY KEY,
            name TEXT,
            radius BIGINT,
            note TEXT,
            created_at TIMESTAMP WITHOUT TIME ZONE,
            updated_at TIMESTAMP WITHOUT TIME ZONE,
            UNIQUE (name, radius)
        )
        "#,
    ),
    (
        "companies",
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id BIGSERIAL PRIMARY KEY,
            name TEXT,
            address TEXT,
            scope_id BIGINT,
            note TEXT,
            created_at TIMESTAMP WITHOUT TIME ZONE,
            updated_at TIMESTAMP WITHOUT TIME ZONE,
            UNIQUE (name, scope_id)
        )
        "#,
    ),
    (
        "contacts",
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id BIGSERIAL PRIMARY KEY,
            name TEXT,
            company_id BIGINT,
            department_id BIGINT,
            post_id BIGINT,
            post_go_id BIGINT,
            rank_id BIGINT,
            birthday DATE,
            note TEXT,
            created_at TIMESTAMP WITHOUT TIME ZONE,
            updated_at TIMESTAMP WITHOUT TIME ZONE
        )
        "#,
    ),
    (
        "phones",
        r#"
        CREATE TABLE IF NOT EXISTS phones (
            id BIGSERIAL PRIMARY KEY,
            company_id BIGINT,
            contact_id BIGINT,
            phone BIGINT,
            fax BOOLEAN NOT NULL DEFAULT FALSE,
            note TEXT
        )
        "#,
    ),
    (
        "emails",
        r#"
        CREATE TABLE IF NOT EXISTS emails (
            id BIGSERIAL PRIMARY KEY,
            company_id BIGINT,
            contact_id BIGINT,
            email TEXT,
            note TEXT
        )
        "#,
    ),
    (
        "practices",
        r#"
        CREATE TABLE IF NOT EXISTS practices (
            id BIGSERIAL PRIMARY KEY,
            company_id BIGINT,
            kind_id BIGINT,
            topic TEXT,
            date_of_practice DATE,
            note TEXT,
            created_at TIMESTAMP WITHOUT TIME ZONE,
            updated_at TIMESTAMP WITHOUT TIME ZONE
        )
        "#,
    ),
    (
        "educations",
        r#"
        CREATE TABLE IF NOT EXISTS educations (
            id BIGSERIAL PRIMARY KEY,
            start_date DATE,
            end_date DATE,
            note TEXT,
            created_at TIMESTAMP WITHOUT TIME ZONE,
            updated_at TIMESTAMP WITHOUT TIME ZONE
        )
        "#,
    ),
    (
        "sirens",
        r#"
        CREATE TABLE IF NOT EXISTS sirens (
            id BIGSERIAL PRIMARY KEY,
            num_id BIGINT,
            num_pass TEXT,
            type_id BIGINT,
            address TEXT,
            radio TEXT,
            desk TEXT,
            contact_id BIGINT,
            company_id BIGINT,
            latitude TEXT,
            longitude TEXT,
            stage BIGINT,
            own TEXT,
            note TEXT,
            created_at TIMESTAMP WITHOUT TIME ZONE,
            updated_at TIMESTAMP WITHOUT TIME ZONE,
            UNIQUE (num_id, num_pass, type_id)
        )
        "#,
    ),
];

const INDEXES: &[(&str, &str)] = &[
    (
        "idx_phones_company",
        "CREATE INDEX IF NOT EXISTS idx_phones_company ON phones(company_id, fax)",
    ),
    (
        "idx_phones_contact",
        "CREATE INDEX IF NOT EXISTS idx_phones_contact ON phones(contact_id, fax)",
    ),
    (
        "idx_emails_company",
        "CREATE INDEX IF NOT EXISTS idx_emails_company ON emails(company_id)",
    ),
    (
        "idx_emails_contact",
        "CREATE INDEX IF NOT EXISTS idx_emails_contact ON emails(contact_id)",
    ),
    (
        "idx_contacts_company",
        "CREATE INDEX IF NOT EXISTS idx_contacts_company ON contacts(company_id)",
    ),
    (
        "idx_practices_company",
        "CREATE INDEX IF NOT EXISTS idx_practices_company ON practices(company_id)",
    ),
    (
        "idx_sirens_type",
        "CREATE INDEX IF NOT EXISTS idx_sirens_type ON sirens(type_id)",
    ),
];

/// Names of every table the directory owns, in creation order.
pub fn table_names() -> impl Iterator<Item = &'static str> {
    TABLES.iter().map(|(name, _)| *name)
}

/// Create all directory tables and indexes.
pub async fn create_tables(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Creating directory tables...");

    for (name, ddl) in TABLES {
        tracing::debug!(table = name, "create table");
        sqlx::query(ddl).execute(pool).await.map_err(|e| {
            tracing::error!(table = name, error = %e, "create table failed");
            e
        })?;
    }

    for (name, ddl) in INDEXES {
        tracing::debug!(index = name, "create index");
        sqlx::query(ddl).execute(pool).await.map_err(|e| {
            tracing::error!(index = name, error = %e, "create index failed");
            e
        })?;
    }

    tracing::info!("Directory tables ready");
    Ok(())
}

/// Directory tables that do not exist in the connected database.
pub async fn missing_tables(pool: &PgPool) -> Result<Vec<&'static str>, DbError> {
    let mut missing = Vec::new();
    for name in table_names() {
        let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(name)
            .fetch_one(pool)
            .await?;
        if !exists {
            missing.push(name);
        }
    }
    Ok(missing)
}
