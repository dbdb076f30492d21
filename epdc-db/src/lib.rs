//! epdc-db: PostgreSQL storage for the epdc contact directory
//!
//! # Design Principles
//!
//! - Connection pool, repositories borrow it; no shared connection
//! - List views use JOINs and aggregates; no N+1 queries
//! - Rely on DB constraints and surface conflicts via [`DbError::is_unique_violation`]
//! - Transactions whenever a write touches child rows (emails, phones)

pub mod error;
pub mod pool;
pub mod repos;
pub mod schema;

use epdc_core::DatabaseConfig;
use sqlx::PgPool;

pub use error::DbError;
pub use pool::{create_pool, create_pool_from_url};
pub use repos::*;

/// Entry point to the directory: owns the pool, hands out repositories.
#[derive(Clone)]
pub struct Directory {
    pool: PgPool,
}

impl Directory {
    /// Validate config, connect, and make sure every table exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        config.validate()?;
        let pool = create_pool(config).await?;
        schema::create_tables(&pool).await?;
        tracing::info!(
            max_connections = config.max_connections,
            "directory connected"
        );
        Ok(Self { pool })
    }

    /// Wrap an existing pool. Tables are not created.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn dictionary(&self, kind: DictionaryKind) -> DictionaryRepo<'_> {
        DictionaryRepo::new(&self.pool, kind)
    }

    pub fn scopes(&self) -> DictionaryRepo<'_> {
        self.dictionary(DictionaryKind::Scope)
    }

    pub fn kinds(&self) -> DictionaryRepo<'_> {
        self.dictionary(DictionaryKind::Kind)
    }

    pub fn ranks(&self) -> DictionaryRepo<'_> {
        self.dictionary(DictionaryKind::Rank)
    }

    pub fn departments(&self) -> DictionaryRepo<'_> {
        self.dictionary(DictionaryKind::Department)
    }

    pub fn posts(&self) -> PostRepo<'_> {
        PostRepo::new(&self.pool)
    }

    pub fn companies(&self) -> CompanyRepo<'_> {
        CompanyRepo::new(&self.pool)
    }

    pub fn contacts(&self) -> ContactRepo<'_> {
        ContactRepo::new(&self.pool)
    }

    pub fn phones(&self) -> PhoneRepo<'_> {
        PhoneRepo::new(&self.pool)
    }

    pub fn emails(&self) -> EmailRepo<'_> {
        EmailRepo::new(&self.pool)
    }

    pub fn practices(&self) -> PracticeRepo<'_> {
        PracticeRepo::new(&self.pool)
    }

    pub fn educations(&self) -> EducationRepo<'_> {
        EducationRepo::new(&self.pool)
    }

    pub fn siren_types(&self) -> SirenTypeRepo<'_> {
        SirenTypeRepo::new(&self.pool)
    }

    pub fn sirens(&self) -> SirenRepo<'_> {
        SirenRepo::new(&self.pool)
    }

    /// Close the pool, waiting for checked-out connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
