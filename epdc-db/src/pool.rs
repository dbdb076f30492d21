//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits.

use std::str::FromStr;

use epdc_core::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{ConnectOptions, PgPool};

/// Create a PostgreSQL connection pool from directory config.
///
/// Statement logging follows `log_sql`: on, every query is traced by sqlx;
/// off, sqlx stays quiet.
///
/// # Errors
///
/// Returns an error if the URL is malformed or the connection fails.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = connect_options(config)?;
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// Create a PostgreSQL connection pool straight from a URL.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool_from_url("postgres://localhost/epdc", 5).await?;
/// ```
pub async fn create_pool_from_url(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let options = match config.url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => PgConnectOptions::from_str(url)?,
        None => options_from_parts(config),
    };
    if config.log_sql {
        Ok(options)
    } else {
        Ok(options.disable_statement_logging())
    }
}

/// Options from the individual parts; credentials are taken verbatim.
fn options_from_parts(config: &DatabaseConfig) -> PgConnectOptions {
    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .ssl_mode(if config.ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Disable
        });
    if !config.user.is_empty() {
        options = options.username(&config.user);
    }
    if !config.password.is_empty() {
        options = options.password(&config.password);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_built_from_parts() {
        let config = DatabaseConfig {
            host: "db.example".into(),
            port: 6543,
            name: "directory".into(),
            user: "clerk".into(),
            ..DatabaseConfig::default()
        };
        let options = connect_options(&config).expect("valid url");
        assert_eq!(options.get_host(), "db.example");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("directory"));
        assert_eq!(options.get_username(), "clerk");
    }

    #[test]
    fn reserved_characters_in_password_survive() {
        let config = DatabaseConfig {
            host: "127.0.0.1".into(),
            port: 5433,
            name: "directory".into(),
            user: "postgres".into(),
            password: "p/ss#1".into(),
            ..DatabaseConfig::default()
        };
        let options = connect_options(&config).expect("parts always build options");
        assert_eq!(options.get_host(), "127.0.0.1");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("directory"));
        assert_eq!(options.get_username(), "postgres");
    }

    #[test]
    fn encoded_url_from_parts_parses() {
        let config = DatabaseConfig {
            name: "directory".into(),
            user: "clerk".into(),
            password: "a?b%c/d".into(),
            ..DatabaseConfig::default()
        };
        let options = PgConnectOptions::from_str(&config.connection_url())
            .expect("encoded credentials parse");
        assert_eq!(options.get_username(), "clerk");
        assert_eq!(options.get_port(), 5432);
    }

    #[test]
    fn malformed_url_is_rejected() {
        let config = DatabaseConfig {
            url: Some("definitely not a url".into()),
            ..DatabaseConfig::default()
        };
        assert!(connect_options(&config).is_err());
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p epdc-db -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool_from_url(&url, 2)
            .await
            .expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }
}
