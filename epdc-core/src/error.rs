/// Structured error types for epdc-core.
///
/// The binary (epdc-cli) wraps these in `anyhow`; library consumers get
/// composable errors.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for epdc-core operations
#[derive(Error, Debug)]
pub enum EpdcError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Config file is not valid TOML
    #[error("Invalid TOML in {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config could not be rendered back to TOML
    #[error("Failed to serialize config: {source}")]
    TomlSerialize {
        #[from]
        source: toml::ser::Error,
    },

    /// Date string did not match the expected layout
    #[error("Invalid date '{value}': expected {expected}")]
    InvalidDate { value: String, expected: &'static str },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for epdc-core operations
pub type Result<T> = std::result::Result<T, EpdcError>;

impl EpdcError {
    /// Create a TOML parse error for a config path
    pub fn toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Toml {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid date error
    pub fn invalid_date(value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidDate {
            value: value.into(),
            expected,
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EpdcError::invalid_date("31.02.2017", "dd.mm.yyyy");
        assert_eq!(
            err.to_string(),
            "Invalid date '31.02.2017': expected dd.mm.yyyy"
        );

        let err = EpdcError::config("database.name is empty");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("database.name"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: EpdcError = io_err.into();

        assert!(matches!(err, EpdcError::Io { .. }));
    }
}
