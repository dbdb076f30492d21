//! epdc-core: shared building blocks for the epdc contact directory
//!
//! - [`nulls`]: conversions between nullable column values and the plain
//!   values carried by directory records
//! - [`dates`]: `dd.mm.yyyy` handling and Russian month strings
//! - [`config`]: TOML configuration with environment overrides

pub mod config;
pub mod dates;
pub mod error;
pub mod nulls;

pub use config::{DatabaseConfig, DirectoryConfig, LoggingConfig};
pub use dates::{iso_to_ru_date, month_string, month_string_for, parse_ru_date};
pub use error::{EpdcError, Result};
