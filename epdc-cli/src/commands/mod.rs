//! Command implementations for the epdc CLI

pub mod company;
pub mod contact;
pub mod dictionary;
pub mod education;
pub mod post;
pub mod practice;
pub mod siren;
pub mod siren_type;

use anyhow::{Context, Result};
use epdc_core::DirectoryConfig;
use epdc_db::{schema, Directory, SelectItem};
use serde::Serialize;

pub use company::run_company;
pub use contact::run_contact;
pub use dictionary::run_dictionary;
pub use education::run_education;
pub use post::run_post;
pub use practice::run_practice;
pub use siren::run_siren;
pub use siren_type::run_siren_type;

/// Connect to the configured database, creating missing tables.
pub async fn connect(config: &DirectoryConfig) -> Result<Directory> {
    Directory::connect(&config.database)
        .await
        .context("Failed to connect to the directory database")
}

/// Report the directory tables, failing if any is absent after bootstrap.
pub async fn run_init(dir: &Directory) -> Result<()> {
    let missing = schema::missing_tables(dir.pool())
        .await
        .context("Failed to look up directory tables")?;
    if !missing.is_empty() {
        anyhow::bail!("Missing directory tables: {}", missing.join(", "));
    }

    println!("✅ Directory tables ready:");
    for table in schema::table_names() {
        println!("   • {}", table);
    }
    Ok(())
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_select(items: &[SelectItem], json: bool) -> Result<()> {
    if json {
        return print_json(items);
    }
    for item in items {
        println!("{:>6}  {}", item.id, item.name);
    }
    Ok(())
}

pub(crate) fn print_created(what: &str, id: i64, json: bool) -> Result<()> {
    if json {
        return print_json(&serde_json::json!({ "id": id }));
    }
    println!("✅ Created {} #{}", what, id);
    Ok(())
}

pub(crate) fn print_done(message: &str, json: bool) -> Result<()> {
    if json {
        return print_json(&serde_json::json!({ "ok": true }));
    }
    println!("✅ {}", message);
    Ok(())
}

/// Clap value parser for `dd.mm.yyyy` arguments.
pub(crate) fn parse_date_arg(value: &str) -> std::result::Result<String, String> {
    epdc_core::parse_ru_date(value)
        .map(epdc_core::dates::format_ru_date)
        .map_err(|e| e.to_string())
}

/// `a, b` with empty parts dropped.
pub(crate) fn join_nonempty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_args_are_normalised() {
        assert_eq!(parse_date_arg(" 05.03.2017 ").unwrap(), "05.03.2017");
        assert!(parse_date_arg("2017-03-05").is_err());
    }

    #[test]
    fn joins_only_filled_parts() {
        assert_eq!(join_nonempty(&["a", "", "b"]), "a, b");
        assert_eq!(join_nonempty(&["", ""]), "");
    }
}
