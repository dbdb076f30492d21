//! Dictionary commands, shared by scope, kind, rank and department
//!
//! ```bash
//! epdc scope add "Энергетика" --note "ТЭЦ и подстанции"
//! epdc rank list --json | jq '.[].name'
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use epdc_db::{DictionaryEntry, DictionaryKind, Directory};

use super::{print_created, print_done, print_json, print_select};

#[derive(Parser, Debug)]
pub struct DictionaryArgs {
    #[command(subcommand)]
    pub command: DictionaryCommands,
}

#[derive(Subcommand, Debug)]
pub enum DictionaryCommands {
    /// List all entries by name
    List,
    /// List `id name` pairs
    Select,
    /// Show one entry
    Show {
        /// Entry ID
        id: i64,
    },
    /// Add an entry
    Add {
        /// Entry name
        name: String,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// Rename an entry or change its note
    Update {
        /// Entry ID
        id: i64,
        /// New name
        name: String,
        /// New note
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete an entry
    Delete {
        /// Entry ID
        id: i64,
    },
}

pub async fn run_dictionary(
    dir: &Directory,
    kind: DictionaryKind,
    args: DictionaryArgs,
    json: bool,
) -> Result<()> {
    let repo = dir.dictionary(kind);

    match args.command {
        DictionaryCommands::List => {
            let entries = repo.list().await?;
            if json {
                return print_json(&entries);
            }
            for entry in &entries {
                print_entry(entry);
            }
            Ok(())
        }
        DictionaryCommands::Select => print_select(&repo.select().await?, json),
        DictionaryCommands::Show { id } => {
            let entry = repo.get(id).await?;
            if json {
                return print_json(&entry);
            }
            print_entry(&entry);
            Ok(())
        }
        DictionaryCommands::Add { name, note } => {
            let entry = DictionaryEntry {
                note: note.unwrap_or_default(),
                ..DictionaryEntry::new(name)
            };
            let id = repo.create(&entry).await?;
            print_created(kind.resource(), id, json)
        }
        DictionaryCommands::Update { id, name, note } => {
            let current = repo.get(id).await?;
            let entry = DictionaryEntry {
                id,
                name,
                note: note.unwrap_or(current.note),
                ..current
            };
            repo.update(&entry).await?;
            print_done(&format!("Updated {} #{}", kind.resource(), id), json)
        }
        DictionaryCommands::Delete { id } => {
            repo.delete(id).await?;
            print_done(&format!("Deleted {} #{}", kind.resource(), id), json)
        }
    }
}

fn print_entry(entry: &DictionaryEntry) {
    if entry.note.is_empty() {
        println!("{:>6}  {}", entry.id, entry.name);
    } else {
        println!("{:>6}  {}  ({})", entry.id, entry.name, entry.note);
    }
}
