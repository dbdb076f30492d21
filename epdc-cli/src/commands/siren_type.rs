//! Siren type commands

use anyhow::Result;
use clap::{Parser, Subcommand};
use epdc_db::{Directory, SirenType};

use super::{print_created, print_done, print_json, print_select};

#[derive(Parser, Debug)]
pub struct SirenTypeArgs {
    #[command(subcommand)]
    pub command: SirenTypeCommands,
}

#[derive(Subcommand, Debug)]
pub enum SirenTypeCommands {
    /// List siren types by name
    List,
    /// List `id name` pairs
    Select,
    /// Show one siren type
    Show {
        /// Siren type ID
        id: i64,
    },
    /// Add a siren type
    Add {
        /// Model name
        name: String,
        /// Audible radius in metres
        #[arg(long)]
        radius: Option<i64>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// Change a siren type; omitted options keep their stored values
    Update {
        /// Siren type ID
        id: i64,
        /// Model name
        #[arg(long)]
        name: Option<String>,
        /// Audible radius in metres
        #[arg(long)]
        radius: Option<i64>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a siren type
    Delete {
        /// Siren type ID
        id: i64,
    },
}

pub async fn run_siren_type(dir: &Directory, args: SirenTypeArgs, json: bool) -> Result<()> {
    let repo = dir.siren_types();

    match args.command {
        SirenTypeCommands::List => {
            let types = repo.list().await?;
            if json {
                return print_json(&types);
            }
            for t in &types {
                print_siren_type(t);
            }
            Ok(())
        }
        SirenTypeCommands::Select => print_select(&repo.select().await?, json),
        SirenTypeCommands::Show { id } => {
            let siren_type = repo.get(id).await?;
            if json {
                return print_json(&siren_type);
            }
            print_siren_type(&siren_type);
            Ok(())
        }
        SirenTypeCommands::Add { name, radius, note } => {
            let siren_type = SirenType {
                name,
                radius: radius.unwrap_or_default(),
                note: note.unwrap_or_default(),
                ..SirenType::default()
            };
            print_created("siren type", repo.create(&siren_type).await?, json)
        }
        SirenTypeCommands::Update {
            id,
            name,
            radius,
            note,
        } => {
            let mut siren_type = repo.get(id).await?;
            siren_type.id = id;
            if let Some(name) = name {
                siren_type.name = name;
            }
            if let Some(radius) = radius {
                siren_type.radius = radius;
            }
            if let Some(note) = note {
                siren_type.note = note;
            }
            repo.update(&siren_type).await?;
            print_done(&format!("Updated siren type #{}", id), json)
        }
        SirenTypeCommands::Delete { id } => {
            repo.delete(id).await?;
            print_done(&format!("Deleted siren type #{}", id), json)
        }
    }
}

fn print_siren_type(siren_type: &SirenType) {
    println!(
        "{:>6}  {}  r={} m",
        siren_type.id, siren_type.name, siren_type.radius
    );
}
