//! Education period commands

use anyhow::Result;
use clap::{Parser, Subcommand};
use epdc_db::{Directory, Education};

use super::{parse_date_arg, print_created, print_done, print_json};

#[derive(Parser, Debug)]
pub struct EducationArgs {
    #[command(subcommand)]
    pub command: EducationCommands,
}

#[derive(Subcommand, Debug)]
pub enum EducationCommands {
    /// List periods by start date
    List,
    /// Show one period
    Show {
        /// Education ID
        id: i64,
    },
    /// Add a period
    Add {
        /// Start date, dd.mm.yyyy
        #[arg(long, value_parser = parse_date_arg)]
        start: String,
        /// End date, dd.mm.yyyy
        #[arg(long, value_parser = parse_date_arg)]
        end: String,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// Change a period; omitted options keep their stored values
    Update {
        /// Education ID
        id: i64,
        /// Start date, dd.mm.yyyy
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<String>,
        /// End date, dd.mm.yyyy
        #[arg(long, value_parser = parse_date_arg)]
        end: Option<String>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a period
    Delete {
        /// Education ID
        id: i64,
    },
}

pub async fn run_education(dir: &Directory, args: EducationArgs, json: bool) -> Result<()> {
    let repo = dir.educations();

    match args.command {
        EducationCommands::List => {
            let educations = repo.list().await?;
            if json {
                return print_json(&educations);
            }
            for e in &educations {
                println!("{:>6}  {} - {}  {}", e.id, e.start_str, e.end_str, e.note);
            }
            Ok(())
        }
        EducationCommands::Show { id } => {
            let education = repo.get(id).await?;
            if json {
                return print_json(&education);
            }
            println!(
                "{:>6}  {} - {}  {}",
                education.id, education.start_date, education.end_date, education.note
            );
            Ok(())
        }
        EducationCommands::Add { start, end, note } => {
            let education = Education {
                start_date: start,
                end_date: end,
                note: note.unwrap_or_default(),
                ..Education::default()
            };
            print_created("education", repo.create(&education).await?, json)
        }
        EducationCommands::Update {
            id,
            start,
            end,
            note,
        } => {
            let mut education = repo.get(id).await?;
            education.id = id;
            if let Some(start) = start {
                education.start_date = start;
            }
            if let Some(end) = end {
                education.end_date = end;
            }
            if let Some(note) = note {
                education.note = note;
            }
            repo.update(&education).await?;
            print_done(&format!("Updated education #{}", id), json)
        }
        EducationCommands::Delete { id } => {
            repo.delete(id).await?;
            print_done(&format!("Deleted education #{}", id), json)
        }
    }
}
