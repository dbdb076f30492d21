//! Practice commands

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use epdc_db::{Directory, Practice};

use super::{parse_date_arg, print_created, print_done, print_json};

#[derive(Parser, Debug)]
pub struct PracticeArgs {
    #[command(subcommand)]
    pub command: PracticeCommands,
}

#[derive(Subcommand, Debug)]
pub enum PracticeCommands {
    /// List practices by date with company and kind names
    List,
    /// Show one practice
    Show {
        /// Practice ID
        id: i64,
    },
    /// List the practices of one company
    ByCompany {
        /// Company ID
        company_id: i64,
    },
    /// Add a practice
    Add(PracticeFields),
    /// Change a practice; omitted options keep their stored values
    Update {
        /// Practice ID
        id: i64,
        #[command(flatten)]
        fields: PracticeFields,
    },
    /// Delete a practice
    Delete {
        /// Practice ID
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct PracticeFields {
    /// Company ID
    #[arg(long)]
    pub company_id: Option<i64>,
    /// Practice kind ID
    #[arg(long)]
    pub kind_id: Option<i64>,
    /// Topic
    #[arg(long)]
    pub topic: Option<String>,
    /// Date of practice, dd.mm.yyyy
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<String>,
    /// Free-form note
    #[arg(long)]
    pub note: Option<String>,
}

impl PracticeFields {
    fn apply(self, practice: &mut Practice) {
        if let Some(id) = self.company_id {
            practice.company_id = id;
        }
        if let Some(id) = self.kind_id {
            practice.kind_id = id;
        }
        if let Some(topic) = self.topic {
            practice.topic = topic;
        }
        if let Some(date) = self.date {
            practice.date_of_practice = date;
        }
        if let Some(note) = self.note {
            practice.note = note;
        }
    }
}

pub async fn run_practice(dir: &Directory, args: PracticeArgs, json: bool) -> Result<()> {
    let repo = dir.practices();

    match args.command {
        PracticeCommands::List => {
            let practices = repo.list().await?;
            if json {
                return print_json(&practices);
            }
            for p in &practices {
                println!(
                    "{:>6}  {:<22}  {}  [{}] {}",
                    p.id, p.date_str, p.company_name, p.kind_name, p.topic
                );
            }
            Ok(())
        }
        PracticeCommands::Show { id } => {
            let practice = repo.get(id).await?;
            if json {
                return print_json(&practice);
            }
            print_practice(&practice);
            Ok(())
        }
        PracticeCommands::ByCompany { company_id } => {
            let practices = repo.list_for_company(company_id).await?;
            if json {
                return print_json(&practices);
            }
            for practice in &practices {
                print_practice(practice);
            }
            Ok(())
        }
        PracticeCommands::Add(fields) => {
            let mut practice = Practice::default();
            fields.apply(&mut practice);
            print_created("practice", repo.create(&practice).await?, json)
        }
        PracticeCommands::Update { id, fields } => {
            let mut practice = repo.get(id).await?;
            practice.id = id;
            fields.apply(&mut practice);
            repo.update(&practice).await?;
            print_done(&format!("Updated practice #{}", id), json)
        }
        PracticeCommands::Delete { id } => {
            repo.delete(id).await?;
            print_done(&format!("Deleted practice #{}", id), json)
        }
    }
}

fn print_practice(practice: &Practice) {
    println!("{:>6}  {:<22}  {}", practice.id, practice.date_str, practice.topic);
}
