//! Siren commands

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use epdc_db::{Directory, Siren};

use super::{join_nonempty, print_created, print_done, print_json};

#[derive(Parser, Debug)]
pub struct SirenArgs {
    #[command(subcommand)]
    pub command: SirenCommands,
}

#[derive(Subcommand, Debug)]
pub enum SirenCommands {
    /// List sirens by number with type, contact and company names
    List,
    /// Show one siren
    Show {
        /// Siren ID
        id: i64,
    },
    /// Add a siren
    Add(SirenFields),
    /// Change a siren; omitted options keep their stored values
    Update {
        /// Siren ID
        id: i64,
        #[command(flatten)]
        fields: SirenFields,
    },
    /// Delete a siren
    Delete {
        /// Siren ID
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct SirenFields {
    /// Inventory number
    #[arg(long)]
    pub num_id: Option<i64>,
    /// Passport number
    #[arg(long)]
    pub num_pass: Option<String>,
    /// Siren type ID
    #[arg(long)]
    pub type_id: Option<i64>,
    /// Installation address
    #[arg(long)]
    pub address: Option<String>,
    /// Radio channel
    #[arg(long)]
    pub radio: Option<String>,
    /// Control desk
    #[arg(long)]
    pub desk: Option<String>,
    /// Responsible contact ID
    #[arg(long)]
    pub contact_id: Option<i64>,
    /// Owning company ID
    #[arg(long)]
    pub company_id: Option<i64>,
    /// Latitude
    #[arg(long)]
    pub latitude: Option<String>,
    /// Longitude
    #[arg(long)]
    pub longitude: Option<String>,
    /// Installation stage
    #[arg(long)]
    pub stage: Option<i64>,
    /// Ownership
    #[arg(long)]
    pub own: Option<String>,
    /// Free-form note
    #[arg(long)]
    pub note: Option<String>,
}

impl SirenFields {
    fn apply(self, siren: &mut Siren) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut siren.num_id, self.num_id);
        set(&mut siren.num_pass, self.num_pass);
        set(&mut siren.type_id, self.type_id);
        set(&mut siren.address, self.address);
        set(&mut siren.radio, self.radio);
        set(&mut siren.desk, self.desk);
        set(&mut siren.contact_id, self.contact_id);
        set(&mut siren.company_id, self.company_id);
        set(&mut siren.latitude, self.latitude);
        set(&mut siren.longitude, self.longitude);
        set(&mut siren.stage, self.stage);
        set(&mut siren.own, self.own);
        set(&mut siren.note, self.note);
    }
}

pub async fn run_siren(dir: &Directory, args: SirenArgs, json: bool) -> Result<()> {
    let repo = dir.sirens();

    match args.command {
        SirenCommands::List => {
            let sirens = repo.list().await?;
            if json {
                return print_json(&sirens);
            }
            for item in &sirens {
                let s = &item.siren;
                println!("{:>6}  №{} {}  {}", s.id, s.num_id, item.type_name, s.address);
                let owners = join_nonempty(&[&item.company_name, &item.contact_name]);
                if !owners.is_empty() {
                    println!("        {}", owners);
                }
            }
            Ok(())
        }
        SirenCommands::Show { id } => {
            let siren = repo.get(id).await?;
            if json {
                return print_json(&siren);
            }
            print_siren(&siren);
            Ok(())
        }
        SirenCommands::Add(fields) => {
            let mut siren = Siren::default();
            fields.apply(&mut siren);
            print_created("siren", repo.create(&siren).await?, json)
        }
        SirenCommands::Update { id, fields } => {
            let mut siren = repo.get(id).await?;
            siren.id = id;
            fields.apply(&mut siren);
            repo.update(&siren).await?;
            print_done(&format!("Updated siren #{}", id), json)
        }
        SirenCommands::Delete { id } => {
            repo.delete(id).await?;
            print_done(&format!("Deleted siren #{}", id), json)
        }
    }
}

fn print_siren(siren: &Siren) {
    println!("┌─ #{} №{} ({})", siren.id, siren.num_id, siren.num_pass);
    let rows = [
        ("address", siren.address.as_str()),
        ("radio", siren.radio.as_str()),
        ("desk", siren.desk.as_str()),
        ("latitude", siren.latitude.as_str()),
        ("longitude", siren.longitude.as_str()),
        ("own", siren.own.as_str()),
        ("note", siren.note.as_str()),
    ];
    for (label, value) in rows.iter().filter(|(_, v)| !v.is_empty()) {
        println!("│  {:<10} {}", format!("{}:", label), value);
    }
    for (label, id) in [
        ("type", siren.type_id),
        ("contact", siren.contact_id),
        ("company", siren.company_id),
        ("stage", siren.stage),
    ] {
        if id != 0 {
            println!("│  {:<10} {}", format!("{}:", label), id);
        }
    }
    println!("└─");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        fields: SirenFields,
    }

    #[test]
    fn omitted_fields_keep_stored_values() {
        let mut siren = Siren {
            num_id: 7,
            address: "ул. Мира, 3".into(),
            ..Siren::default()
        };
        let harness = Harness::parse_from(["siren", "--stage", "2", "--note", "замена"]);
        harness.fields.apply(&mut siren);

        assert_eq!(siren.num_id, 7);
        assert_eq!(siren.address, "ул. Мира, 3");
        assert_eq!(siren.stage, 2);
        assert_eq!(siren.note, "замена");
    }
}
