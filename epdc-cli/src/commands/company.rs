//! Company commands
//!
//! ```bash
//! epdc company add --name "ООО Ромашка" --scope-id 2 \
//!     --phone 4951112233 --phone 4954445566 --fax 4957778899 \
//!     --email info@romashka.ru
//! epdc company list --json | jq '.[] | {name, phones}'
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use epdc_db::{Company, CompanyListItem, Directory, Email, Owner, Phone};

use super::{join_nonempty, print_created, print_done, print_json, print_select};

#[derive(Parser, Debug)]
pub struct CompanyArgs {
    #[command(subcommand)]
    pub command: CompanyCommands,
}

#[derive(Subcommand, Debug)]
pub enum CompanyCommands {
    /// List companies with scope, phones, faxes and practice dates
    List,
    /// List `id name` pairs
    Select,
    /// Show one company with its emails, phones, faxes and practices
    Show {
        /// Company ID
        id: i64,
    },
    /// Add a company
    Add(CompanyFields),
    /// Change a company; omitted options keep their stored values
    Update {
        /// Company ID
        id: i64,
        #[command(flatten)]
        fields: CompanyFields,
    },
    /// Delete a company with its phones and emails
    Delete {
        /// Company ID
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct CompanyFields {
    /// Company name
    #[arg(long)]
    pub name: Option<String>,
    /// Postal address
    #[arg(long)]
    pub address: Option<String>,
    /// Scope (field of activity) ID
    #[arg(long)]
    pub scope_id: Option<i64>,
    /// Free-form note
    #[arg(long)]
    pub note: Option<String>,
    #[command(flatten)]
    pub channels: ChannelArgs,
}

/// Phones, faxes and emails of a company or contact
#[derive(Args, Debug, Default)]
pub struct ChannelArgs {
    /// Phone number, digits only (repeatable)
    #[arg(long = "phone", value_name = "NUMBER")]
    pub phones: Vec<i64>,
    /// Fax number, digits only (repeatable)
    #[arg(long = "fax", value_name = "NUMBER")]
    pub faxes: Vec<i64>,
    /// Email address (repeatable)
    #[arg(long = "email", value_name = "ADDRESS")]
    pub emails: Vec<String>,
    /// Remove every phone, fax and email not given on this command line
    #[arg(long)]
    pub replace_channels: bool,
}

impl ChannelArgs {
    /// Merge into stored channels: a kind given on the command line (or
    /// `--replace-channels`) replaces the stored list, others are kept.
    pub fn apply(
        self,
        emails: &mut Vec<Email>,
        phones: &mut Vec<Phone>,
        faxes: &mut Vec<Phone>,
    ) {
        if self.replace_channels || !self.emails.is_empty() {
            *emails = self.emails.into_iter().map(Email::new).collect();
        }
        if self.replace_channels || !self.phones.is_empty() {
            *phones = self.phones.into_iter().map(|n| Phone::new(n, false)).collect();
        }
        if self.replace_channels || !self.faxes.is_empty() {
            *faxes = self.faxes.into_iter().map(|n| Phone::new(n, true)).collect();
        }
    }
}

pub async fn run_company(dir: &Directory, args: CompanyArgs, json: bool) -> Result<()> {
    let repo = dir.companies();

    match args.command {
        CompanyCommands::List => {
            let companies = repo.list().await?;
            if json {
                return print_json(&companies);
            }
            for company in &companies {
                print_list_item(company);
            }
            Ok(())
        }
        CompanyCommands::Select => print_select(&repo.select().await?, json),
        CompanyCommands::Show { id } => {
            let company = repo.get(id).await?;
            if json {
                return print_json(&company);
            }
            print_company(&company);
            Ok(())
        }
        CompanyCommands::Add(fields) => {
            let mut company = Company::default();
            fields.apply(&mut company);
            print_created("company", repo.create(&company).await?, json)
        }
        CompanyCommands::Update { id, fields } => {
            let mut company = repo.get(id).await?;
            company.id = id;
            // Stored emails with their notes, not the bare aggregate
            company.emails = dir.emails().list_for(Owner::Company(id)).await?;
            fields.apply(&mut company);
            repo.update(&company).await?;
            print_done(&format!("Updated company #{}", id), json)
        }
        CompanyCommands::Delete { id } => {
            repo.delete(id).await?;
            print_done(&format!("Deleted company #{}", id), json)
        }
    }
}

impl CompanyFields {
    fn apply(self, company: &mut Company) {
        if let Some(name) = self.name {
            company.name = name;
        }
        if let Some(address) = self.address {
            company.address = address;
        }
        if let Some(scope_id) = self.scope_id {
            company.scope_id = scope_id;
        }
        if let Some(note) = self.note {
            company.note = note;
        }
        self.channels
            .apply(&mut company.emails, &mut company.phones, &mut company.faxes);
    }
}

fn print_list_item(company: &CompanyListItem) {
    println!("{:>6}  {}", company.id, company.name);
    let details = join_nonempty(&[&company.scope_name, &company.address]);
    if !details.is_empty() {
        println!("        {}", details);
    }
    if !company.phones.is_empty() {
        println!("        phones: {}", company.phones.join(", "));
    }
    if !company.faxes.is_empty() {
        println!("        faxes: {}", company.faxes.join(", "));
    }
    if !company.practices.is_empty() {
        println!("        practices: {}", company.practices.join(", "));
    }
}

fn print_company(company: &Company) {
    println!("┌─ #{} {}", company.id, company.name);
    if !company.address.is_empty() {
        println!("│  address:  {}", company.address);
    }
    if company.scope_id != 0 {
        println!("│  scope:    #{}", company.scope_id);
    }
    for email in &company.emails {
        println!("│  email:    {}", email.email);
    }
    for phone in &company.phones {
        println!("│  phone:    {}", phone.phone);
    }
    for fax in &company.faxes {
        println!("│  fax:      {}", fax.phone);
    }
    for practice in &company.practices {
        println!("│  practice: {}", practice.date_str);
    }
    if !company.note.is_empty() {
        println!("│  note:     {}", company.note);
    }
    println!("└─");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_replace_only_given_kinds() {
        let mut emails = vec![Email::new("old@romashka.ru")];
        let mut phones = vec![Phone::new(1, false)];
        let mut faxes = vec![Phone::new(2, true)];

        ChannelArgs {
            phones: vec![3, 4],
            ..ChannelArgs::default()
        }
        .apply(&mut emails, &mut phones, &mut faxes);

        assert_eq!(emails.len(), 1);
        assert_eq!(phones.iter().map(|p| p.phone).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(faxes[0].phone, 2);
    }

    #[test]
    fn replace_channels_clears_unlisted_kinds() {
        let mut emails = vec![Email::new("old@romashka.ru")];
        let mut phones = vec![Phone::new(1, false)];
        let mut faxes = vec![Phone::new(2, true)];

        ChannelArgs {
            faxes: vec![5],
            replace_channels: true,
            ..ChannelArgs::default()
        }
        .apply(&mut emails, &mut phones, &mut faxes);

        assert!(emails.is_empty());
        assert!(phones.is_empty());
        assert!(faxes[0].fax);
    }
}
