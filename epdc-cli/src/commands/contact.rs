//! Contact commands

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use epdc_db::{Contact, ContactListItem, Directory, Owner};

use super::company::ChannelArgs;
use super::{join_nonempty, parse_date_arg, print_created, print_done, print_json, print_select};

#[derive(Parser, Debug)]
pub struct ContactArgs {
    #[command(subcommand)]
    pub command: ContactCommands,
}

#[derive(Subcommand, Debug)]
pub enum ContactCommands {
    /// List contacts with company, department, post, phones and faxes
    List,
    /// List `id name` pairs
    Select,
    /// Show one contact with emails, phones and faxes
    Show {
        /// Contact ID
        id: i64,
    },
    /// List the staff of one company
    ByCompany {
        /// Company ID
        company_id: i64,
    },
    /// Add a contact
    Add(ContactFields),
    /// Change a contact; omitted options keep their stored values
    Update {
        /// Contact ID
        id: i64,
        #[command(flatten)]
        fields: ContactFields,
    },
    /// Delete a contact with its phones and emails
    Delete {
        /// Contact ID
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct ContactFields {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,
    /// Employer company ID
    #[arg(long)]
    pub company_id: Option<i64>,
    /// Department ID
    #[arg(long)]
    pub department_id: Option<i64>,
    /// Post ID
    #[arg(long)]
    pub post_id: Option<i64>,
    /// Civil-defence post ID
    #[arg(long)]
    pub post_go_id: Option<i64>,
    /// Rank ID
    #[arg(long)]
    pub rank_id: Option<i64>,
    /// Birthday, dd.mm.yyyy
    #[arg(long, value_parser = parse_date_arg)]
    pub birthday: Option<String>,
    /// Free-form note
    #[arg(long)]
    pub note: Option<String>,
    #[command(flatten)]
    pub channels: ChannelArgs,
}

impl ContactFields {
    fn apply(self, contact: &mut Contact) {
        if let Some(name) = self.name {
            contact.name = name;
        }
        if let Some(id) = self.company_id {
            contact.company_id = id;
        }
        if let Some(id) = self.department_id {
            contact.department_id = id;
        }
        if let Some(id) = self.post_id {
            contact.post_id = id;
        }
        if let Some(id) = self.post_go_id {
            contact.post_go_id = id;
        }
        if let Some(id) = self.rank_id {
            contact.rank_id = id;
        }
        if let Some(birthday) = self.birthday {
            contact.birthday = birthday;
        }
        if let Some(note) = self.note {
            contact.note = note;
        }
        self.channels
            .apply(&mut contact.emails, &mut contact.phones, &mut contact.faxes);
    }
}

pub async fn run_contact(dir: &Directory, args: ContactArgs, json: bool) -> Result<()> {
    let repo = dir.contacts();

    match args.command {
        ContactCommands::List => {
            let contacts = repo.list().await?;
            if json {
                return print_json(&contacts);
            }
            for contact in &contacts {
                print_list_item(contact);
            }
            Ok(())
        }
        ContactCommands::Select => print_select(&repo.select().await?, json),
        ContactCommands::Show { id } => {
            let contact = repo.get(id).await?;
            if json {
                return print_json(&contact);
            }
            print_contact(&contact);
            Ok(())
        }
        ContactCommands::ByCompany { company_id } => {
            let staff = repo.list_by_company(company_id).await?;
            if json {
                return print_json(&staff);
            }
            for person in &staff {
                let posts = join_nonempty(&[
                    &person.department_name,
                    &person.post_name,
                    &person.post_go_name,
                ]);
                println!("{:>6}  {}  {}", person.id, person.name, posts);
            }
            Ok(())
        }
        ContactCommands::Add(fields) => {
            let mut contact = Contact::default();
            fields.apply(&mut contact);
            print_created("contact", repo.create(&contact).await?, json)
        }
        ContactCommands::Update { id, fields } => {
            let mut contact = repo.get(id).await?;
            contact.id = id;
            contact.emails = dir.emails().list_for(Owner::Contact(id)).await?;
            fields.apply(&mut contact);
            repo.update(&contact).await?;
            print_done(&format!("Updated contact #{}", id), json)
        }
        ContactCommands::Delete { id } => {
            repo.delete(id).await?;
            print_done(&format!("Deleted contact #{}", id), json)
        }
    }
}

fn print_list_item(contact: &ContactListItem) {
    println!("{:>6}  {}", contact.id, contact.name);
    let details = join_nonempty(&[
        &contact.company_name,
        &contact.department_name,
        &contact.post_name,
    ]);
    if !details.is_empty() {
        println!("        {}", details);
    }
    if !contact.phones.is_empty() {
        println!("        phones: {}", contact.phones.join(", "));
    }
    if !contact.faxes.is_empty() {
        println!("        faxes: {}", contact.faxes.join(", "));
    }
}

fn print_contact(contact: &Contact) {
    println!("┌─ #{} {}", contact.id, contact.name);
    let refs = [
        ("company", contact.company_id),
        ("department", contact.department_id),
        ("post", contact.post_id),
        ("go post", contact.post_go_id),
        ("rank", contact.rank_id),
    ];
    for (label, id) in refs.iter().filter(|(_, id)| *id != 0) {
        println!("│  {:<11} #{}", format!("{}:", label), id);
    }
    if !contact.birthday.is_empty() {
        println!("│  {:<11} {}", "birthday:", contact.birthday);
    }
    for email in &contact.emails {
        println!("│  {:<11} {}", "email:", email.email);
    }
    for phone in &contact.phones {
        println!("│  {:<11} {}", "phone:", phone.phone);
    }
    for fax in &contact.faxes {
        println!("│  {:<11} {}", "fax:", fax.phone);
    }
    if !contact.note.is_empty() {
        println!("│  {:<11} {}", "note:", contact.note);
    }
    println!("└─");
}
