//! epdc CLI - contact directory for civil-defence duty records
//!
//! Entry point for the `epdc` binary:
//! - Schema bootstrap (`init`) and configuration management (`config`)
//! - Dictionaries: scopes, practice kinds, ranks, departments
//! - Posts, companies, contacts with their phones, faxes and emails
//! - Practices, education periods, sirens and siren types

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use epdc_core::DirectoryConfig;
use epdc_db::{DictionaryKind, Directory};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "epdc",
    author,
    version,
    about = "Contact directory backed by PostgreSQL",
    long_about = "Manage the companies, contacts, practices and sirens of a civil-defence \
                  contact directory stored in PostgreSQL."
)]
struct Cli {
    /// Print records as JSON (for piping to jq)
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces to an OTLP endpoint (needs the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect and create any missing tables
    Init,
    /// Manage epdc configuration (init, path, show, validate)
    Config(config::ConfigArgs),
    /// Fields of activity of companies
    Scope(commands::dictionary::DictionaryArgs),
    /// Kinds of practice
    Kind(commands::dictionary::DictionaryArgs),
    /// Contact ranks
    Rank(commands::dictionary::DictionaryArgs),
    /// Contact departments
    Department(commands::dictionary::DictionaryArgs),
    /// Job titles and civil-defence posts
    Post(commands::post::PostArgs),
    /// Companies with their phones, faxes and emails
    Company(commands::company::CompanyArgs),
    /// People with their phones, faxes and emails
    Contact(commands::contact::ContactArgs),
    /// Practices held by companies
    Practice(commands::practice::PracticeArgs),
    /// Education periods
    Education(commands::education::EducationArgs),
    /// Siren models and their radius
    SirenType(commands::siren_type::SirenTypeArgs),
    /// Installed sirens
    Siren(commands::siren::SirenArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let loaded = DirectoryConfig::load();
    let tracing_config = tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
        default_level: loaded
            .as_ref()
            .ok()
            .and_then(|c| c.logging.level.clone()),
    };
    if let Err(e) = tracing_setup::init(&tracing_config) {
        eprintln!("warning: logging disabled: {:#}", e);
    }

    let result = run(cli, loaded).await;
    tracing_setup::shutdown_otel();
    result
}

async fn run(cli: Cli, loaded: epdc_core::Result<DirectoryConfig>) -> Result<()> {
    let json = cli.json;

    // Commands that do not need a database
    let command = match cli.command {
        Commands::Config(args) => return config::run_config(args),
        Commands::Completions(args) => return run_completions(args),
        other => other,
    };

    let dir = commands::connect(&loaded?).await?;
    let result = dispatch(&dir, command, json).await;
    dir.close().await;
    result
}

async fn dispatch(dir: &Directory, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Init => commands::run_init(dir).await,
        Commands::Scope(args) => {
            commands::run_dictionary(dir, DictionaryKind::Scope, args, json).await
        }
        Commands::Kind(args) => {
            commands::run_dictionary(dir, DictionaryKind::Kind, args, json).await
        }
        Commands::Rank(args) => {
            commands::run_dictionary(dir, DictionaryKind::Rank, args, json).await
        }
        Commands::Department(args) => {
            commands::run_dictionary(dir, DictionaryKind::Department, args, json).await
        }
        Commands::Post(args) => commands::run_post(dir, args, json).await,
        Commands::Company(args) => commands::run_company(dir, args, json).await,
        Commands::Contact(args) => commands::run_contact(dir, args, json).await,
        Commands::Practice(args) => commands::run_practice(dir, args, json).await,
        Commands::Education(args) => commands::run_education(dir, args, json).await,
        Commands::SirenType(args) => commands::run_siren_type(dir, args, json).await,
        Commands::Siren(args) => commands::run_siren(dir, args, json).await,
        Commands::Config(_) | Commands::Completions(_) => Ok(()),
    }
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
