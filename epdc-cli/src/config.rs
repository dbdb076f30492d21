use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use epdc_core::DirectoryConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a default config file
    Init(InitArgs),
    /// Show config file path
    Path,
    /// Show the effective config (password masked)
    Show,
    /// Check that the config is complete enough to connect
    Validate,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
        ConfigCommands::Validate => run_validate(),
    }
}

fn run_init(args: InitArgs) -> Result<()> {
    let config_path = DirectoryConfig::config_path();

    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    DirectoryConfig::default()
        .save_to(&config_path)
        .context(format!("Failed to write config file: {:?}", config_path))?;

    println!("✅ Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Set [database] name, user and password (or url)");
    println!("  3. Run: epdc config validate");

    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", DirectoryConfig::config_path().display());
    Ok(())
}

fn run_show() -> Result<()> {
    let config = DirectoryConfig::load()?;
    println!("{}", config.to_redacted_toml()?);
    Ok(())
}

fn run_validate() -> Result<()> {
    println!("🔍 Validating configuration...");

    let config = DirectoryConfig::load()?;
    println!("   ✓ Config loaded from {}", DirectoryConfig::config_path().display());

    config.database.validate()?;
    if config.database.url.is_some() {
        println!("   ✓ database.url is set");
    } else {
        println!(
            "   ✓ database {}@{}:{}/{}",
            config.database.user, config.database.host, config.database.port, config.database.name
        );
    }

    if config.database.password.is_empty() && config.database.url.is_none() {
        println!("   ⚠ database.password is empty");
    }

    println!("\n✅ Configuration valid!");
    Ok(())
}
