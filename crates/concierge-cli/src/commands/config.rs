use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use concierge_config::ConciergeConfig;

use crate::cli::ConfigCommands;

/// Execute config subcommand
pub async fn execute(config: &ConciergeConfig, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Init { path, force } => init(path, force),
        ConfigCommands::Show { format } => show(config, &format),
    }
}

/// Initialize a new config file
pub fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = match path {
        Some(path) => path,
        None => ConciergeConfig::default_config_path()
            .context("Could not determine config file path")?,
    };

    if config_path.exists() && !force {
        println!(
            "{} Config file already exists at: {}",
            "Error:".red().bold(),
            config_path.display()
        );
        println!("Use {} to overwrite", "--force".yellow());
        return Ok(());
    }

    ConciergeConfig::create_example(&config_path)?;

    println!(
        "{} Created config file at: {}",
        "Success:".green().bold(),
        config_path.display()
    );
    println!(
        "\n{}",
        "Edit this file to point the client at your concierge backend.".dimmed()
    );
    Ok(())
}

/// Show the current effective configuration
fn show(config: &ConciergeConfig, format: &str) -> Result<()> {
    let rendered = match format {
        "json" => config.display_as_json()?,
        _ => config.display_as_toml()?,
    };
    println!("{}", rendered);
    Ok(())
}
