//! Config command implementation.
//!
//! View and initialize chat-sidebar configuration.

use std::path::PathBuf;

use crate::cli::{Cli, ConfigAction, ConfigArgs, OutputFormat};
use crate::config::{default_config_path, Config};
use crate::error::{Result, SidebarError};

use super::load_config;

/// Run the config command.
pub fn run(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli),
        ConfigAction::Get { key } => get_config_value(cli, key),
        ConfigAction::Path => show_config_path(cli),
        ConfigAction::Init { force } => init_config(cli, *force),
    }
}

fn config_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => default_config_path(),
    }
}

/// Show full configuration.
fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match cli.effective_output() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Text => {
            println!("Sidebar Configuration");
            println!("=====================\n");

            println!("[storage]");
            match &config.storage.data_dir {
                Some(dir) => println!("  data_dir = \"{}\"", dir.display()),
                None => println!("  data_dir = # not set (platform default)"),
            }
            println!();

            println!("[appearance]");
            println!("  default_accent = \"{}\"", config.appearance.default_accent);
            println!();

            println!("[export]");
            println!("  format = \"{}\"", config.export.format);
            println!("  pretty = {}", config.export.pretty);
            println!();

            println!("[display]");
            println!("  full_ids = {}", config.display.full_ids);
            println!("  preview_width = {}", config.display.preview_width);
        }
    }

    Ok(())
}

/// Get a specific configuration value.
fn get_config_value(cli: &Cli, key: &str) -> Result<()> {
    let config = load_config(cli)?;

    let value = match key {
        "storage.data_dir" => config.data_dir()?.display().to_string(),
        _ => config.get(key).ok_or_else(|| SidebarError::ConfigError {
            message: format!("Unknown configuration key: {key}"),
        })?,
    };

    match cli.effective_output() {
        OutputFormat::Json => println!("{}", serde_json::json!({ key: value })),
        OutputFormat::Text => println!("{value}"),
    }

    Ok(())
}

/// Show configuration file path.
fn show_config_path(cli: &Cli) -> Result<()> {
    let path = config_path(cli)?;

    match cli.effective_output() {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({ "path": path.display().to_string(), "exists": path.exists() })
            );
        }
        OutputFormat::Text => {
            println!("{}", path.display());
            if !path.exists() && !cli.quiet {
                println!("(file does not exist, using defaults)");
            }
        }
    }

    Ok(())
}

/// Write a default configuration file.
fn init_config(cli: &Cli, force: bool) -> Result<()> {
    let path = config_path(cli)?;

    if path.exists() && !force {
        return Err(SidebarError::ConfigError {
            message: format!(
                "Configuration file already exists: {} (use --force to overwrite)",
                path.display()
            ),
        });
    }

    Config::default().save_to(&path)?;
    if !cli.quiet {
        println!("Created configuration file: {}", path.display());
    }
    Ok(())
}
