//! Export command implementation.
//!
//! Exports the user's full chat history regardless of any list filter.

use std::io::Write;
use std::path::PathBuf;

use serde_json::json;

use crate::cli::{Cli, ExportArgs, OutputFormat};
use crate::error::{Result, SidebarError};
use crate::export::{write_export, ExportFormat, ExportOptions};

use super::Context;

/// Run the export command.
pub fn run(cli: &Cli, args: &ExportArgs) -> Result<()> {
    let ctx = Context::load(cli)?;
    ctx.user_id()?;

    let format = match args.format {
        Some(format) => ExportFormat::from(format),
        None => ctx.config.export_format()?,
    };
    let options = ExportOptions::new(format).pretty(ctx.config.export.pretty && !args.compact);

    let chats = ctx.chats()?;
    let document = ctx.sidebar.export(&chats, &options)?;

    if args.stdout {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(document.contents.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| SidebarError::io("Failed to write export to stdout", e))?;
        return Ok(());
    }

    let dir = match &args.out {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| SidebarError::io("Failed to resolve current directory", e))?,
    };
    let path: PathBuf = write_export(&document, &dir)?;

    match cli.effective_output() {
        OutputFormat::Json => {
            let output = json!({
                "path": path.display().to_string(),
                "format": document.format,
                "chats": document.chat_count,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!(
                    "Exported {} chat{} to {}",
                    document.chat_count,
                    crate::util::plural(document.chat_count),
                    path.display()
                );
            }
        }
    }
    Ok(())
}
