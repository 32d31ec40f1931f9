//! Clear command implementation.
//!
//! Deletes the user's whole history. The confirmation word comes from
//! `--confirm` or, on a terminal, from a prompt; anything other than the
//! exact word leaves every chat in place.

use std::io::IsTerminal;

use dialoguer::{theme::ColorfulTheme, Input};
use tracing::debug;

use crate::cli::{Cli, ClearArgs, OutputFormat};
use crate::error::{Result, SidebarError, CLEAR_CONFIRMATION};

use super::Context;

/// Run the clear command.
pub fn run(cli: &Cli, args: &ClearArgs) -> Result<()> {
    let mut ctx = Context::load(cli)?;
    ctx.user_id()?;

    if args.confirm.as_deref().is_some_and(|word| word != CLEAR_CONFIRMATION) {
        return Err(SidebarError::ConfirmationMismatch {
            expected: CLEAR_CONFIRMATION,
        });
    }

    let chats = ctx.chats()?;
    if chats.is_empty() {
        if !cli.quiet && cli.effective_output() == OutputFormat::Text {
            println!("No chats to delete.");
        }
        return Ok(());
    }

    let confirmation = match &args.confirm {
        Some(word) => word.clone(),
        None => prompt_confirmation(chats.len())?,
    };

    let report = ctx
        .runtime
        .block_on(ctx.sidebar.clear_all(&ctx.store, &chats, &confirmation))?;
    debug!(?report, "clear finished");

    match cli.effective_output() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            if !cli.quiet || !report.is_complete() {
                println!("{}", report.summary());
            }
            for failure in &report.failed {
                eprintln!("  {}: {}", failure.chat_id, failure.message);
            }
        }
    }

    match report.failed.first() {
        Some(first) => Err(SidebarError::delete_failed(
            first.chat_id.clone(),
            format!("{} of {} deletes failed", report.failed.len(), report.attempted),
        )),
        None => Ok(()),
    }
}

/// Ask for the confirmation word on an interactive terminal.
fn prompt_confirmation(count: usize) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        return Err(SidebarError::InvalidArgument {
            name: "confirm".to_string(),
            reason: format!("pass --confirm {CLEAR_CONFIRMATION} when not running interactively"),
        });
    }

    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "This deletes {count} chat{}. Type {CLEAR_CONFIRMATION} to confirm",
            crate::util::plural(count)
        ))
        .allow_empty(true)
        .interact_text()
        .map_err(|e| SidebarError::io("Failed to read confirmation", std::io::Error::other(e)))
}
