//! List command implementation.
//!
//! Prints the sidebar view: pinned chats, then the rest, filtered by an
//! optional title query.

use serde_json::json;

use crate::chat::Chat;
use crate::cli::{Cli, ListArgs, OutputFormat};
use crate::error::Result;
use crate::projection::PinnedOrder;
use crate::sidebar::HEADLINE;
use crate::util::{short_id, truncate};

use super::Context;

/// Run the list command.
pub fn run(cli: &Cli, args: &ListArgs) -> Result<()> {
    let mut ctx = Context::load(cli)?;

    if let Some(query) = &args.query {
        ctx.sidebar.set_query(query.clone());
    }
    if args.source_order {
        ctx.sidebar.set_pinned_order(PinnedOrder::SourceOrder);
    }

    let chats = ctx.chats()?;
    let view = ctx.sidebar.view(&chats);

    if cli.effective_output() == OutputFormat::Json {
        let limit = args.limit.unwrap_or(usize::MAX);
        let output = json!({
            "user": ctx.sidebar.user().map(|u| u.id.as_str()),
            "role": ctx.sidebar.role(),
            "query": ctx.sidebar.query(),
            "accent": ctx.sidebar.accent().get(),
            "Pinned": view.pinned.iter().take(limit).collect::<Vec<_>>(),
            "General": view.general.iter().take(limit).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let Some(user) = ctx.sidebar.user() else {
        println!("{HEADLINE}");
        if !cli.quiet {
            println!("Sign in with --user <id> to see your chats.");
        }
        return Ok(());
    };

    if !cli.quiet {
        let name = user.name.as_deref().unwrap_or(&user.id);
        println!(
            "[{}] {} ({})",
            user.initials(),
            name,
            ctx.paint(ctx.sidebar.role().as_str())
        );
        println!();
    }

    if view.is_empty() {
        if chats.is_empty() {
            println!("{HEADLINE}");
        } else {
            println!("No chats match '{}'.", ctx.sidebar.query());
        }
        return Ok(());
    }

    let full_ids = args.full_ids || ctx.config.display.full_ids;
    let width = ctx.config.display.preview_width;

    for (label, group) in view.iter() {
        if group.is_empty() {
            continue;
        }
        println!("{}", ctx.paint(&format!("{label} ({})", group.len())));
        let shown = args.limit.unwrap_or(group.len()).min(group.len());
        for chat in &group[..shown] {
            println!("  {}", format_row(chat, full_ids, width));
        }
        if shown < group.len() {
            println!("  … {} more", group.len() - shown);
        }
        println!();
    }

    Ok(())
}

/// One list line: id, title and preview.
fn format_row(chat: &Chat, full_ids: bool, preview_width: usize) -> String {
    let id = if full_ids { chat.id.as_str() } else { short_id(&chat.id) };
    format!(
        "{:<8}  {:<32}  {}",
        id,
        truncate(&chat.title, 32),
        truncate(chat.preview(), preview_width)
    )
}
