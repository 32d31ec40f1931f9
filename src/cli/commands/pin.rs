//! Pin command implementation.

use serde_json::json;

use crate::cli::{Cli, OutputFormat, PinArgs};
use crate::error::Result;

use super::{resolve_chat, Context};

/// Run the pin command: pin an unpinned chat, unpin a pinned one.
pub fn run(cli: &Cli, args: &PinArgs) -> Result<()> {
    let mut ctx = Context::load(cli)?;
    ctx.user_id()?;

    let chats = ctx.chats()?;
    let chat = resolve_chat(&chats, &args.chat)?;
    let outcome = ctx.sidebar.toggle_pin(&chat.id)?;

    match cli.effective_output() {
        OutputFormat::Json => {
            let output = json!({
                "chat": chat.id,
                "pinned": ctx.sidebar.is_pinned(&chat.id),
                "message": outcome.message(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}: {}", outcome.message(), chat.title);
            }
        }
    }
    Ok(())
}
