//! Delete command implementation.

use serde_json::json;

use crate::cli::{Cli, DeleteArgs, OutputFormat};
use crate::error::Result;

use super::{resolve_chat, Context};

/// Run the delete command.
pub fn run(cli: &Cli, args: &DeleteArgs) -> Result<()> {
    let mut ctx = Context::load(cli)?;
    ctx.user_id()?;

    let chats = ctx.chats()?;
    let chat = resolve_chat(&chats, &args.chat)?;
    ctx.runtime
        .block_on(ctx.sidebar.delete_chat(&ctx.store, &chat.id))?;

    match cli.effective_output() {
        OutputFormat::Json => {
            let output = json!({ "deleted": chat.id });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("Deleted: {}", chat.title);
            }
        }
    }
    Ok(())
}
