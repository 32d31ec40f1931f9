//! New command implementation.

use serde_json::json;
use uuid::Uuid;

use crate::chat::Chat;
use crate::cli::{Cli, NewArgs, OutputFormat};
use crate::error::{Result, SidebarError};
use crate::util::short_id;

use super::Context;

/// Run the new command.
pub fn run(cli: &Cli, args: &NewArgs) -> Result<()> {
    let ctx = Context::load(cli)?;
    let user_id = ctx.user_id()?;

    let title = args.title.trim();
    if title.is_empty() {
        return Err(SidebarError::InvalidArgument {
            name: "title".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let mut chat = Chat::new(Uuid::new_v4().to_string(), title);
    if let Some(message) = args.message.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        chat = chat.with_last_message(message);
    }

    ctx.runtime.block_on(ctx.store.insert(&user_id, chat.clone()))?;

    match cli.effective_output() {
        OutputFormat::Json => {
            let output = json!({ "chat": chat, "route": chat.route() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if cli.quiet {
                println!("{}", chat.id);
            } else {
                println!("Created {} {}", ctx.paint(short_id(&chat.id)), chat.title);
            }
        }
    }
    Ok(())
}
