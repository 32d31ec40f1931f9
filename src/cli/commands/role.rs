//! Role command implementation.

use serde_json::json;

use crate::cli::{Cli, OutputFormat, RoleArgs};
use crate::error::Result;
use crate::identity::Role;

use super::Context;

/// Run the role command: show, override or reset the role badge.
pub fn run(cli: &Cli, args: &RoleArgs) -> Result<()> {
    let mut ctx = Context::load(cli)?;

    if args.reset {
        ctx.user_id()?;
        ctx.sidebar.clear_role()?;
    } else if let Some(name) = &args.role {
        ctx.user_id()?;
        let role: Role = name.parse()?;
        ctx.sidebar.set_role(role)?;
    }

    let role = ctx.sidebar.role();
    match cli.effective_output() {
        OutputFormat::Json => {
            let output = json!({
                "role": role,
                "override": ctx.sidebar.has_role_override(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("{}", ctx.paint(role.as_str()));
            if !cli.quiet && args.role.is_none() && !args.reset {
                let options: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
                println!("Available: {}", options.join(", "));
            }
        }
    }
    Ok(())
}
