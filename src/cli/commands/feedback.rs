//! Feedback command implementation.

use serde_json::json;

use crate::cli::{Cli, FeedbackArgs, OutputFormat};
use crate::error::Result;
use crate::feedback::{FeedbackDraft, FeedbackLog};

use super::Context;

/// Run the feedback command.
pub fn run(cli: &Cli, args: &FeedbackArgs) -> Result<()> {
    let ctx = Context::load(cli)?;
    let user_id = ctx.user_id()?;

    let feedback = FeedbackDraft::new(args.text.clone())
        .with_category(args.category.into())
        .submit(&user_id)?;
    FeedbackLog::in_dir(&ctx.data_dir).append(&feedback)?;

    match cli.effective_output() {
        OutputFormat::Json => {
            println!("{}", json!({ "id": feedback.id, "category": feedback.category }));
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("Thanks for the feedback! ({})", feedback.id);
            }
        }
    }
    Ok(())
}
