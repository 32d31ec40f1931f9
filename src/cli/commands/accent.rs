//! Accent command implementation.

use serde_json::json;

use crate::cli::{AccentArgs, Cli, OutputFormat};
use crate::error::Result;
use crate::theme::AccentColor;

use super::{paint, Context};

/// Run the accent command: show the accent and palette, or set a new one.
pub fn run(cli: &Cli, args: &AccentArgs) -> Result<()> {
    let mut ctx = Context::load(cli)?;

    if let Some(color) = &args.color {
        ctx.user_id()?;
        let accent = ctx.sidebar.set_accent(color)?;
        match cli.effective_output() {
            OutputFormat::Json => println!("{}", json!({ "accent": accent })),
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("Accent set to {}", ctx.paint(accent.as_str()));
                }
            }
        }
        return Ok(());
    }

    let current = ctx.sidebar.accent().get();
    match cli.effective_output() {
        OutputFormat::Json => {
            let output = json!({ "accent": current, "palette": AccentColor::palette() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("{}", ctx.paint(current.as_str()));
            if !cli.quiet {
                println!();
                println!("Palette:");
                for preset in AccentColor::palette() {
                    let marker = if preset == current { "*" } else { " " };
                    let swatch = if ctx.color_enabled() {
                        paint(preset.as_str(), &preset)
                    } else {
                        preset.to_string()
                    };
                    println!("  {marker} {swatch}");
                }
            }
        }
    }
    Ok(())
}
