//! sidebar: command-line front end for the chat history sidebar.

use std::process::ExitCode;

use chat_sidebar::cli;

fn main() -> ExitCode {
    // Logging is initialized by cli::run from --log-level and --log-format
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");

            if std::env::var("RUST_BACKTRACE").is_ok() {
                if let Some(source) = std::error::Error::source(&e) {
                    eprintln!("Caused by: {source}");
                }
            }

            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
