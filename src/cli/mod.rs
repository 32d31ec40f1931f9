//! Command-line interface for chat-sidebar.
//!
//! A scriptable front end over the sidebar core:
//! - `list`: show the pinned/general chat list, optionally filtered
//! - `new`, `pin`, `delete`, `clear`: manage chats
//! - `export`: write the full history to a file
//! - `accent`, `role`: workspace settings
//! - `feedback`: submit feedback

mod commands;

pub use commands::*;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use crate::error::Result;
use crate::export::ExportFormat;
use crate::feedback::FeedbackCategory;

/// Chat history sidebar: search, pin, export and clear conversations.
#[derive(Debug, Parser)]
#[command(name = "sidebar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Signed-in user id (preference namespace and chat owner).
    #[arg(short = 'u', long, global = true, env = "SIDEBAR_USER")]
    pub user: Option<String>,

    /// Display name of the signed-in user.
    #[arg(long, global = true, env = "SIDEBAR_USER_NAME")]
    pub user_name: Option<String>,

    /// Data directory for chats, preferences and feedback.
    #[arg(short = 'd', long, global = true, env = "SIDEBAR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output format for structured data.
    #[arg(short = 'o', long, global = true, default_value = "text", env = "SIDEBAR_OUTPUT")]
    pub output: OutputFormat,

    /// Output as JSON (shorthand for -o json).
    #[arg(long, global = true, env = "SIDEBAR_JSON")]
    pub json: bool,

    /// Suppress non-essential output.
    #[arg(short = 'q', long, global = true, env = "SIDEBAR_QUIET")]
    pub quiet: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "SIDEBAR_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (text, json, compact, pretty).
    #[arg(long, global = true, default_value = "text", env = "SIDEBAR_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Path to custom configuration file.
    #[arg(long, global = true, env = "SIDEBAR_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Structured JSON format for machine consumption.
    Json,
    /// Compact single-line format.
    Compact,
    /// Pretty format with full details.
    Pretty,
}

impl LogLevel {
    /// Convert to tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Cli {
    /// Get effective output format.
    #[must_use]
    pub fn effective_output(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }
}

/// Output format for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the chat list, pinned chats first.
    #[command(alias = "ls")]
    List(ListArgs),

    /// Start a new chat.
    New(NewArgs),

    /// Pin or unpin a chat.
    Pin(PinArgs),

    /// Delete one chat.
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Delete every chat (asks for DELETE confirmation).
    Clear(ClearArgs),

    /// Export the full chat history.
    #[command(alias = "x")]
    Export(ExportArgs),

    /// Show or set the accent color.
    Accent(AccentArgs),

    /// Show or override the role badge.
    Role(RoleArgs),

    /// Submit feedback.
    Feedback(FeedbackArgs),

    /// View configuration.
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Case-insensitive title filter.
    pub query: Option<String>,

    /// Limit number of chats per group.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Show full ids instead of short ids.
    #[arg(long)]
    pub full_ids: bool,

    /// Order pinned chats as they appear in the history rather than by pin time.
    #[arg(long)]
    pub source_order: bool,
}

/// Arguments for the new command.
#[derive(Debug, Parser)]
pub struct NewArgs {
    /// Chat title.
    pub title: String,

    /// Initial message, used as the preview.
    #[arg(short = 'm', long)]
    pub message: Option<String>,
}

/// Arguments for the pin command.
#[derive(Debug, Parser)]
pub struct PinArgs {
    /// Chat id (a unique prefix is enough).
    pub chat: String,
}

/// Arguments for the delete command.
#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Chat id (a unique prefix is enough).
    pub chat: String,
}

/// Arguments for the clear command.
#[derive(Debug, Parser)]
pub struct ClearArgs {
    /// Confirmation text; must be exactly DELETE. Prompts when omitted.
    #[arg(long)]
    pub confirm: Option<String>,
}

/// Export format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    /// JSON envelope.
    Json,
    /// Markdown document.
    #[value(alias = "md")]
    Markdown,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Markdown => ExportFormat::Markdown,
        }
    }
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Output format (default from config).
    #[arg(short = 'f', long)]
    pub format: Option<ExportFormatArg>,

    /// Directory to write the export into (default: current directory).
    #[arg(long, conflicts_with = "stdout")]
    pub out: Option<PathBuf>,

    /// Write to stdout instead of a file.
    #[arg(long)]
    pub stdout: bool,

    /// Compact JSON.
    #[arg(long)]
    pub compact: bool,
}

/// Arguments for the accent command.
#[derive(Debug, Parser)]
pub struct AccentArgs {
    /// New accent color (#rrggbb). Shows the current accent and palette when omitted.
    pub color: Option<String>,
}

/// Arguments for the role command.
#[derive(Debug, Parser)]
pub struct RoleArgs {
    /// Role to set (Member, Admin, Owner). Shows the current role when omitted.
    #[arg(conflicts_with = "reset")]
    pub role: Option<String>,

    /// Remove the override and use the provider's role.
    #[arg(long)]
    pub reset: bool,
}

/// Feedback category argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FeedbackCategoryArg {
    /// Something is broken.
    Bug,
    /// Feature request.
    Idea,
    /// Anything else.
    #[default]
    Other,
}

impl From<FeedbackCategoryArg> for FeedbackCategory {
    fn from(arg: FeedbackCategoryArg) -> Self {
        match arg {
            FeedbackCategoryArg::Bug => FeedbackCategory::Bug,
            FeedbackCategoryArg::Idea => FeedbackCategory::Idea,
            FeedbackCategoryArg::Other => FeedbackCategory::Other,
        }
    }
}

/// Arguments for the feedback command.
#[derive(Debug, Parser)]
pub struct FeedbackArgs {
    /// Feedback text.
    pub text: String,

    /// Category.
    #[arg(short = 'c', long, default_value = "other")]
    pub category: FeedbackCategoryArg,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Config action to perform.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommand actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show all configuration values.
    Show,

    /// Get a specific configuration value.
    Get {
        /// Configuration key (e.g., "display.full_ids").
        key: String,
    },

    /// Show configuration file path.
    Path,

    /// Initialize configuration file with defaults.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Arguments for the completions command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    Powershell,
    /// Elvish shell.
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completions and print to stdout.
pub fn generate_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, "sidebar", &mut io::stdout());
}

/// Stderr layer for the chosen log format.
fn log_layer<S>(format: LogFormat) -> Box<dyn tracing_subscriber::Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    use tracing_subscriber::{fmt, Layer};

    let layer = fmt::layer().with_writer(io::stderr);
    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().with_current_span(false).boxed(),
        LogFormat::Compact => layer.compact().with_target(false).boxed(),
        LogFormat::Pretty => layer.pretty().without_time().boxed(),
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `--log-level`.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_filter_string()));

    if let Err(e) = tracing_subscriber::registry()
        .with(log_layer(cli.log_format))
        .with(filter)
        .try_init()
    {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli);

    match &cli.command {
        Commands::List(args) => commands::list::run(&cli, args),
        Commands::New(args) => commands::new::run(&cli, args),
        Commands::Pin(args) => commands::pin::run(&cli, args),
        Commands::Delete(args) => commands::delete::run(&cli, args),
        Commands::Clear(args) => commands::clear::run(&cli, args),
        Commands::Export(args) => commands::export::run(&cli, args),
        Commands::Accent(args) => commands::accent::run(&cli, args),
        Commands::Role(args) => commands::role::run(&cli, args),
        Commands::Feedback(args) => commands::feedback::run(&cli, args),
        Commands::Config(args) => commands::config::run(&cli, args),
        Commands::Completions(args) => {
            generate_completions(args.shell);
            Ok(())
        }
    }
}
