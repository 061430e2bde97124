use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the panel-sections binary.
#[derive(Debug, Parser)]
#[command(
    name = "panel-sections",
    version,
    about = "Preview admin panel files and pages sections"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "PANEL_SECTIONS_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build a configured section against a content fixture and print its JSON payload.
    Preview(PreviewArgs),
    /// List the blueprints a pages section offers for new pages.
    Blueprints(BlueprintsArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Clone)]
pub struct ContentArgs {
    /// Name of the configured section.
    #[arg(value_name = "SECTION")]
    pub section: String,

    /// JSON content fixture describing the site tree and blueprints.
    #[arg(long = "content", value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub content: PathBuf,

    /// Model hosting the section: `site`, `users/<id>` or a page id.
    #[arg(long = "model", value_name = "MODEL", default_value = "site")]
    pub model: String,

    /// Override the panel locale.
    #[arg(long = "locale", value_name = "LOCALE")]
    pub locale: Option<String>,

    #[command(flatten)]
    pub logging: LoggingOverrides,
}

#[derive(Debug, Args, Clone)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub content: ContentArgs,

    /// Page of the paginated result, starting at 1.
    #[arg(long = "page", default_value_t = 1, value_parser = clap::value_parser!(u32))]
    pub page: u32,

    /// Search query typed into the section search box.
    #[arg(long = "query", value_name = "QUERY")]
    pub query: Option<String>,

    /// Pretty-print the JSON payload.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub pretty: bool,
}

#[derive(Debug, Args, Clone)]
pub struct BlueprintsArgs {
    #[command(flatten)]
    pub content: ContentArgs,
}

impl Command {
    pub fn content(&self) -> &ContentArgs {
        match self {
            Command::Preview(args) => &args.content,
            Command::Blueprints(args) => &args.content,
        }
    }
}
