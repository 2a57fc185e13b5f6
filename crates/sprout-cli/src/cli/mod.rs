//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "sprout",
    bin_name = "sprout",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f331} Starter projects wired to your backing services",
    long_about = "sprout generates starter server projects with instrumentation, \
                  configuration, and documentation for the backing services you enable.",
    after_help = "EXAMPLES:\n\
        \x20 sprout generate --deploy deploy.json --app app.json --output ./my-app\n\
        \x20 sprout generate --deploy '{\"backendPlatform\": \"NODE\", \"mongodb\": {\"uri\": \"mongodb://localhost\"}}'\n\
        \x20 sprout list --platform node\n\
        \x20 sprout validate --strict\n\
        \x20 sprout completions bash > /usr/share/bash-completion/completions/sprout",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a project from a service selection.
    #[command(
        visible_alias = "g",
        about = "Generate a project tree",
        after_help = "EXAMPLES:\n\
            \x20 sprout generate --deploy deploy.json\n\
            \x20 sprout generate --deploy deploy.json --app app.json --output ./out\n\
            \x20 sprout generate --deploy deploy.json --dry-run"
    )]
    Generate(GenerateArgs),

    /// List catalog services.
    #[command(
        visible_alias = "ls",
        about = "List available services",
        after_help = "EXAMPLES:\n\
            \x20 sprout list\n\
            \x20 sprout list --platform node\n\
            \x20 sprout list --app-type web --format json"
    )]
    List(ListArgs),

    /// Check catalog integrity.
    #[command(
        about = "Validate the service catalog",
        after_help = "EXAMPLES:\n\
            \x20 sprout validate\n\
            \x20 sprout validate --strict   # non-zero exit on warnings"
    )]
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 sprout completions bash > ~/.local/share/bash-completion/completions/sprout\n\
            \x20 sprout completions zsh  > ~/.zfunc/_sprout\n\
            \x20 sprout completions fish > ~/.config/fish/completions/sprout.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the sprout configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 sprout config get defaults.platform\n\
            \x20 sprout config set defaults.platform node\n\
            \x20 sprout config list"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `sprout generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Deployment payload: platform, project name, and per-service
    /// parameters.  A path to a JSON file, or inline JSON starting with `{`.
    #[arg(
        short = 'd',
        long = "deploy",
        value_name = "FILE|JSON",
        help = "Deployment payload (file path or inline JSON)"
    )]
    pub deploy: String,

    /// Application payload: application archetype and starter metadata.
    #[arg(
        short = 'a',
        long = "app",
        value_name = "FILE|JSON",
        help = "Application payload (file path or inline JSON)"
    )]
    pub app: Option<String>,

    /// Output directory for the generated tree.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        default_value = ".",
        help = "Output directory (default: current directory)"
    )]
    pub output: PathBuf,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `sprout list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Filter by platform.
    #[arg(short = 'p', long = "platform", value_enum, help = "Filter by platform")]
    pub platform: Option<Platform>,

    /// Filter by application type.
    #[arg(
        short = 't',
        long = "app-type",
        value_enum,
        help = "Filter by application type"
    )]
    pub application_type: Option<ApplicationType>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `sprout validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Treat warnings as errors (non-zero exit).
    #[arg(long = "strict", help = "Exit non-zero if any warning is found")]
    pub strict: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `sprout completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `sprout config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.platform`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Supported target platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Platform {
    Node,
    Python,
    Swift,
    Java,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Python => write!(f, "python"),
            Self::Swift => write!(f, "swift"),
            Self::Java => write!(f, "java"),
        }
    }
}

/// Supported application archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ApplicationType {
    Web,
    #[value(name = "ms", alias = "microservice")]
    Microservice,
}

impl std::fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Web => write!(f, "web"),
            Self::Microservice => write!(f, "microservice"),
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
