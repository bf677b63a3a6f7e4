//! Clap derive structures for the `altzone` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use altzone_config::ThemePreference;
use altzone_core::Layout;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// altzone -- find alternatives to the products you are boycotting
#[derive(Debug, Parser)]
#[command(
    name = "altzone",
    version,
    about = "Ask for and recommend alternative products from the command line",
    long_about = "A client for the AlternativeZone service.\n\n\
        Post a query for a product you no longer want to buy, browse other\n\
        people's queries, and recommend alternatives to them.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "ALTZONE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API URL (overrides profile)
    #[arg(long, short = 'u', env = "ALTZONE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Identity-provider token sent as a bearer credential
    #[arg(long, env = "ALTZONE_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ALTZONE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ALTZONE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "ALTZONE_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse, post and manage product queries
    #[command(alias = "q")]
    Queries(QueriesArgs),

    /// Recommend an alternative product for a query
    #[command(alias = "rec")]
    Recommend(RecommendArgs),

    /// Recommendations you made or received
    #[command(alias = "recs")]
    Recommendations(RecommendationsArgs),

    /// Show or change the color theme preference
    Theme(ThemeArgs),

    /// Inspect or end the signed-in session
    Session(SessionArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Search, layout and paging arguments shared by list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive substring matched against the product name
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Column layout; fixes the page size (one-column, two-columns, three-columns)
    #[arg(long, short = 'l')]
    pub layout: Option<Layout>,

    /// 1-based page number (out-of-range values are clamped)
    #[arg(long, short = 'P', default_value = "1")]
    pub page: usize,
}

// ── Queries ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct QueriesArgs {
    #[command(subcommand)]
    pub command: QueriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum QueriesCommand {
    /// List every query, newest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show the most recent queries
    Recent,

    /// List your own queries
    Mine(ListArgs),

    /// Show a query and its recommendations
    Show {
        /// Query ID
        id: String,
    },

    /// Post a new query (prompts for missing fields)
    Add(QueryFields),

    /// Edit one of your queries
    Edit {
        /// Query ID
        id: String,

        #[command(flatten)]
        fields: QueryFields,
    },

    /// Delete one of your queries
    #[command(alias = "rm")]
    Delete {
        /// Query ID
        id: String,
    },
}

/// The five user-editable query fields.
#[derive(Debug, Args)]
pub struct QueryFields {
    /// Query title
    #[arg(long)]
    pub title: Option<String>,

    /// Name of the product being boycotted
    #[arg(long)]
    pub product: Option<String>,

    /// Brand of the product
    #[arg(long)]
    pub brand: Option<String>,

    /// Product image URL
    #[arg(long)]
    pub image: Option<String>,

    /// Why the product is being boycotted
    #[arg(long)]
    pub reason: Option<String>,
}

// ── Recommend ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RecommendArgs {
    /// ID of the query to recommend an alternative for
    pub query_id: String,

    /// Recommendation title
    #[arg(long)]
    pub title: Option<String>,

    /// Name of the recommended product
    #[arg(long)]
    pub product: Option<String>,

    /// Image URL of the recommended product
    #[arg(long)]
    pub image: Option<String>,

    /// Why this product is a good alternative
    #[arg(long)]
    pub reason: Option<String>,
}

// ── Recommendations ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RecommendationsArgs {
    #[command(subcommand)]
    pub command: RecommendationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecommendationsCommand {
    /// List the recommendations you made
    Mine {
        /// 1-based page number (out-of-range values are clamped)
        #[arg(long, short = 'P', default_value = "1")]
        page: usize,
    },

    /// Delete one of your recommendations
    #[command(alias = "rm")]
    Delete {
        /// Recommendation ID
        id: String,
    },

    /// List recommendations made on your queries
    ForMe,
}

// ── Theme ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: ThemeCommand,
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Print the saved theme
    Show,

    /// Switch between light and dark
    Toggle,

    /// Save a specific theme
    Set {
        /// light or dark
        theme: ThemePreference,
    },
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Show the signed-in user
    Whoami,

    /// Record the user your identity provider signed in
    SignIn {
        /// Account email
        #[arg(long)]
        email: String,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Profile photo URL
        #[arg(long)]
        photo: Option<String>,

        /// Store the global --token in the system keyring
        #[arg(long)]
        save_token: bool,
    },

    /// Forget the signed-in user and stored token
    SignOut,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
