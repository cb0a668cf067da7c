//! Clap derive structures for the `qrcafe` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept free
//! of crate-internal imports so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// qrcafe -- manage cafes, categories and products behind a QR menu
#[derive(Debug, Parser)]
#[command(
    name = "qrcafe",
    version,
    about = "Manage QR cafe menus from the command line",
    long_about = "Administer cafes, menu categories and products on a qrcafe backend.\n\n\
        Writes invalidate the shared cafe listing cache; reorders are persisted\n\
        with a single call per list.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "QRCAFE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, env = "QRCAFE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Acting user id for cafe listings and cafe writes
    #[arg(long, short = 'u', env = "QRCAFE_USER_ID", global = true)]
    pub user_id: Option<i64>,

    /// API bearer token
    #[arg(long, env = "QRCAFE_API_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Redis URL of the shared cafe listing cache
    #[arg(long, env = "QRCAFE_CACHE_URL", global = true)]
    pub cache_url: Option<String>,

    /// Request timeout, e.g. "30s" (overrides profile)
    #[arg(long, env = "QRCAFE_TIMEOUT", global = true)]
    pub timeout: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "QRCAFE_OUTPUT",
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
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage your cafes
    #[command(alias = "cafe")]
    Cafes(CafesArgs),

    /// Manage menu categories of a cafe
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// Manage products of a category
    #[command(alias = "prod")]
    Products(ProductsArgs),

    /// Show the public menu of a cafe
    Menu(MenuArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Reorder Arguments ─────────────────────────────────────────

/// Either a full id sequence or a single move.
#[derive(Debug, Args)]
pub struct ReorderArgs {
    /// Complete new order, comma-separated (e.g. 3,1,2)
    #[arg(
        long,
        value_delimiter = ',',
        num_args = 1..,
        conflicts_with_all = ["move_id", "to"],
        required_unless_present = "move_id"
    )]
    pub ids: Option<Vec<i64>>,

    /// Id of the item to move (use with --to)
    #[arg(long = "move", value_name = "ID", requires = "to")]
    pub move_id: Option<i64>,

    /// Zero-based target position for --move
    #[arg(long, value_name = "POSITION", requires = "move_id")]
    pub to: Option<usize>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CAFES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CafesArgs {
    #[command(subcommand)]
    pub command: CafesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CafesCommand {
    /// List your cafes in display order
    #[command(alias = "ls")]
    List,

    /// Show one cafe
    Get {
        /// Cafe id
        id: String,
    },

    /// Create a cafe
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// URL slug (derived from the name when omitted)
        #[arg(long)]
        slug: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        logo_url: Option<String>,

        /// ISO currency code (default USD)
        #[arg(long)]
        currency: Option<String>,
    },

    /// Update a cafe
    Update {
        /// Cafe id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        slug: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        logo_url: Option<String>,

        #[arg(long)]
        currency: Option<String>,
    },

    /// Delete a cafe
    #[command(alias = "rm")]
    Delete {
        /// Cafe id
        id: String,
    },

    /// Change the display order of your cafes
    Reorder(ReorderArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CATEGORIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List the categories of a cafe
    #[command(alias = "ls")]
    List {
        /// Owning cafe id
        #[arg(long)]
        cafe: String,
    },

    /// Show one category
    Get {
        /// Category id
        id: String,
    },

    /// Create a category
    Create {
        /// Owning cafe id
        #[arg(long)]
        cafe: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Update a category
    Update {
        /// Category id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a category
    #[command(alias = "rm")]
    Delete {
        /// Category id
        id: String,
    },

    /// Change the display order of a cafe's categories
    Reorder {
        /// Owning cafe id
        #[arg(long)]
        cafe: String,

        #[command(flatten)]
        order: ReorderArgs,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List the products of a category
    #[command(alias = "ls")]
    List {
        /// Owning category id
        #[arg(long)]
        category: String,
    },

    /// Show one product
    Get {
        /// Product id
        id: String,
    },

    /// Create a product
    Create {
        /// Owning category id
        #[arg(long)]
        category: String,

        #[arg(long)]
        name: String,

        /// Price as a decimal amount, e.g. 3.50
        #[arg(long)]
        price: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        image_url: Option<String>,

        /// Hide the product from the public menu
        #[arg(long)]
        unavailable: bool,
    },

    /// Update a product
    Update {
        /// Product id
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// Price as a decimal amount, e.g. 3.50
        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        image_url: Option<String>,

        /// Show or hide the product on the public menu
        #[arg(long)]
        available: Option<bool>,
    },

    /// Delete a product
    #[command(alias = "rm")]
    Delete {
        /// Product id
        id: String,
    },

    /// Change the display order of a category's products
    Reorder {
        /// Owning category id
        #[arg(long)]
        category: String,

        #[command(flatten)]
        order: ReorderArgs,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MENU
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MenuArgs {
    /// Public slug of the cafe (the part of the QR link after /menu/)
    pub slug: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the resolved configuration with secrets masked
    Show,

    /// Store an API token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
