//! htmcp-install - installer for the ht-mcp terminal server
//!
//! Resolves the pre-built `ht-mcp` artifact for the host platform, downloads
//! it, checks its SHA-256 against the recipe, installs it atomically under a
//! fixed name and runs `ht-mcp --version` as a smoke test.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.htmcp/        # HTMCP_HOME
//! └── bin/
//!     └── ht-mcp   # installed binary
//! ```
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod cmd;
pub mod ui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Recipe shipped with the installer.
pub const BUNDLED_RECIPE: &str = include_str!("../recipes/ht-mcp.toml");

#[derive(Debug, Parser)]
#[command(name = "htmcp-install")]
#[command(author, version = env!("HTMCP_VERSION"), about = "Install the ht-mcp terminal server")]
pub struct Cli {
    /// Show what would happen without making changes
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download, verify and install the binary for this machine
    Install {
        /// Recipe file (defaults to the bundled ht-mcp recipe)
        #[arg(long, env = "HTMCP_RECIPE")]
        recipe: Option<PathBuf>,
        /// Directory to install into (defaults to ~/.htmcp/bin)
        #[arg(long, env = "HTMCP_BIN_DIR")]
        bin_dir: Option<PathBuf>,
        /// Kill the smoke test after this many seconds
        #[arg(long, env = "HTMCP_SMOKE_TIMEOUT")]
        smoke_timeout: Option<u64>,
    },
    /// Show which artifact would be installed
    Resolve {
        /// Recipe file (defaults to the bundled ht-mcp recipe)
        #[arg(long, env = "HTMCP_RECIPE")]
        recipe: Option<PathBuf>,
        /// Operating system to resolve for (defaults to this machine)
        #[arg(long, requires = "arch", conflicts_with = "all")]
        os: Option<String>,
        /// Architecture to resolve for (defaults to this machine)
        #[arg(long, requires = "os", conflicts_with = "all")]
        arch: Option<String>,
        /// List every platform in the recipe
        #[arg(long)]
        all: bool,
    },
    /// Run the smoke test against an existing installation
    Test {
        /// Recipe file (defaults to the bundled ht-mcp recipe)
        #[arg(long, env = "HTMCP_RECIPE")]
        recipe: Option<PathBuf>,
        /// Directory the binary was installed into (defaults to ~/.htmcp/bin)
        #[arg(long, env = "HTMCP_BIN_DIR")]
        bin_dir: Option<PathBuf>,
        /// Kill the smoke test after this many seconds
        #[arg(long, env = "HTMCP_SMOKE_TIMEOUT")]
        smoke_timeout: Option<u64>,
    },
    /// Recipe authoring commands
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Compute SHA256 hash of a file (for recipe authoring)
    #[command(hide = true)]
    Hash {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecipeCommands {
    /// Validate a recipe file and flag placeholder digests
    Check {
        /// Recipe file to check
        path: PathBuf,
    },
    /// Download every artifact and write its SHA256 into the recipe
    Pin {
        /// Recipe file to update in place
        path: PathBuf,
    },
    /// Print the bundled recipe
    Show,
}
