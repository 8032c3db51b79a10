//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Inspect and query tag-addressed node documents
#[derive(Parser, Debug)]
#[command(name = "nodegraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    /// Additional TOML config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show document as tree
    Show {
        /// Node document (JSON), `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Hide tags
        #[arg(long)]
        no_tags: bool,
        /// Hide data
        #[arg(long)]
        no_data: bool,
    },

    /// Find first node carrying all tags
    Find {
        /// Node document (JSON), `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Required tag (repeatable)
        #[arg(short, long = "tag", required = true)]
        tags: Vec<String>,
        /// Search the whole tree, not only top-level children
        #[arg(long)]
        deep: bool,
    },

    /// Re-emit normalized document
    Fmt {
        /// Node document (JSON), `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Indented output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,
        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print effective settings
    Show,
    /// Print global config file location
    Path,
}
