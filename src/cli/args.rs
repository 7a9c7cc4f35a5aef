//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Default config file name, searched upward from the current directory.
pub const DEFAULT_CONFIG: &str = "manref.toml";

/// Cross-reference resolver for multi-document manuals
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Print per-document details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Document root (relative to current directory)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Output directory path (relative to current directory)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Config file path
    #[arg(short = 'C', long, global = true, default_value = DEFAULT_CONFIG, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether `--config` was given a non-default value.
    pub fn has_explicit_config(&self) -> bool {
        self.config.as_os_str() != DEFAULT_CONFIG
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate every cross-reference without writing anything
    #[command(visible_alias = "c")]
    Check {
        /// List every dangling reference instead of stopping at the first
        #[arg(short, long)]
        keep_going: bool,
    },

    /// Validate and rewrite references, then write the link manifest
    #[command(visible_alias = "r")]
    Resolve {
        /// Also write every rewritten document tree as JSON
        #[arg(short, long)]
        trees: bool,
    },

    /// Print collected anchors and references as JSON
    #[command(visible_alias = "q")]
    Query {
        #[command(flatten)]
        args: QueryArgs,
    },
}

/// Query command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct QueryArgs {
    /// Document ids or source files to show. If omitted, shows every document.
    #[arg(value_name = "DOC")]
    pub documents: Vec<String>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Write output to file instead of stdout
    #[arg(short = 'O', long = "write", value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub write: Option<PathBuf>,
}
