//! manref - build-time cross-reference resolver for multi-document manuals.

#![allow(dead_code)]

mod cli;
mod collect;
mod config;
mod core;
mod logger;
mod resolve;
mod source;
mod store;
mod tree;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::XrefConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = XrefConfig::load(&cli)?;
    debug!("config"; "source {}, output {}", config.source.dir.display(), config.output.dir.display());

    match &cli.command {
        Commands::Check { .. } => cli::check::check_references(&config),
        Commands::Resolve { trees } => cli::resolve::resolve_references(&config, *trees),
        Commands::Query { args } => cli::query::run_query(args, &config),
    }
}
