//! Configuration management for `manref.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [source], [output], [validate]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util           # upward config file search
//! └── mod.rs         # XrefConfig (this file)
//! ```
//!
//! The config file is optional. Without one, defaults rooted at the current
//! directory are used; relative paths in a found file resolve against the
//! directory holding it. CLI flags override both.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{OutputConfig, SourceConfig, ValidateConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands},
    debug, log,
    utils::path::{normalize_path, resolve_path},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing manref.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XrefConfig {
    /// Absolute path to the config file; empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file, or cwd
    #[serde(skip)]
    pub root: PathBuf,

    /// Document sources
    #[serde(default)]
    pub source: SourceConfig,

    /// Resolve outputs
    #[serde(default)]
    pub output: OutputConfig,

    /// Failure reporting
    #[serde(default)]
    pub validate: ValidateConfig,
}

impl XrefConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. A missing default
    /// config falls back to built-in defaults; a missing `--config` file is
    /// an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = normalize_path(&path);
                config
            }
            None if cli.has_explicit_config() => {
                return Err(ConfigError::NotFound(cli.config.clone()).into());
            }
            None => {
                debug!("config"; "no {} found, using defaults", cli.config.display());
                Self::default()
            }
        };

        let root = config
            .config_path
            .parent()
            .map_or_else(|| cwd.clone(), Path::to_path_buf);

        config.finalize(cli, &root, &cwd);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli, root: &Path, cwd: &Path) {
        self.root = normalize_path(root);
        self.source.normalize_extensions();

        // Paths from the file resolve against the project root
        self.source.dir = resolve_path(&self.source.dir, &self.root);
        self.output.dir = resolve_path(&self.output.dir, &self.root);

        self.apply_cli_options(cli, cwd);
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply CLI overrides. CLI paths resolve against the current directory.
    fn apply_cli_options(&mut self, cli: &Cli, cwd: &Path) {
        if let Some(source) = &cli.source {
            self.source.dir = resolve_path(source, cwd);
        }
        if let Some(output) = &cli.output {
            self.output.dir = resolve_path(output, cwd);
        }
        if let Commands::Check { keep_going: true } = cli.command {
            self.validate.keep_going = true;
        }
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the final configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.source.validate(&mut diag);
        self.output.validate(&mut diag);

        if self.output.dir == self.source.dir {
            diag.error_with_hint(
                OutputConfig::DIR,
                "output directory is the source directory",
                "written trees would be picked up as sources on the next run",
            );
        }

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config content.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> XrefConfig {
    let (parsed, ignored) = XrefConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Config rooted at `root` with `docs/` created, as `load` would leave it.
#[cfg(test)]
pub fn test_config_in(root: &Path) -> XrefConfig {
    use clap::Parser;

    fs::create_dir_all(root.join("docs")).unwrap();
    let cli = Cli::try_parse_from(["manref", "check"]).unwrap();
    let mut config = XrefConfig::default();
    config.finalize(&cli, root, root);
    config
}

// ============================================================================
// tests
// ============================================================================
