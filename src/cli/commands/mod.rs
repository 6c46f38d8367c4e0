//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `paths`: sanitize, truncate and legalize path strings
//! - `consensus`: likely album tags for a directory of tracks
//! - `preview`: legalized library destinations for audio files
//! - `settings`: show the effective configuration

mod consensus;
mod paths;
mod preview;
mod settings;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::{self, PathsConfig};
use crate::consensus::TrackTags;
use crate::legalize::Platform;
use crate::metadata;

pub use consensus::cmd_consensus;
pub use paths::{cmd_legalize, cmd_sanitize, cmd_truncate};
pub use preview::cmd_preview;
pub use settings::cmd_config;

/// Make metadata-derived paths safe for a filesystem
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the OS default location
    #[arg(long, global = true, env = "TAGPATH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Platform and length overrides shared by the path commands
#[derive(Args, Debug, Clone, Default)]
pub struct PathOptions {
    /// Target platform (defaults to config, then the running OS)
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,
    /// Maximum filename length in bytes (defaults to config, then a filesystem probe)
    #[arg(long)]
    pub max_length: Option<usize>,
}

impl PathOptions {
    /// Config settings with these overrides applied.
    pub fn apply(&self, paths: &PathsConfig) -> PathsConfig {
        let mut paths = paths.clone();
        if let Some(platform) = self.platform {
            paths.platform = Some(platform);
        }
        if let Some(max_length) = self.max_length {
            paths.max_filename_length = max_length;
        }
        paths
    }
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Replace characters that are illegal on the target platform
    Sanitize {
        /// Paths to sanitize
        #[arg(required = true)]
        paths: Vec<String>,
        #[command(flatten)]
        options: PathOptions,
    },
    /// Cut path segments to the maximum filename length
    Truncate {
        /// Paths to truncate
        #[arg(required = true)]
        paths: Vec<String>,
        #[command(flatten)]
        options: PathOptions,
    },
    /// Sanitize with replacement rules, falling back to truncation
    Legalize {
        /// Paths to legalize
        #[arg(required = true)]
        paths: Vec<String>,
        #[command(flatten)]
        options: PathOptions,
        /// Extra primary rule, as PATTERN=WITH (repeatable)
        #[arg(short, long, value_name = "PATTERN=WITH")]
        replace: Vec<String>,
        /// Extra rule tried when the primary rules overflow (repeatable)
        #[arg(short, long, value_name = "PATTERN=WITH")]
        alternate: Vec<String>,
    },
    /// Show the most likely album tags for a set of tracks
    Consensus {
        /// Audio file or directory of tracks
        path: PathBuf,
        /// Recursive directory scan
        #[arg(short, long)]
        recursive: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show where each audio file would be placed in a library
    Preview {
        /// Audio file or directory
        path: PathBuf,
        /// Destination root directory
        #[arg(short, long)]
        destination: PathBuf,
        /// Destination pattern (defaults to config)
        #[arg(short, long)]
        pattern: Option<String>,
        /// Recursive directory scan
        #[arg(short, long)]
        recursive: bool,
        #[command(flatten)]
        options: PathOptions,
    },
    /// Print the config file location and effective settings
    Config {
        /// Write the effective settings to the config file if it does not exist
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };

    match &cli.command {
        Commands::Sanitize { paths, options } => cmd_sanitize(&config, paths, options),
        Commands::Truncate { paths, options } => cmd_truncate(&config, paths, options),
        Commands::Legalize {
            paths,
            options,
            replace,
            alternate,
        } => cmd_legalize(&config, paths, options, replace, alternate),
        Commands::Consensus {
            path,
            recursive,
            json,
        } => cmd_consensus(path, *recursive, *json),
        Commands::Preview {
            path,
            destination,
            pattern,
            recursive,
            options,
        } => cmd_preview(
            &config,
            path,
            destination,
            pattern.as_deref(),
            *recursive,
            options,
        ),
        Commands::Config { init } => cmd_config(&config, cli.config.as_deref(), *init),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Collect audio files from a path (file or directory), sorted
pub(crate) fn collect_audio_files(path: &Path, recursive: bool) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = if path.is_dir() {
        if recursive {
            walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| metadata::is_audio_file(e.path()))
                .map(|e| e.path().to_path_buf())
                .collect()
        } else {
            std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory: {:?}", path))?
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
                .filter(|e| metadata::is_audio_file(&e.path()))
                .map(|e| e.path())
                .collect()
        }
    } else {
        vec![path.to_path_buf()]
    };
    files.sort();
    Ok(files)
}

/// Read tags from every file in parallel, skipping unreadable ones
pub(crate) fn read_all_tags(files: &[PathBuf]) -> Vec<(PathBuf, TrackTags)> {
    files
        .par_iter()
        .filter_map(|path| match metadata::read_tags(path) {
            Ok(tags) => Some((path.clone(), tags)),
            Err(e) => {
                warn!("Skipping {}", e);
                None
            }
        })
        .collect()
}
