//! Command-line interface for tagpath.
//!
//! Commands for sanitizing, truncating and legalizing path strings, finding
//! the consensus tags of an album, and previewing library destinations.

mod commands;

pub use commands::{Cli, Commands, PathOptions, run_command};
