//! tagpath - legal filesystem paths from music metadata.
//!
//! Sanitizes and truncates paths built from tag values so they are valid
//! on the target platform and filesystem, and finds the most likely
//! album-level tags from a set of track tags.

pub mod cli;
pub mod config;
pub mod consensus;
pub mod error;
pub mod legalize;
pub mod metadata;
pub mod organizer;
#[cfg(test)]
pub mod test_utils;
