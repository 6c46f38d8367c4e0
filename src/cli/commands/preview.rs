//! Library destination preview command.

use anyhow::Context;
use std::path::Path;
use tracing::{info, warn};

use super::{PathOptions, collect_audio_files, read_all_tags};
use crate::config::Config;
use crate::organizer::preview_destination;

/// Show where each audio file would be placed under `destination`
pub fn cmd_preview(
    config: &Config,
    path: &Path,
    destination: &Path,
    pattern: Option<&str>,
    recursive: bool,
    options: &PathOptions,
) -> anyhow::Result<()> {
    let settings = options.apply(&config.paths);
    let pattern = pattern.unwrap_or(&settings.pattern);
    let rules = settings
        .replacements()
        .context("Invalid replacement rule in config")?;
    let legalizer = settings.legalizer();

    let files = collect_audio_files(path, recursive)?;
    info!("Previewing {} files with pattern {:?}", files.len(), pattern);

    let mut truncated = 0;
    for (source, tags) in read_all_tags(&files) {
        let preview = preview_destination(
            &source,
            &tags,
            pattern,
            destination,
            &legalizer,
            (!rules.is_empty()).then_some(rules.as_slice()),
        );
        if preview.truncated {
            warn!("{:?} needed default rules and truncation", preview.source);
            truncated += 1;
        }
        println!(
            "{} -> {}",
            preview.source.display(),
            preview.destination.display()
        );
    }

    if truncated > 0 {
        println!("\n{} destinations truncated", truncated);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_skips_unreadable_files() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("junk.mp3"), b"nope").unwrap();
        let result = cmd_preview(
            &Config::default(),
            temp.path(),
            Path::new("/library"),
            None,
            false,
            &PathOptions::default(),
        );
        assert!(result.is_ok());
    }
}
