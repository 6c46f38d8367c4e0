//! Album consensus command.

use std::path::Path;

use crate::consensus::{Field, most_common_tags};

use super::{collect_audio_files, read_all_tags};

/// Print the most likely album tags for the tracks under `path`
pub fn cmd_consensus(path: &Path, recursive: bool, json: bool) -> anyhow::Result<()> {
    let files = collect_audio_files(path, recursive)?;
    let tracks: Vec<_> = read_all_tags(&files)
        .into_iter()
        .map(|(_, tags)| tags)
        .collect();

    if tracks.is_empty() {
        anyhow::bail!("No readable audio files found in {:?}", path);
    }

    let common = most_common_tags(&tracks);

    if json {
        println!("{}", serde_json::to_string_pretty(&common)?);
        return Ok(());
    }

    println!("{} tracks", tracks.len());
    println!();
    for field in Field::ALBUM {
        let value = common
            .get(field)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let marker = if common.is_consensus(field) { "=" } else { "~" };
        println!("{:<16} {} {}", field, marker, value);
    }
    Ok(())
}
