//! Destination paths for music files.
//!
//! Builds where a file would live in a library laid out by a pattern like
//! `{albumartist}/{album}/{track} - {title}`, legalized for the target
//! platform and filesystem.
//!
//! # Features
//! - Pattern-based destinations from track tags
//! - Metadata values can never introduce extra directories
//! - Extension-preserving legalization and truncation
//!
//! Nothing here touches the filesystem; callers decide what to do with a
//! [`DestinationPreview`].

use std::path::{Path, PathBuf};

use crate::consensus::TrackTags;
use crate::legalize::{LengthOracle, Legalizer, Platform, Replacement, sanitize_segment};

/// Pattern used when none is configured.
pub const DEFAULT_PATTERN: &str = "{albumartist}/{album}/{track} - {title}";

/// Preview result for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPreview {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Replacement rules were dropped to make the path fit.
    pub truncated: bool,
}

/// Substitute tag values into `pattern`.
///
/// Pattern variables: {albumartist}, {artist}, {album}, {title}, {track},
/// {year}. Each value is sanitized as a single segment first.
pub fn render_pattern(pattern: &str, tags: &TrackTags, platform: Platform) -> String {
    let segment = |value: Option<&str>| {
        value
            .filter(|s| !s.is_empty())
            .map(|s| sanitize_segment(s, platform, &[]))
    };

    let artist = segment(tags.artist.as_deref()).unwrap_or_else(|| "Unknown Artist".to_string());
    let albumartist = segment(tags.albumartist.as_deref()).unwrap_or_else(|| artist.clone());
    let album = segment(tags.album.as_deref()).unwrap_or_else(|| "Unknown Album".to_string());
    let title = segment(tags.title.as_deref()).unwrap_or_else(|| "Unknown Title".to_string());

    // Format track number with zero padding
    let track_num = tags
        .track
        .map(|n| format!("{:02}", n))
        .unwrap_or_else(|| "00".to_string());
    let year = tags.year.map(|y| y.to_string()).unwrap_or_default();

    let value = |name: &str| match name {
        "albumartist" => Some(albumartist.as_str()),
        "artist" => Some(artist.as_str()),
        "album" => Some(album.as_str()),
        "title" => Some(title.as_str()),
        "track" => Some(track_num.as_str()),
        "year" => Some(year.as_str()),
        _ => None,
    };

    // Single pass: inserted values are never scanned for variables.
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}').and_then(|close| Some((close, value(&after[..close])?))) {
            Some((close, v)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Generates the destination `source` would get under `destination_root`.
///
/// `rules` of `None` uses the default replacement rules.
pub fn preview_destination<O: LengthOracle>(
    source: &Path,
    tags: &TrackTags,
    pattern: &str,
    destination_root: &Path,
    legalizer: &Legalizer<O>,
    rules: Option<&[Replacement]>,
) -> DestinationPreview {
    let extension = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let relative = render_pattern(pattern, tags, legalizer.platform());
    let legalized = legalizer.legalize_destination(&relative, rules, &extension);
    if legalized.truncated {
        tracing::debug!("Destination for {:?} needed default rules", source);
    }

    // Empty and dot-only segments are skipped so the result stays under the root.
    let mut destination = destination_root.to_path_buf();
    destination.extend(
        legalizer
            .platform()
            .segments(&legalized.path)
            .filter(|s| !matches!(*s, "" | "." | "..")),
    );

    DestinationPreview {
        source: source.to_path_buf(),
        destination,
        truncated: legalized.truncated,
    }
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::legalize::FixedLimit;
    use proptest::prelude::*;

    /// Generate valid filename characters (excluding path separators and invalid chars)
    fn valid_filename_char() -> impl Strategy<Value = char> {
        prop::char::range('!', '~').prop_filter("no invalid chars", |c| {
            !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
        })
    }

    /// Generate a valid filename string
    fn valid_filename() -> impl Strategy<Value = String> {
        prop::collection::vec(valid_filename_char(), 1..50)
            .prop_map(|chars| chars.into_iter().collect())
    }

    /// Generate an arbitrary string that might contain invalid characters
    fn arbitrary_name() -> impl Strategy<Value = String> {
        prop::string::string_regex("[a-zA-Z0-9 ./:*?\"<>|_-]{1,50}").unwrap()
    }

    fn legalizer() -> Legalizer {
        Legalizer::new(Platform::Posix, FixedLimit(200))
    }

    proptest! {
        /// Rendered values never add directories
        #[test]
        fn metadata_cannot_add_directories(artist in arbitrary_name(), title in arbitrary_name()) {
            let tags = TrackTags {
                albumartist: Some(artist),
                title: Some(title),
                ..Default::default()
            };
            let rendered = render_pattern("{albumartist}/{title}", &tags, Platform::Posix);
            prop_assert_eq!(rendered.split('/').count(), 2);
        }

        /// Destinations always stay under the destination root
        #[test]
        fn preview_stays_under_dest_root(
            artist in arbitrary_name(),
            album in valid_filename(),
            title in valid_filename(),
            track_num in proptest::option::of(1u32..100),
        ) {
            let tags = TrackTags {
                albumartist: Some(artist),
                album: Some(album),
                title: Some(title),
                track: track_num,
                ..Default::default()
            };

            let dest_root = PathBuf::from("/music/library");
            let preview = preview_destination(
                Path::new("/source/test.mp3"),
                &tags,
                DEFAULT_PATTERN,
                &dest_root,
                &legalizer(),
                None,
            );

            prop_assert!(
                preview.destination.starts_with(&dest_root),
                "Destination {:?} should start with {:?}",
                preview.destination,
                dest_root
            );
            prop_assert!(!preview.destination.components().any(|c| c.as_os_str() == ".."));
        }

        /// Preview should preserve the file extension
        #[test]
        fn preview_preserves_extension(
            ext in prop::sample::select(vec!["mp3", "flac", "ogg", "wav", "m4a"]),
            title in valid_filename(),
        ) {
            let tags = TrackTags {
                title: Some(title),
                ..Default::default()
            };

            let source = PathBuf::from(format!("/source/test.{}", ext));
            let preview = preview_destination(
                &source,
                &tags,
                "{albumartist}/{title}",
                Path::new("/music"),
                &legalizer(),
                None,
            );

            let result_ext = preview.destination.extension().and_then(|e| e.to_str());
            prop_assert_eq!(Some(ext), result_ext);
        }

        /// Track number formatting should always be zero-padded to 2 digits
        #[test]
        fn track_number_is_zero_padded(track_num in 1u32..100) {
            let tags = TrackTags {
                track: Some(track_num),
                ..Default::default()
            };

            let preview = preview_destination(
                Path::new("/test.mp3"),
                &tags,
                "{track}",
                Path::new("/out"),
                &legalizer(),
                None,
            );

            let filename = preview.destination.file_name().unwrap().to_str().unwrap();
            let expected = format!("{:02}.mp3", track_num);
            prop_assert_eq!(filename, expected.as_str());
        }
    }
}
