//! Test utilities and fixtures for tagpath tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::mock_track_tags;
//!
//! let tags = TrackTags {
//!     title: Some("Custom Title".to_string()),
//!     ..mock_track_tags()
//! };
//! ```

use crate::consensus::TrackTags;

/// Creates mock TrackTags with sensible defaults.
///
/// Customize with struct update syntax.
pub fn mock_track_tags() -> TrackTags {
    TrackTags {
        title: Some("Test Track".to_string()),
        artist: Some("Test Artist".to_string()),
        album: Some("Test Album".to_string()),
        albumartist: Some("Test Album Artist".to_string()),
        track: Some(1),
        ..Default::default()
    }
}

/// Three tracks that agree on the album artist but not on label or album.
pub fn mock_album() -> Vec<TrackTags> {
    [
        ("label 1", "album"),
        ("label 2", "album"),
        ("label 3", "another album"),
    ]
    .into_iter()
    .map(|(label, album)| TrackTags {
        albumartist: Some("aartist".to_string()),
        label: Some(label.to_string()),
        album: Some(album.to_string()),
        ..Default::default()
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_track_tags_defaults() {
        let tags = mock_track_tags();
        assert_eq!(tags.title.as_deref(), Some("Test Track"));
        assert_eq!(tags.albumartist.as_deref(), Some("Test Album Artist"));
        assert_eq!(tags.track, Some(1));
        assert!(tags.year.is_none());
    }

    #[test]
    fn test_mock_album_shape() {
        let album = mock_album();
        assert_eq!(album.len(), 3);
        assert!(album.iter().all(|t| t.albumartist.as_deref() == Some("aartist")));
    }
}
