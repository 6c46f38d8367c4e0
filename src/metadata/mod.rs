//! Audio file tag reading.
//!
//! Uses the lofty crate for format-independent metadata access.
//! Supports MP3, FLAC, OGG, M4A, and WAV files.
//!
//! Only reads: the resulting [`TrackTags`] feed the consensus aggregator
//! and the destination builder.
//!
//! Release country and album disambiguation have no [`ItemKey`] of their
//! own, so they are looked up by the names MusicBrainz taggers write
//! (Vorbis/APE, ID3v2 `TXXX` description, MP4 freeform atom).

use lofty::file::{FileType, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::consensus::TrackTags;
use crate::error::{Error, Result, ResultExt};

const COUNTRY_KEYS: [&str; 3] = [
    "RELEASECOUNTRY",
    "MusicBrainz Album Release Country",
    "----:com.apple.iTunes:MusicBrainz Album Release Country",
];

const DISAMBIGUATION_KEYS: [&str; 3] = [
    "MUSICBRAINZ_ALBUMCOMMENT",
    "MusicBrainz Album Comment",
    "----:com.apple.iTunes:MusicBrainz Album Comment",
];

/// Extensions treated as audio files.
pub const AUDIO_EXTENSIONS: [&str; 5] = ["mp3", "flac", "ogg", "m4a", "wav"];

/// Check if a path has an audio file extension
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
}

/// Read the tags of one audio file.
///
/// Uses the primary tag, or the first available one. A file with no tags
/// at all yields empty [`TrackTags`].
pub fn read_tags(path: &Path) -> Result<TrackTags> {
    let file = File::open(path).with_context(format!("Failed to open {}", path.display()))?;

    // Extension first, file content when the extension says nothing
    let probe = Probe::new(BufReader::new(file));
    let probe = match FileType::from_path(path) {
        Some(file_type) => probe.set_file_type(file_type),
        None => probe
            .guess_file_type()
            .with_context(format!("Failed to sniff {}", path.display()))?,
    };

    let tagged_file = probe
        .read()
        .map_err(|e| Error::metadata(path, format!("Failed to read file metadata: {e}")))?;

    let tags = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
        .map(tags_from)
        .unwrap_or_default();

    tracing::trace!("Read tags from {:?}: {:?}", path, tags);
    Ok(tags)
}

fn tags_from(tag: &Tag) -> TrackTags {
    let text = |key: ItemKey| {
        tag.get_string(&key)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let named = |names: &[&str]| {
        tag.items()
            .find(|item| match item.key() {
                ItemKey::Unknown(key) => names.iter().any(|n| key.eq_ignore_ascii_case(n)),
                _ => false,
            })
            .and_then(|item| item.value().text())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    TrackTags {
        title: tag.title().map(|s| s.to_string()),
        artist: tag.artist().map(|s| s.to_string()),
        album: tag.album().map(|s| s.to_string()),
        albumartist: text(ItemKey::AlbumArtist),
        year: tag.year().map(i64::from),
        track: tag.track(),
        disctotal: tag.disk_total(),
        mb_albumid: text(ItemKey::MusicBrainzReleaseId),
        label: text(ItemKey::Label),
        barcode: text(ItemKey::Barcode),
        catalognum: text(ItemKey::CatalogNumber),
        country: named(&COUNTRY_KEYS),
        media: text(ItemKey::OriginalMediaType),
        albumdisambig: named(&DISAMBIGUATION_KEYS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_non_audio_file_returns_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "This is just some text, not music.").expect("Failed to write to temp file");

        let result = read_tags(file.path());

        assert!(matches!(result, Err(Error::Metadata { .. })));
    }

    #[test]
    fn test_read_non_existent_file_returns_error() {
        let path = Path::new("non_existent_file.mp3");
        let err = read_tags(path).unwrap_err();
        match err {
            Error::WithContext { context, source } => {
                assert!(context.contains("non_existent_file.mp3"));
                assert!(matches!(*source, Error::Io(_)));
            }
            other => panic!("expected an I/O error with context, got {other:?}"),
        }
    }

    #[test]
    fn test_unreadable_audio_extension_is_metadata_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.flac");
        std::fs::write(&path, b"not a flac stream").unwrap();
        assert!(matches!(read_tags(&path), Err(Error::Metadata { .. })));
    }

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("/music/song.mp3")));
        assert!(is_audio_file(Path::new("/music/SONG.FLAC")));
        assert!(!is_audio_file(Path::new("/music/cover.jpg")));
        assert!(!is_audio_file(Path::new("/music/noext")));
    }

    #[test]
    fn test_tags_from_reads_album_fields() {
        use lofty::tag::TagType;

        let mut tag = Tag::new(TagType::VorbisComments);
        tag.set_title("Bohemian Rhapsody".to_string());
        tag.set_artist("Queen".to_string());
        tag.set_album("A Night at the Opera".to_string());
        tag.set_track(11);
        tag.insert_text(ItemKey::AlbumArtist, "Queen".to_string());
        tag.insert_text(ItemKey::Label, "EMI".to_string());

        let tags = tags_from(&tag);

        assert_eq!(tags.title.as_deref(), Some("Bohemian Rhapsody"));
        assert_eq!(tags.albumartist.as_deref(), Some("Queen"));
        assert_eq!(tags.label.as_deref(), Some("EMI"));
        assert_eq!(tags.track, Some(11));
        assert!(tags.barcode.is_none());
        assert!(tags.country.is_none());
    }

    #[test]
    fn test_tags_from_reads_release_country_and_disambiguation() {
        use lofty::tag::{ItemValue, TagItem, TagType};

        let mut tag = Tag::new(TagType::VorbisComments);
        tag.push_unchecked(TagItem::new(
            ItemKey::Unknown("releasecountry".to_string()),
            ItemValue::Text("GB".to_string()),
        ));
        tag.push_unchecked(TagItem::new(
            ItemKey::Unknown("MusicBrainz Album Comment".to_string()),
            ItemValue::Text("remaster".to_string()),
        ));

        let tags = tags_from(&tag);

        assert_eq!(tags.country.as_deref(), Some("GB"));
        assert_eq!(tags.albumdisambig.as_deref(), Some("remaster"));
    }
}
