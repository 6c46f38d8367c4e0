//! Tag fields and values as seen by the aggregator.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A metadata field of interest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Artist,
    Album,
    AlbumArtist,
    Year,
    Track,
    DiscTotal,
    #[serde(rename = "mb_albumid")]
    MbAlbumId,
    Label,
    Barcode,
    CatalogNum,
    Country,
    Media,
    AlbumDisambig,
}

impl Field {
    /// Fields describing a whole release rather than one track.
    pub const ALBUM: [Field; 12] = [
        Field::Artist,
        Field::Album,
        Field::AlbumArtist,
        Field::Year,
        Field::DiscTotal,
        Field::MbAlbumId,
        Field::Label,
        Field::Barcode,
        Field::CatalogNum,
        Field::Country,
        Field::Media,
        Field::AlbumDisambig,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Artist => "artist",
            Field::Album => "album",
            Field::AlbumArtist => "albumartist",
            Field::Year => "year",
            Field::Track => "track",
            Field::DiscTotal => "disctotal",
            Field::MbAlbumId => "mb_albumid",
            Field::Label => "label",
            Field::Barcode => "barcode",
            Field::CatalogNum => "catalognum",
            Field::Country => "country",
            Field::Media => "media",
            Field::AlbumDisambig => "albumdisambig",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Field::Year | Field::Track | Field::DiscTotal)
    }

    /// The value reported when nothing was observed.
    pub fn zero(self) -> TagValue {
        if self.is_numeric() {
            TagValue::Number(0)
        } else {
            TagValue::Text(String::new())
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALBUM
            .into_iter()
            .chain([Field::Title, Field::Track])
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::invalid_argument(format!("unknown field {s:?}")))
    }
}

/// One observed tag value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Number(i64),
    Text(String),
}

impl TagValue {
    /// Empty text is no observation at all; a numeric zero is.
    pub fn is_empty(&self) -> bool {
        matches!(self, TagValue::Text(s) if s.is_empty())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s),
            TagValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            TagValue::Number(n) => Some(*n),
            TagValue::Text(_) => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Number(n) => write!(f, "{n}"),
            TagValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::Text(s.to_string())
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> Self {
        TagValue::Text(s)
    }
}

impl From<i64> for TagValue {
    fn from(n: i64) -> Self {
        TagValue::Number(n)
    }
}

impl From<u32> for TagValue {
    fn from(n: u32) -> Self {
        TagValue::Number(i64::from(n))
    }
}

/// Anything that can report tag values per field.
pub trait Tagged {
    fn tag(&self, field: Field) -> Option<TagValue>;
}

impl<T: Tagged + ?Sized> Tagged for &T {
    fn tag(&self, field: Field) -> Option<TagValue> {
        (**self).tag(field)
    }
}

impl Tagged for BTreeMap<Field, TagValue> {
    fn tag(&self, field: Field) -> Option<TagValue> {
        self.get(&field).cloned()
    }
}

impl Tagged for HashMap<Field, TagValue> {
    fn tag(&self, field: Field) -> Option<TagValue> {
        self.get(&field).cloned()
    }
}

/// Tags of a single track. Missing tags are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub albumartist: Option<String>,
    pub year: Option<i64>,
    pub track: Option<u32>,
    pub disctotal: Option<u32>,
    pub mb_albumid: Option<String>,
    pub label: Option<String>,
    pub barcode: Option<String>,
    pub catalognum: Option<String>,
    pub country: Option<String>,
    pub media: Option<String>,
    pub albumdisambig: Option<String>,
}

impl Tagged for TrackTags {
    fn tag(&self, field: Field) -> Option<TagValue> {
        let text = |value: &Option<String>| value.as_deref().map(TagValue::from);
        match field {
            Field::Title => text(&self.title),
            Field::Artist => text(&self.artist),
            Field::Album => text(&self.album),
            Field::AlbumArtist => text(&self.albumartist),
            Field::Year => self.year.map(TagValue::from),
            Field::Track => self.track.map(TagValue::from),
            Field::DiscTotal => self.disctotal.map(TagValue::from),
            Field::MbAlbumId => text(&self.mb_albumid),
            Field::Label => text(&self.label),
            Field::Barcode => text(&self.barcode),
            Field::CatalogNum => text(&self.catalognum),
            Field::Country => text(&self.country),
            Field::Media => text(&self.media),
            Field::AlbumDisambig => text(&self.albumdisambig),
        }
    }
}
