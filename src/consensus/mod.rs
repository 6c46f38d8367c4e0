//! Consensus over per-track metadata.
//!
//! Collapses the values a batch of tracks report for the same field into
//! one likely value, and says whether the batch was unanimous about it.
//!
//! # Example
//!
//! ```
//! use tagpath::consensus::plurality;
//!
//! assert_eq!(plurality([1, 1, 2, 2, 3]).unwrap(), (1, 2));
//! ```

mod tags;

pub use tags::{Field, TagValue, Tagged, TrackTags};

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::error::{Error, Result};

/// Album artist credits stand in for per-track artists.
pub const ALBUM_OVERRIDES: [(Field, Field); 1] = [(Field::AlbumArtist, Field::Artist)];

/// The most frequent value in `values` and how often it occurs.
///
/// Ties go to the value seen first. Fails with
/// [`Error::InvalidArgument`] on an empty sequence.
pub fn plurality<T, I>(values: I) -> Result<(T, usize)>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    let mut slots: HashMap<T, usize> = HashMap::new();
    let mut tally: Vec<(T, usize)> = Vec::new();

    for value in values {
        match slots.get(&value) {
            Some(&slot) => tally[slot].1 += 1,
            None => {
                slots.insert(value.clone(), tally.len());
                tally.push((value, 1));
            }
        }
    }

    tally
        .into_iter()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
        .ok_or_else(|| Error::invalid_argument("sequence must be non-empty"))
}

/// Per-field outcome of [`most_common_fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommonTags {
    /// Most common value per field.
    pub likely: BTreeMap<Field, TagValue>,
    /// Whether every item agreed on that value.
    pub consensus: BTreeMap<Field, bool>,
}

impl CommonTags {
    pub fn get(&self, field: Field) -> Option<&TagValue> {
        self.likely.get(&field)
    }

    pub fn is_consensus(&self, field: Field) -> bool {
        self.consensus.get(&field).copied().unwrap_or(false)
    }
}

/// Plurality of the non-empty observations of `field`, with unanimity
/// measured against all items. None when nothing was observed.
fn field_plurality<R: Tagged>(items: &[R], field: Field) -> Option<(TagValue, bool)> {
    let observed = items
        .iter()
        .filter_map(|item| item.tag(field))
        .filter(|value| !value.is_empty());
    let (value, count) = plurality(observed).ok()?;
    Some((value, count == items.len()))
}

/// Most common value of each of `fields` across `items`.
///
/// A field nobody reports gets its zero value and no consensus. For each
/// `(preferred, fallback)` pair in `overrides`, if any item reports
/// `preferred`, the fallback's value and consensus flag are replaced by
/// the preferred field's.
pub fn most_common_fields<R: Tagged>(
    items: &[R],
    fields: &[Field],
    overrides: &[(Field, Field)],
) -> CommonTags {
    let mut common = CommonTags::default();

    for &field in fields {
        let (value, unanimous) = field_plurality(items, field).unwrap_or((field.zero(), false));
        common.likely.insert(field, value);
        common.consensus.insert(field, unanimous);
    }

    for &(preferred, fallback) in overrides {
        if let Some((value, unanimous)) = field_plurality(items, preferred) {
            common.likely.insert(fallback, value);
            common.consensus.insert(fallback, unanimous);
        }
    }

    common
}

/// Likely album-level tags for the tracks of one release.
pub fn most_common_tags<R: Tagged>(items: &[R]) -> CommonTags {
    most_common_fields(items, &Field::ALBUM, &ALBUM_OVERRIDES)
}
