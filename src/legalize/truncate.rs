//! Byte-length truncation of path segments.
//!
//! Limits are in encoded (UTF-8) bytes. A character that straddles the
//! limit is dropped whole, so every output is a valid string and a prefix
//! of the input (modulo the preserved extension).

use super::platform::Platform;

/// A filename split at its final dot-suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SplitName<'a> {
    stem: &'a str,
    suffix: &'a str,
}

impl<'a> SplitName<'a> {
    /// A leading dot or a trailing dot never starts a suffix.
    fn new(name: &'a str) -> Self {
        match name.rfind('.') {
            Some(i) if i > 0 && i + 1 < name.len() => Self {
                stem: &name[..i],
                suffix: &name[i..],
            },
            _ => Self {
                stem: name,
                suffix: "",
            },
        }
    }
}

/// Longest prefix of `segment` that fits in `max_bytes`.
pub fn truncate_to_limit(segment: &str, max_bytes: usize) -> &str {
    if segment.len() <= max_bytes {
        return segment;
    }
    let mut end = max_bytes;
    while !segment.is_char_boundary(end) {
        end -= 1;
    }
    &segment[..end]
}

/// Truncate a filename to `max_bytes`, shortening the stem and keeping the
/// extension.
///
/// If the extension alone leaves no room for a stem, the name is cut as a
/// whole instead.
pub fn truncate_filename(name: &str, max_bytes: usize) -> String {
    if name.len() <= max_bytes {
        return name.to_string();
    }
    let split = SplitName::new(name);
    if split.suffix.is_empty() || split.suffix.len() >= max_bytes {
        return truncate_to_limit(name, max_bytes).to_string();
    }
    let stem = truncate_to_limit(split.stem, max_bytes - split.suffix.len());
    format!("{stem}{}", split.suffix)
}

/// Truncate every segment of `path` to `max_bytes`.
///
/// Directory segments are cut from the end; the final segment keeps its
/// extension.
pub fn truncate_path_to(path: &str, platform: Platform, max_bytes: usize) -> String {
    let segments: Vec<&str> = platform.segments(path).collect();
    let last = segments.len().saturating_sub(1);
    platform.join(segments.iter().enumerate().map(|(i, segment)| {
        if i == last {
            truncate_filename(segment, max_bytes)
        } else {
            truncate_to_limit(segment, max_bytes).to_string()
        }
    }))
}

/// Whether every segment of `path` is within `max_bytes`.
pub fn fits(path: &str, platform: Platform, max_bytes: usize) -> bool {
    platform.segments(path).all(|segment| segment.len() <= max_bytes)
}
