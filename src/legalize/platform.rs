//! Platform profiles and their built-in character rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target filesystem flavour.
///
/// Decides which characters are illegal in a path segment, whether a
/// leading dot is rewritten, and whether trailing dots/spaces are stripped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    /// The profile of the platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    /// Separator used when rejoining segments.
    pub fn separator(self) -> char {
        match self {
            Platform::Posix => '/',
            Platform::Windows => '\\',
        }
    }

    /// Whether `c` delimits segments on this platform.
    pub fn is_separator(self, c: char) -> bool {
        match self {
            Platform::Posix => c == '/',
            Platform::Windows => c == '/' || c == '\\',
        }
    }

    /// Split a path into its segments. Empty segments are kept.
    pub fn segments(self, path: &str) -> impl Iterator<Item = &str> {
        path.split(move |c| self.is_separator(c))
    }

    /// Rejoin segments with this platform's separator.
    pub fn join<S: AsRef<str>>(self, segments: impl IntoIterator<Item = S>) -> String {
        let mut out = String::new();
        for (i, segment) in segments.into_iter().enumerate() {
            if i > 0 {
                out.push(self.separator());
            }
            out.push_str(segment.as_ref());
        }
        out
    }

    /// Drop the trailing dots and spaces a cut can leave behind, which
    /// Windows would otherwise strip on its own.
    pub(crate) fn trim_after_cut(self, segment: &str) -> &str {
        match self {
            Platform::Posix => segment,
            Platform::Windows => segment.trim_end_matches(['.', ' ']),
        }
    }

    /// Apply the built-in substitutions for this platform to one segment.
    pub(crate) fn apply_builtins(self, segment: &str) -> String {
        match self {
            Platform::Posix => {
                let mut out: String = segment
                    .chars()
                    .filter(|&c| c != '\0')
                    .map(|c| if c == '/' { '_' } else { c })
                    .collect();
                // Hidden files on Unix.
                if out.starts_with('.') {
                    out.replace_range(..1, "_");
                }
                out
            }
            Platform::Windows => {
                let mut out: String = segment
                    .chars()
                    .filter_map(|c| match c {
                        '\u{0}'..='\u{1f}' => None,
                        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => Some('_'),
                        _ => Some(c),
                    })
                    .collect();
                if out.ends_with('.') || out.ends_with(' ') {
                    out.pop();
                }
                out
            }
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Posix => f.write_str("posix"),
            Platform::Windows => f.write_str("windows"),
        }
    }
}
