//! Regex replacement rules applied to path segments.

use regex::{NoExpand, Regex};
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// A single `(pattern, substitution)` rewrite.
///
/// The substitution is literal text; `$1`-style group references are not
/// expanded.
#[derive(Debug, Clone)]
pub struct Replacement {
    pattern: Regex,
    with: String,
}

/// The guaranteed-safe rule set, legal on both platforms and on Samba shares.
static DEFAULT_RULES: LazyLock<Vec<Replacement>> = LazyLock::new(|| {
    [
        (r"[\\/]", "_"),
        (r"^\.", "_"),
        (r"[\x00-\x1f]", ""),
        (r#"[<>:"\?\*\|]"#, "_"),
        (r"\.$", "_"),
        (r"\s+$", ""),
    ]
    .into_iter()
    .map(|(pattern, with)| Replacement {
        pattern: Regex::new(pattern).expect("built-in replacement pattern"),
        with: with.to_string(),
    })
    .collect()
});

impl Replacement {
    /// Compile a rule.
    pub fn new(pattern: &str, with: impl Into<String>) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: regex,
            with: with.into(),
        })
    }

    /// Parse a `PATTERN=WITH` pair as given on the command line.
    ///
    /// The split happens at the last `=`, so patterns may contain `=`.
    pub fn parse_pair(spec: &str) -> Result<Self> {
        let (pattern, with) = spec.rsplit_once('=').ok_or_else(|| {
            Error::invalid_argument(format!("expected PATTERN=WITH, got {spec:?}"))
        })?;
        Self::new(pattern, with)
    }

    /// The built-in default rules.
    pub fn defaults() -> &'static [Replacement] {
        &DEFAULT_RULES
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn with(&self) -> &str {
        &self.with
    }

    /// Rewrite every match in `text`.
    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, NoExpand(&self.with))
            .into_owned()
    }
}

impl PartialEq for Replacement {
    fn eq(&self, other: &Self) -> bool {
        self.pattern.as_str() == other.pattern.as_str() && self.with == other.with
    }
}

impl Eq for Replacement {}

/// Apply `rules` to `text` in declaration order.
pub fn apply_all(text: &str, rules: &[Replacement]) -> String {
    rules
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}
