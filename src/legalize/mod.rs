//! Path legalization for metadata-derived paths.
//!
//! Turns a path built from untrusted text (artist, album, title) into one
//! that is safe and length-legal on the target filesystem.
//!
//! # Features
//! - Platform-aware sanitization with caller-supplied regex rules
//! - Byte-exact truncation that never splits a character and keeps the
//!   file extension
//! - Bounded retry over candidate rule sets with a guaranteed-safe fallback
//! - Staged legalization for templated destinations that carry an extension
//!
//! # Example
//!
//! ```
//! use tagpath::legalize::{FixedLimit, Legalizer, Platform, Replacement};
//!
//! let legalizer = Legalizer::new(Platform::Posix, FixedLimit(5));
//! let result = legalizer.legalize_path("abc/de", &[], Replacement::defaults());
//! assert_eq!(result.path, "abc/de");
//! assert!(!result.truncated);
//! ```

mod oracle;
mod platform;
mod replace;
mod truncate;

pub use oracle::{FilesystemLimit, FixedLimit, LengthOracle, MAX_FILENAME_LENGTH};
pub use platform::Platform;
pub use replace::{Replacement, apply_all};
pub use truncate::{fits, truncate_filename, truncate_path_to, truncate_to_limit};

/// Candidate rounds allowed to overflow before falling back to the default rules.
const MAX_CANDIDATE_ROUNDS: usize = 2;

/// Outcome of a legalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legalized {
    pub path: String,
    /// Characters had to be removed to fit the length limit.
    pub truncated: bool,
}

impl Legalized {
    fn new(path: String, truncated: bool) -> Self {
        Self { path, truncated }
    }
}

impl From<Legalized> for (String, bool) {
    fn from(result: Legalized) -> Self {
        (result.path, result.truncated)
    }
}

/// Sanitize one segment: built-in platform rules first, then `rules` in order.
pub fn sanitize_segment(segment: &str, platform: Platform, rules: &[Replacement]) -> String {
    if segment.is_empty() {
        return String::new();
    }
    apply_all(&platform.apply_builtins(segment), rules)
}

/// Sanitize every segment of `path` and rejoin with the platform separator.
pub fn sanitize_path(path: &str, platform: Platform, rules: &[Replacement]) -> String {
    if path.is_empty() {
        return String::new();
    }
    platform.join(
        platform
            .segments(path)
            .map(|segment| sanitize_segment(segment, platform, rules)),
    )
}

/// Truncate `path` for the running platform and the filesystem under the
/// current directory.
pub fn truncate_path(path: &str) -> String {
    Legalizer::new(Platform::current(), FilesystemLimit::new(".")).truncate(path)
}

/// Steps of [`Legalizer::legalize_path`].
#[derive(Debug)]
enum Step {
    TryCandidate(usize),
    Truncate,
    Done(Legalized),
}

/// Legalizes paths for one platform against one length oracle.
#[derive(Debug, Clone)]
pub struct Legalizer<O = FixedLimit> {
    platform: Platform,
    oracle: O,
}

impl<O: LengthOracle> Legalizer<O> {
    pub fn new(platform: Platform, oracle: O) -> Self {
        Self { platform, oracle }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Current limit, straight from the oracle.
    pub fn max_filename_length(&self) -> usize {
        self.oracle.max_filename_length()
    }

    pub fn sanitize(&self, path: &str, rules: &[Replacement]) -> String {
        sanitize_path(path, self.platform, rules)
    }

    pub fn truncate(&self, path: &str) -> String {
        truncate_path_to(path, self.platform, self.max_filename_length())
    }

    /// Legalize `path`, trying each candidate rule set against the original
    /// input until one fits.
    ///
    /// At most two candidates are tried. When they overflow (or there are
    /// none left) the path is sanitized with `default` and truncated, and
    /// the result is flagged `truncated`. A result that fits through
    /// substitution alone is never flagged. With no candidates, the
    /// built-in sanitization is the only candidate.
    ///
    /// `default` must be short enough that truncation alone makes it fit.
    pub fn legalize_path(
        &self,
        path: &str,
        candidates: &[Vec<Replacement>],
        default: &[Replacement],
    ) -> Legalized {
        let limit = self.max_filename_length();
        let builtins_only = [Vec::new()];
        let candidates = if candidates.is_empty() {
            &builtins_only[..]
        } else {
            candidates
        };

        let mut overflows = 0;
        let mut step = Step::TryCandidate(0);
        loop {
            step = match step {
                Step::TryCandidate(i) => {
                    let candidate = self.sanitize(path, &candidates[i]);
                    if fits(&candidate, self.platform, limit) {
                        Step::Done(Legalized::new(candidate, false))
                    } else {
                        overflows += 1;
                        tracing::trace!(candidate = i, overflows, "candidate exceeds {limit} bytes");
                        if overflows >= MAX_CANDIDATE_ROUNDS || i + 1 >= candidates.len() {
                            Step::Truncate
                        } else {
                            Step::TryCandidate(i + 1)
                        }
                    }
                }
                Step::Truncate => {
                    let fallback = self.sanitize(path, default);
                    let truncated = self.cut(&fallback, limit);
                    tracing::debug!("Falling back to default rules for {:?}", path);
                    Step::Done(Legalized::new(truncated, true))
                }
                Step::Done(result) => return result,
            };
        }
    }

    /// Legalize a templated destination that will carry `extension`
    /// (including its leading dot, or empty).
    ///
    /// Each stage sanitizes, appends the lowercased extension and truncates.
    /// Stage two re-sanitizes stage one's output, since truncation can
    /// expose text the rules would rewrite. If stage two still needs
    /// truncation the rules are lengthening the name again, so they are
    /// discarded and a final stage runs with the default rules; only then
    /// is the result flagged `truncated`.
    ///
    /// `rules` of `None` means the default rules.
    pub fn legalize_destination(
        &self,
        path: &str,
        rules: Option<&[Replacement]>,
        extension: &str,
    ) -> Legalized {
        let limit = self.max_filename_length();
        let rules = rules.unwrap_or(Replacement::defaults());
        let extension = extension.to_lowercase();

        let (first, _) = self.stage(path, rules, &extension, limit);
        let first = first
            .strip_suffix(extension.as_str())
            .map(str::to_string)
            .unwrap_or(first);

        let (second, truncated) = self.stage(&first, rules, &extension, limit);
        if !truncated {
            return Legalized::new(second, false);
        }

        tracing::debug!("Replacements fought truncation for {:?}, using defaults", path);
        let (last, _) = self.stage(&first, Replacement::defaults(), &extension, limit);
        Legalized::new(last, true)
    }

    /// One sanitize/extend/truncate pass. Reports whether truncation changed anything.
    fn stage(
        &self,
        path: &str,
        rules: &[Replacement],
        extension: &str,
        limit: usize,
    ) -> (String, bool) {
        let mut sanitized = self.sanitize(path, rules);
        sanitized.push_str(extension);
        let truncated = truncate_path_to(&sanitized, self.platform, limit);
        let changed = truncated != sanitized;
        if changed {
            (self.cut(&sanitized, limit), true)
        } else {
            (truncated, false)
        }
    }

    /// Truncate, then clear trailing characters the cut exposed.
    fn cut(&self, path: &str, limit: usize) -> String {
        let truncated = truncate_path_to(path, self.platform, limit);
        self.platform.join(
            self.platform
                .segments(&truncated)
                .map(|segment| self.platform.trim_after_cut(segment)),
        )
    }
}

impl Default for Legalizer<FixedLimit> {
    fn default() -> Self {
        Self::new(Platform::current(), FixedLimit::default())
    }
}
