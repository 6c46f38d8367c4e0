//! Crate-wide error types.
//!
//! Library modules return [`Error`] through the [`Result`] alias; the
//! binary wraps everything in `anyhow` at the top level.
//!
//! # Design
//!
//! - [`Error::InvalidArgument`] is the only error the pure core produces
//!   (asking for the plurality of an empty sequence). Path legalization
//!   and truncation are total.
//! - The remaining variants belong to the outer surfaces: compiling
//!   user-supplied replacement rules and reading tags.
//!
//! # Example
//!
//! ```
//! use tagpath::consensus::plurality;
//! use tagpath::error::Error;
//!
//! let err = plurality(Vec::<u32>::new()).unwrap_err();
//! assert!(matches!(err, Error::InvalidArgument(_)));
//! ```

use std::path::PathBuf;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller handed an argument with no meaningful answer
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A replacement rule pattern failed to compile
    #[error("Invalid replacement pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Tag reading error
    #[error("Metadata error for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a metadata error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}
