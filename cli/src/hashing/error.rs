//! Error types for streaming hash computation.
//!
//! Hashing errors are never retried by the prompt loop: they describe a file
//! system or argument problem that re-reading the same input cannot fix.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising while hashing a file or a package entry.
#[derive(Debug, Error)]
pub enum HashError {
    /// The file could not be opened or read, or the archive is corrupt.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being hashed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The caller supplied an argument the operation cannot accept.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the rejected argument.
        reason: String,
    },

    /// The hashing machinery was left in an unusable state.
    #[error("invalid hashing state: {reason}")]
    InvalidState {
        /// Description of what went wrong.
        reason: String,
    },
}

impl HashError {
    /// Build a closure that wraps an I/O error with the path being hashed.
    pub(crate) fn io(path: &camino::Utf8Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_owned(),
            source,
        }
    }
}

/// Result type alias using [`HashError`].
pub type Result<T> = std::result::Result<T, HashError>;
