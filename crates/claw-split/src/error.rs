//! Error types for the log splitter.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while splitting a log stream.
///
/// Every variant is fatal for the run; the binary reports it once and exits.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Wrong command-line usage.
    #[error("usage: {0}")]
    Usage(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O operation on `path` failed.
    #[error("{action} {}: {source}", path.display())]
    Io {
        /// What was being done, e.g. "failed to create".
        action: &'static str,
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Reading the input stream failed.
    #[error("line {line}: failed to read input: {source}")]
    Read {
        /// 1-based number of the line being read.
        line: u64,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A payload line did not decode to `{"log": <string>}`.
    #[error("line {line}: malformed payload: {source}")]
    MalformedPayload {
        /// 1-based input line number.
        line: u64,
        /// The decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// A boundary marker did not carry a usable container name.
    #[error("line {line}: malformed container marker: {reason}")]
    MalformedMarker {
        /// 1-based input line number.
        line: u64,
        /// Why the marker was rejected.
        reason: String,
    },

    /// A payload line appeared before the first boundary marker.
    #[error("line {line}: payload before any container marker")]
    PayloadBeforeMarker {
        /// 1-based input line number.
        line: u64,
    },
}

impl SplitError {
    /// Wraps an I/O error with the action and path it relates to.
    pub fn io(action: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type alias for split operations.
pub type Result<T> = std::result::Result<T, SplitError>;
