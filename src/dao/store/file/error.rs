//! Error types shared by the JSON file storage implementation.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Convenient result alias returning [`FileDaoError`] failures.
pub type FileResult<T> = Result<T, FileDaoError>;

/// Failures that can occur while reading or writing the store file.
#[derive(Debug, Error)]
pub enum FileDaoError {
    /// The store file exists but could not be read.
    #[error("failed to read store file `{}`", .path.display())]
    Read {
        /// Location of the store file.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// The store file (or its temporary sibling) could not be written.
    #[error("failed to write store file `{}`", .path.display())]
    Write {
        /// Location of the store file.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// The store file does not contain a valid document.
    #[error("failed to decode store file `{}`", .path.display())]
    Decode {
        /// Location of the store file.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
    /// The in-memory document could not be encoded.
    #[error("failed to encode store document")]
    Encode {
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
}
