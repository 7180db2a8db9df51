//! Error types for the PIG library.
//!
//! This module defines all error types that can occur while bundling icon
//! directories into iconset documents and splitting them back apart.

use std::path::PathBuf;
use thiserror::Error;

pub type IconResult<T> = Result<T, IconError>;

/// Errors that can occur during iconset generation and splitting.
#[derive(Error, Debug)]
pub enum IconError {
    /// A candidate file did not contain an `<svg>` element.
    #[error("{file} did not contain a valid svg element")]
    MalformedSvg {
        /// Name of the offending file.
        file: String,
    },

    /// The source directory could not be listed.
    #[error("cannot read directory {}: {source}", path.display())]
    DirectoryNotFound {
        /// The directory that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// An input file could not be read.
    #[error("cannot read file {}: {source}", path.display())]
    FileNotFound {
        /// The file that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The input passed to an operation has the wrong type.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The markup normalizer rejected its input.
    #[error("cleaner error: {0}")]
    Cleaner(String),

    /// The container document has no recognizable iconset structure.
    #[error("malformed iconset document: {0}")]
    MalformedContainer(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
