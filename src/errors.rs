/*!
 * Error types for the renumtex application.
 *
 * This module contains custom error types for the renumbering core and the
 * application shell, using the thiserror crate for ergonomic error definitions.
 */

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while renumbering labels
#[derive(Error, Debug)]
pub enum RenumberError {
    /// A metadata or source file could not be read, or a source file could not be written back
    #[error("Cannot access file {}: {source}", .path.display())]
    MissingFile {
        /// Path of the unreachable file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A source file was modified by someone else between reading and saving
    #[error("File changed on disk since it was read: {}", .path.display())]
    ChangedOnDisk {
        /// Path of the modified file
        path: PathBuf,
    },

    /// An exclusion pattern or command name produced an invalid regular expression
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern text
        pattern: String,
        /// Regex compilation error
        #[source]
        source: regex::Error,
    },

    /// Configuration values that cannot be used
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RenumberError {
    /// Wrap an I/O failure on `path`
    pub fn missing_file<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::MissingFile {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Path of the unreachable file, if this is a file error
    pub fn missing_path(&self) -> Option<&Path> {
        match self {
            Self::MissingFile { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the renumbering core
    #[error("Renumber error: {0}")]
    Renumber(#[from] RenumberError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

/// Result alias for the renumbering core
pub type Result<T> = std::result::Result<T, RenumberError>;
