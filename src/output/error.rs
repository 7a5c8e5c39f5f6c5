//! Error types for reading and writing result files.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while persisting or reading back result tables.
#[derive(Debug, Error)]
pub enum PersistError {
    /// File system error (create directory, create file, write, etc.)
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding error.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// The requested column is not in the file's header.
    #[error("column '{column}' not found in {path}")]
    MissingColumn {
        /// The file that was read.
        path: PathBuf,
        /// The column that was asked for.
        column: String,
    },
}

impl PersistError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a CSV error.
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Creates a missing-column error.
    pub fn missing_column(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            path: path.into(),
            column: column.into(),
        }
    }
}
