//! Error types for rails-tsp.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rails-tsp operations.
///
/// Precondition, file-system and render problems surface here. Parsing
/// degrades to "nothing extracted" instead of failing.
#[derive(Debug, Error)]
pub enum TspError {
    /// Target exists and neither overwrite nor append was requested.
    #[error(
        "Output file already exists: {}. Use --force to overwrite or --append to append.",
        path.display()
    )]
    OutputExists { path: PathBuf },

    /// No schema.rb found in any search location.
    #[error("rails schema.rb not found (searched: {})", searched.join(", "))]
    SchemaNotFound { searched: Vec<String> },

    /// Existing output has no closing brace to splice before.
    #[error("Cannot append to {}: no closing brace found", path.display())]
    MalformedOutput { path: PathBuf },

    /// Failed to read a file.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The document writer reported a formatting failure.
    #[error("Failed to render document: {0}")]
    Render(#[from] std::fmt::Error),
}

impl TspError {
    /// Create a read error for the given path.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a write error for the given path.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for rails-tsp operations.
pub type TspResult<T> = Result<T, TspError>;
