//! Unified error types for namaste-map.
//!
//! Every failure in a mapping run is fatal. The variants carry the table
//! name and row/entry that triggered them so a run can be diagnosed from
//! the message alone.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for namaste-map operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MapperError {
    /// A required input table could not be located or read
    #[error("Missing input table '{table}' at {}: {source}", .path.display())]
    MissingInputTable {
        table: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input table was readable but malformed
    #[error("Failed to parse table '{table}'{}: {message}", fmt_row(.row))]
    Parse {
        table: String,
        row: Option<usize>,
        message: String,
    },

    /// A reference table has zero rows
    #[error("Reference table '{table}' has no rows")]
    EmptyReferenceTable { table: String },

    /// The source table has zero rows (only when configured as fatal)
    #[error("Source table '{table}' has no rows")]
    EmptySourceTable { table: String },

    /// Embedding vectors of inconsistent length
    #[error("Embedding dimension mismatch for {entry}: expected {expected}, got {actual}")]
    DimensionMismatch {
        entry: String,
        expected: usize,
        actual: usize,
    },

    /// Schema incompatibility or invalid settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The embedding provider failed or broke its contract
    #[error("Embedding failed: {context}")]
    Embedding {
        context: String,
        #[source]
        source: EmbeddingErrorKind,
    },

    /// IO errors while writing output
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization of output records failed
    #[error("Report generation failed: {0}")]
    Report(String),
}

fn fmt_row(row: &Option<usize>) -> String {
    row.map(|r| format!(" at row {r}")).unwrap_or_default()
}

/// Specific embedding error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EmbeddingErrorKind {
    #[error("Model could not be loaded: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Provider returned {actual} vectors for {expected} texts")]
    BatchLength { expected: usize, actual: usize },

    #[error("Vector contains a non-finite value at component {component}")]
    NonFinite { component: usize },

    #[error("Provider not available: {0}")]
    Unavailable(String),
}

/// Convenient Result type for namaste-map operations
pub type Result<T> = std::result::Result<T, MapperError>;

/// Process exit codes for CLI callers
pub mod exit_codes {
    /// Mapping completed and output was written
    pub const SUCCESS: i32 = 0;
    /// Unclassified failure
    pub const FAILURE: i32 = 1;
    /// Input table or configuration problem
    pub const INPUT_ERROR: i32 = 2;
    /// Embedding or matching failure
    pub const MATCH_ERROR: i32 = 3;
}

impl MapperError {
    /// Create a missing-table error from an IO failure
    pub fn missing_table(
        table: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::MissingInputTable {
            table: table.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a parse error, optionally pinned to a 1-based data row
    pub fn parse(table: impl Into<String>, row: Option<usize>, message: impl Into<String>) -> Self {
        Self::Parse {
            table: table.into(),
            row,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an embedding error
    pub fn embedding(context: impl Into<String>, source: EmbeddingErrorKind) -> Self {
        Self::Embedding {
            context: context.into(),
            source,
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(entry: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            entry: entry.into(),
            expected,
            actual,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            message: source.to_string(),
            source,
        }
    }

    /// Exit code a CLI should terminate with for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::MissingInputTable { .. }
            | Self::Parse { .. }
            | Self::EmptyReferenceTable { .. }
            | Self::EmptySourceTable { .. }
            | Self::Configuration(_) => exit_codes::INPUT_ERROR,
            Self::DimensionMismatch { .. } | Self::Embedding { .. } => exit_codes::MATCH_ERROR,
            Self::Io { .. } | Self::Report(_) => exit_codes::FAILURE,
        }
    }
}

impl From<serde_json::Error> for MapperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Report(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table_display_names_table_and_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = MapperError::missing_table("TM2", "/data/tm2.csv", io_err);
        let display = err.to_string();
        assert!(display.contains("TM2"), "{display}");
        assert!(display.contains("/data/tm2.csv"), "{display}");
    }

    #[test]
    fn test_parse_error_row_context() {
        let err = MapperError::parse("NAMASTE", Some(7), "too many fields");
        assert_eq!(
            err.to_string(),
            "Failed to parse table 'NAMASTE' at row 7: too many fields"
        );

        let err = MapperError::parse("NAMASTE", None, "bad header");
        assert_eq!(err.to_string(), "Failed to parse table 'NAMASTE': bad header");
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = MapperError::dimension_mismatch("source N1", 384, 12);
        let display = err.to_string();
        assert!(display.contains("source N1"));
        assert!(display.contains("384"));
        assert!(display.contains("12"));
    }

    #[test]
    fn test_exit_codes_by_class() {
        assert_eq!(
            MapperError::EmptyReferenceTable {
                table: "MMS".into()
            }
            .exit_code(),
            exit_codes::INPUT_ERROR
        );
        assert_eq!(
            MapperError::config("bad").exit_code(),
            exit_codes::INPUT_ERROR
        );
        assert_eq!(
            MapperError::dimension_mismatch("x", 1, 2).exit_code(),
            exit_codes::MATCH_ERROR
        );
        assert_eq!(
            MapperError::embedding("batch", EmbeddingErrorKind::Inference("oom".into()))
                .exit_code(),
            exit_codes::MATCH_ERROR
        );
        assert_eq!(
            MapperError::Report("x".into()).exit_code(),
            exit_codes::FAILURE
        );
    }

    #[test]
    fn test_embedding_error_source_chain() {
        use std::error::Error as _;
        let err = MapperError::embedding(
            "reference batch",
            EmbeddingErrorKind::BatchLength {
                expected: 3,
                actual: 2,
            },
        );
        let source = err.source().map(ToString::to_string).unwrap_or_default();
        assert!(source.contains("2 vectors for 3 texts"), "{source}");
    }
}
