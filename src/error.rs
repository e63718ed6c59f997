// In: src/error.rs

//! This module defines the single, unified error type for the parquet-rows library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every variant classifies into one [`ErrorKind`], the small taxonomy a request
//! layer maps onto its own responses (not-found, bad request, generic failure).

use std::path::PathBuf;

use thiserror::Error;

/// The coarse failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The file could not be opened, or its header, schema or a row group could not be decoded.
    Decode,
    /// A decoded segment violated the column-length or column-type contract.
    MalformedSegment,
    /// The requested file does not exist below the data root.
    NotFound,
    /// The request itself was unusable (e.g. a path escaping the data root).
    InvalidRequest,
    /// Rows could not be rendered to text.
    Encode,
    /// The reader configuration was rejected.
    Config,
}

#[derive(Error, Debug)]
pub enum RowsError {
    // =========================================================================
    // === High-Level, Semantic Errors
    // =========================================================================
    #[error("Malformed segment {segment_index}: {reason}")]
    MalformedSegment {
        segment_index: usize,
        reason: String,
    },

    #[error("Unsupported data type for field '{field}': {data_type}")]
    UnsupportedType { field: String, data_type: String },

    #[error("Segment index {index} is out of range (file has {count} segments)")]
    SegmentOutOfRange { index: usize, count: usize },

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error originating from the Parquet reader (bad footer, corrupt page, ...).
    #[error("Parquet operation failed: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// An error originating from the underlying I/O subsystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, raised while encoding rows or reading config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl RowsError {
    /// Shorthand for building a [`RowsError::MalformedSegment`].
    pub fn malformed(segment_index: usize, reason: impl Into<String>) -> Self {
        RowsError::MalformedSegment {
            segment_index,
            reason: reason.into(),
        }
    }

    /// Classifies this error into the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RowsError::MalformedSegment { .. } => ErrorKind::MalformedSegment,
            RowsError::UnsupportedType { .. }
            | RowsError::SegmentOutOfRange { .. }
            | RowsError::Arrow(_)
            | RowsError::Parquet(_)
            | RowsError::Io(_) => ErrorKind::Decode,
            RowsError::NotFound(_) => ErrorKind::NotFound,
            RowsError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            RowsError::SerdeJson(_) => ErrorKind::Encode,
            RowsError::Config(_) => ErrorKind::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let malformed = RowsError::malformed(2, "length mismatch");
        assert_eq!(malformed.kind(), ErrorKind::MalformedSegment);
        assert!(malformed.to_string().contains("segment 2"));

        let io = RowsError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.kind(), ErrorKind::Decode);

        let missing = RowsError::NotFound(PathBuf::from("static_files/x.parquet"));
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert!(missing.to_string().contains("x.parquet"));
    }
}
