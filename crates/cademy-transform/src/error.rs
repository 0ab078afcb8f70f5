//! Error types for the cleansing pipeline.

use polars::prelude::PolarsError;
use thiserror::Error;

use cademy_model::Stage;

use crate::literal::LiteralError;

/// A field in one record could not be interpreted.
///
/// Record errors never abort a stage on their own; the pipeline decides
/// whether to quarantine the record or fail the batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// `dob` is missing, unparseable, or later than the reference date.
    #[error("malformed date of birth '{value}': {reason}")]
    MalformedDate { value: String, reason: &'static str },

    /// `contact_info` is not a mapping literal.
    #[error("malformed contact_info: {source}")]
    MalformedContactInfo {
        #[source]
        source: LiteralError,
    },

    /// `mailing_address` does not have exactly four segments (strict policy).
    #[error("malformed mailing_address: expected 4 comma-separated segments, found {segments}")]
    MalformedAddress { segments: usize },

    /// A numeric column holds a non-numeric value.
    #[error("cannot coerce {column} value '{value}' to a number")]
    TypeCoercion { column: &'static str, value: String },
}

/// Errors that abort a cleansing run.
#[derive(Debug, Error)]
pub enum CleanseError {
    /// A column the current stage needs is absent.
    #[error("required column '{column}' not found")]
    MissingColumn { column: String },

    /// A record failed while the fail-fast policy is active.
    #[error("record {row} failed in {stage}: {source}")]
    Record {
        /// Zero-based row index in the input batch.
        row: usize,
        stage: Stage,
        #[source]
        source: RecordError,
    },

    /// Underlying Polars operation failed.
    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] PolarsError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, CleanseError>;
