//! Student record cleansing.
//!
//! Turns the raw student table into three frames: cleansed records with
//! derived columns, rejected records with missing course or job data, and
//! quarantined records whose fields could not be interpreted.
//!
//! # Overview
//!
//! This crate provides:
//! - **Pipeline**: [`cleanse_students`] runs the five stages in order
//! - **Stages**: each stage as a standalone function over a `DataFrame`
//! - **Literal parsing**: the mapping-literal parser used for `contact_info`
//!
//! # Example
//!
//! ```ignore
//! use chrono::NaiveDate;
//! use cademy_model::CleanseOptions;
//! use cademy_transform::cleanse_students;
//!
//! let options = CleanseOptions::new()
//!     .with_reference_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
//! let output = cleanse_students(raw, &options)?;
//! assert!(output.report.is_balanced());
//! ```

mod error;
mod frame;
mod pipeline;

pub mod literal;
pub mod stages;

// Error types
pub use error::{CleanseError, RecordError, Result};

// Pipeline
pub use pipeline::{CleanseOutput, cleanse_students, default_reference_date};

// Stage functions
pub use stages::{
    AddressOutcome, ContactOutcome, Partition, RowFailure, SplitAddress, age_group, age_on,
    coerce_numeric, derive_age, flatten_contact_info, normalize_numeric_columns, parse_dob,
    partition_missing, split_address, split_mailing_address,
};

// Literal parsing
pub use literal::{LiteralError, parse_literal, parse_mapping_literal};
