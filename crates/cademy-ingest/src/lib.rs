//! Student table ingestion.
//!
//! Loads the raw student table from CSV into a Polars `DataFrame` and
//! checks that the columns the cleansing pipeline needs are present.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cademy_ingest::{read_student_table, validate_required_columns};
//!
//! let df = read_student_table(Path::new("data/students.csv"))?;
//! validate_required_columns(&df)?;
//! ```

mod csv;
mod error;
mod schema;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, read_csv_headers,
    read_student_table, validate_encoding,
};

// === Schema Checks ===
pub use schema::{missing_required_columns, validate_required_columns};
