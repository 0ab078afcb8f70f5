//! The five cleansing stages.
//!
//! Stages 1-4 work on the batch in place and report the rows they could
//! not interpret as [`RowFailure`]s; the pipeline decides what happens to
//! those rows. Stage 5 splits the batch into cleansed and rejected frames.

pub mod address;
pub mod age;
pub mod contact;
pub mod missing;
pub mod numeric;

use crate::error::RecordError;

/// A row a stage could not process, by index in the stage's input frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    pub row: usize,
    pub error: RecordError,
}

impl RowFailure {
    pub fn new(row: usize, error: RecordError) -> Self {
        Self { row, error }
    }
}

pub use address::{AddressOutcome, SplitAddress, split_address, split_mailing_address};
pub use age::{age_group, age_on, derive_age, parse_dob};
pub use contact::{ContactOutcome, flatten_contact_info};
pub use missing::{Partition, partition_missing};
pub use numeric::{coerce_numeric, normalize_numeric_columns};
