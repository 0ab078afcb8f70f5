//! Ordered stages of the cleansing pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A pipeline stage. Stages run in declaration order; each one depends on
/// the columns produced by the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Computes `age` and `age_group` from `dob`.
    AgeDeriver,
    /// Promotes the keys of `contact_info` to columns.
    ContactFlattener,
    /// Splits `mailing_address` into street, city, state and zip code.
    AddressSplitter,
    /// Coerces the numeric columns to Float64.
    TypeNormalizer,
    /// Moves incomplete records to the rejected table and fills defaults.
    MissingDataPartitioner,
}

impl Stage {
    /// Stages that parse record fields and may quarantine records.
    pub const RECORD_STAGES: [Stage; 4] = [
        Stage::AgeDeriver,
        Stage::ContactFlattener,
        Stage::AddressSplitter,
        Stage::TypeNormalizer,
    ];

    /// All stages in execution order.
    pub const ALL: [Stage; 5] = [
        Stage::AgeDeriver,
        Stage::ContactFlattener,
        Stage::AddressSplitter,
        Stage::TypeNormalizer,
        Stage::MissingDataPartitioner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::AgeDeriver => "age_deriver",
            Stage::ContactFlattener => "contact_flattener",
            Stage::AddressSplitter => "address_splitter",
            Stage::TypeNormalizer => "type_normalizer",
            Stage::MissingDataPartitioner => "missing_data_partitioner",
        }
    }

    /// Human-readable label for summaries.
    pub fn label(self) -> &'static str {
        match self {
            Stage::AgeDeriver => "Age Deriver",
            Stage::ContactFlattener => "Contact Flattener",
            Stage::AddressSplitter => "Address Splitter",
            Stage::TypeNormalizer => "Type Normalizer",
            Stage::MissingDataPartitioner => "Missing-Data Partitioner",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
