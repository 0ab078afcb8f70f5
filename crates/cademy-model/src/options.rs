//! Configuration options for a cleansing run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What to do with a record whose fields cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Move the record to the errors table and keep processing the batch.
    #[default]
    Quarantine,
    /// Abort the whole batch on the first malformed record.
    FailFast,
}

/// How mailing addresses with an irregular segment count are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressPolicy {
    /// Pad missing trailing components with null and drop extra segments.
    #[default]
    Lenient,
    /// Require exactly four segments; anything else is a malformed address.
    Strict,
}

/// Options controlling a cleansing run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanseOptions {
    /// Date ages are computed against. Defaults to today (local time).
    pub reference_date: Option<NaiveDate>,

    /// Record-level error handling.
    pub error_policy: ErrorPolicy,

    /// Segment-count handling for `mailing_address`.
    pub address_policy: AddressPolicy,
}

impl CleanseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the reference date used by the age deriver.
    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    #[must_use]
    pub fn with_address_policy(mut self, policy: AddressPolicy) -> Self {
        self.address_policy = policy;
        self
    }

    /// Options with every check at its strictest: fail fast, strict addresses.
    pub fn strict() -> Self {
        Self {
            reference_date: None,
            error_policy: ErrorPolicy::FailFast,
            address_policy: AddressPolicy::Strict,
        }
    }
}
