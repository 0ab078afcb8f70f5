//! Address Splitter: `mailing_address` into street, city, state and zip code.

use polars::prelude::{DataFrame, NamedFrom, Series};

use cademy_model::AddressPolicy;
use cademy_model::schema::{ADDRESS_COMPONENTS, MAILING_ADDRESS};

use super::RowFailure;
use crate::error::{RecordError, Result};
use crate::frame::text_cells;

const COMPONENT_COUNT: usize = ADDRESS_COMPONENTS.len();

/// A mailing address split into positional components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitAddress {
    /// Street, city, state, zip code. Blank segments are `None`.
    pub parts: [Option<String>; COMPONENT_COUNT],
    /// Number of comma-separated segments in the source text.
    pub segments: usize,
}

impl SplitAddress {
    /// Fewer than four segments; trailing components are null.
    pub fn is_padded(&self) -> bool {
        self.segments < COMPONENT_COUNT
    }

    /// More than four segments; the extras were dropped.
    pub fn is_truncated(&self) -> bool {
        self.segments > COMPONENT_COUNT
    }
}

/// Splits an address on commas and assigns the trimmed segments positionally.
///
/// Under [`AddressPolicy::Strict`] anything other than exactly four
/// segments is a [`RecordError::MalformedAddress`].
pub fn split_address(
    value: &str,
    policy: AddressPolicy,
) -> std::result::Result<SplitAddress, RecordError> {
    let segments: Vec<&str> = value.split(',').map(str::trim).collect();
    if policy == AddressPolicy::Strict && segments.len() != COMPONENT_COUNT {
        return Err(RecordError::MalformedAddress {
            segments: segments.len(),
        });
    }

    let mut parts: [Option<String>; COMPONENT_COUNT] = Default::default();
    for (slot, segment) in parts.iter_mut().zip(&segments) {
        if !segment.is_empty() {
            *slot = Some((*segment).to_string());
        }
    }
    Ok(SplitAddress {
        parts,
        segments: segments.len(),
    })
}

/// Result of splitting `mailing_address` over the batch.
#[derive(Debug, Clone, Default)]
pub struct AddressOutcome {
    pub padded: usize,
    pub truncated: usize,
    pub failures: Vec<RowFailure>,
}

/// Replaces `mailing_address` with `street`, `city`, `state` and `zip_code`.
///
/// Null addresses give four nulls. Rows rejected by the policy get nulls
/// and are returned as failures.
pub fn split_mailing_address(
    df: &mut DataFrame,
    policy: AddressPolicy,
) -> Result<AddressOutcome> {
    let cells = text_cells(df, MAILING_ADDRESS)?;
    let mut components: [Vec<Option<String>>; COMPONENT_COUNT] = Default::default();
    let mut outcome = AddressOutcome::default();

    for (row, cell) in cells.iter().enumerate() {
        let split = match cell.as_deref().map(|text| split_address(text, policy)) {
            None => None,
            Some(Ok(split)) => Some(split),
            Some(Err(error)) => {
                outcome.failures.push(RowFailure::new(row, error));
                None
            }
        };
        let parts = match split {
            Some(split) => {
                outcome.padded += usize::from(split.is_padded());
                outcome.truncated += usize::from(split.is_truncated());
                split.parts
            }
            None => Default::default(),
        };
        for (column, part) in components.iter_mut().zip(parts) {
            column.push(part);
        }
    }

    df.drop_in_place(MAILING_ADDRESS)?;
    for (name, values) in ADDRESS_COMPONENTS.iter().zip(components) {
        df.with_column(Series::new((*name).into(), values))?;
    }
    Ok(outcome)
}
