//! DataFrame helpers shared by the stages.

use polars::prelude::{AnyValue, BooleanChunked, Column, DataFrame, NewChunkedArray};

use cademy_common::any_to_string_non_empty;

use crate::error::{CleanseError, Result};

/// Returns the named column or a [`CleanseError::MissingColumn`].
pub(crate) fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| CleanseError::MissingColumn {
        column: name.to_string(),
    })
}

/// Reads a column as text, with null and blank cells as `None`.
pub(crate) fn text_cells(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = require_column(df, name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_string_non_empty(series.get(idx)?));
    }
    Ok(values)
}

/// Marks the rows where the named column is null.
pub(crate) fn null_mask(df: &DataFrame, name: &str) -> Result<Vec<bool>> {
    let series = require_column(df, name)?;
    let mut mask = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        mask.push(matches!(series.get(idx)?, AnyValue::Null));
    }
    Ok(mask)
}

/// Keeps the rows whose flag is set.
pub(crate) fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}

pub(crate) fn invert(mask: &[bool]) -> Vec<bool> {
    mask.iter().map(|flag| !flag).collect()
}
