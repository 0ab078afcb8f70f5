//! Type Normalizer: coerces the id, count and hours columns to Float64.

use std::collections::BTreeMap;

use polars::prelude::{AnyValue, DataFrame, NamedFrom, Series};

use cademy_common::{any_to_string, is_missing_marker};
use cademy_model::schema::NUMERIC_COLUMNS;

use super::RowFailure;
use crate::error::{RecordError, Result};
use crate::frame::require_column;

/// Converts one cell to a float.
///
/// Nulls, NaN, blank text and missing markers (`nan`, `None`, ...) become
/// `None`. Booleans count as 1.0 and 0.0. Text that is not a number is
/// returned as the error value.
pub fn coerce_numeric(value: AnyValue<'_>) -> std::result::Result<Option<f64>, String> {
    let number = match value {
        AnyValue::Null => return Ok(None),
        AnyValue::Boolean(flag) => f64::from(u8::from(flag)),
        AnyValue::Int8(v) => f64::from(v),
        AnyValue::Int16(v) => f64::from(v),
        AnyValue::Int32(v) => f64::from(v),
        AnyValue::Int64(v) => v as f64,
        AnyValue::UInt8(v) => f64::from(v),
        AnyValue::UInt16(v) => f64::from(v),
        AnyValue::UInt32(v) => f64::from(v),
        AnyValue::UInt64(v) => v as f64,
        AnyValue::Float32(v) => f64::from(v),
        AnyValue::Float64(v) => v,
        AnyValue::String(s) => return parse_text(s),
        AnyValue::StringOwned(ref s) => return parse_text(s.as_str()),
        other => return Err(any_to_string(other)),
    };
    Ok((!number.is_nan()).then_some(number))
}

fn parse_text(text: &str) -> std::result::Result<Option<f64>, String> {
    if is_missing_marker(text) {
        return Ok(None);
    }
    match text.trim().parse::<f64>() {
        Ok(number) if number.is_nan() => Ok(None),
        Ok(number) => Ok(Some(number)),
        Err(_) => Err(text.to_string()),
    }
}

/// Replaces each numeric column with a Float64 version.
///
/// A row with several bad cells is reported once, for the first column in
/// [`NUMERIC_COLUMNS`] order. Bad cells become null.
pub fn normalize_numeric_columns(df: &mut DataFrame) -> Result<Vec<RowFailure>> {
    let mut failed: BTreeMap<usize, RecordError> = BTreeMap::new();

    for name in NUMERIC_COLUMNS {
        let column = require_column(df, name)?;
        let mut values: Vec<Option<f64>> = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            match coerce_numeric(column.get(row)?) {
                Ok(value) => values.push(value),
                Err(value) => {
                    values.push(None);
                    failed
                        .entry(row)
                        .or_insert(RecordError::TypeCoercion { column: name, value });
                }
            }
        }
        df.with_column(Series::new(name.into(), values))?;
    }

    Ok(failed
        .into_iter()
        .map(|(row, error)| RowFailure::new(row, error))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, DataType, IntoColumn};

    #[test]
    fn coerces_native_values() {
        assert_eq!(coerce_numeric(AnyValue::Int64(7)), Ok(Some(7.0)));
        assert_eq!(coerce_numeric(AnyValue::Float64(2.5)), Ok(Some(2.5)));
        assert_eq!(coerce_numeric(AnyValue::Boolean(true)), Ok(Some(1.0)));
        assert_eq!(coerce_numeric(AnyValue::Null), Ok(None));
        assert_eq!(coerce_numeric(AnyValue::Float64(f64::NAN)), Ok(None));
    }

    #[test]
    fn coerces_text() {
        assert_eq!(coerce_numeric(AnyValue::String(" 12 ")), Ok(Some(12.0)));
        assert_eq!(coerce_numeric(AnyValue::String("3.75")), Ok(Some(3.75)));
        assert_eq!(coerce_numeric(AnyValue::String("NaN")), Ok(None));
        assert_eq!(coerce_numeric(AnyValue::String("None")), Ok(None));
        assert_eq!(coerce_numeric(AnyValue::String("")), Ok(None));
        assert_eq!(
            coerce_numeric(AnyValue::String("twelve")),
            Err("twelve".to_string())
        );
    }

    fn numeric_frame(job_id: Vec<Option<&str>>, hours: Vec<Option<&str>>) -> DataFrame {
        let height = job_id.len();
        let columns: Vec<Column> = vec![
            Series::new("job_id".into(), job_id).into_column(),
            Series::new(
                "current_career_path_id".into(),
                vec![Some(1i64); height],
            )
            .into_column(),
            Series::new("num_course_taken".into(), vec![Some(3.0f64); height]).into_column(),
            Series::new("time_spent_hrs".into(), hours).into_column(),
        ];
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn normalizes_all_columns_to_float() {
        let mut df = numeric_frame(vec![Some("2"), None], vec![Some("4.5"), Some("nan")]);
        let failures = normalize_numeric_columns(&mut df).unwrap();

        assert!(failures.is_empty());
        for name in NUMERIC_COLUMNS {
            assert_eq!(df.column(name).unwrap().dtype(), &DataType::Float64);
        }
        let job = df.column("job_id").unwrap().f64().unwrap();
        assert_eq!(job.get(0), Some(2.0));
        assert_eq!(job.get(1), None);
        let hours = df.column("time_spent_hrs").unwrap().f64().unwrap();
        assert_eq!(hours.get(1), None);
    }

    #[test]
    fn reports_each_row_once() {
        let mut df = numeric_frame(
            vec![Some("x"), Some("1"), Some("2")],
            vec![Some("y"), Some("1"), Some("many")],
        );
        let failures = normalize_numeric_columns(&mut df).unwrap();

        assert_eq!(
            failures,
            vec![
                RowFailure::new(
                    0,
                    RecordError::TypeCoercion {
                        column: "job_id",
                        value: "x".to_string(),
                    }
                ),
                RowFailure::new(
                    2,
                    RecordError::TypeCoercion {
                        column: "time_spent_hrs",
                        value: "many".to_string(),
                    }
                ),
            ]
        );
    }
}
