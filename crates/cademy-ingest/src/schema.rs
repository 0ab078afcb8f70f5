//! Required-column checks for the raw student table.

use polars::prelude::DataFrame;

use cademy_model::schema::REQUIRED_INPUT_COLUMNS;

use crate::error::{IngestError, Result};

/// Returns the required raw columns absent from the frame, in schema order.
pub fn missing_required_columns(df: &DataFrame) -> Vec<&'static str> {
    REQUIRED_INPUT_COLUMNS
        .iter()
        .copied()
        .filter(|name| df.column(name).is_err())
        .collect()
}

/// Fails with [`IngestError::MissingColumn`] naming the first absent required column.
pub fn validate_required_columns(df: &DataFrame) -> Result<()> {
    match missing_required_columns(df).first() {
        Some(column) => Err(IngestError::MissingColumn {
            column: (*column).to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    fn frame(names: &[&str]) -> DataFrame {
        let columns: Vec<Column> = names
            .iter()
            .map(|name| Series::new((*name).into(), vec!["x"]).into_column())
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn all_required_present() {
        let df = frame(&REQUIRED_INPUT_COLUMNS);
        assert!(missing_required_columns(&df).is_empty());
        assert!(validate_required_columns(&df).is_ok());
    }

    #[test]
    fn reports_first_missing() {
        let df = frame(&["dob", "contact_info", "job_id"]);
        assert_eq!(
            missing_required_columns(&df),
            vec!["current_career_path_id", "num_course_taken", "time_spent_hrs"]
        );
        let err = validate_required_columns(&df).unwrap_err();
        assert!(
            matches!(err, IngestError::MissingColumn { column } if column == "current_career_path_id")
        );
    }
}
