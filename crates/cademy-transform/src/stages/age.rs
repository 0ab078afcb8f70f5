//! Age Deriver: `age` and `age_group` from `dob`.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::{DataFrame, NamedFrom, Series};

use cademy_model::schema::{AGE, AGE_GROUP, DOB};

use super::RowFailure;
use crate::error::{RecordError, Result};
use crate::frame::text_cells;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a date of birth.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY`, and an ISO date
/// followed by a time part; the time is discarded.
pub fn parse_dob(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|dt| dt.date())
        })
}

/// Whole years between `dob` and `reference`, one less when the birthday
/// has not yet occurred in the reference year.
pub fn age_on(dob: NaiveDate, reference: NaiveDate) -> i64 {
    let years = i64::from(reference.year() - dob.year());
    if (reference.month(), reference.day()) < (dob.month(), dob.day()) {
        years - 1
    } else {
        years
    }
}

/// Age rounded down to a multiple of ten.
pub fn age_group(age: i64) -> i64 {
    (age / 10) * 10
}

fn record_age(dob: Option<&str>, reference: NaiveDate) -> std::result::Result<i64, RecordError> {
    let Some(text) = dob else {
        return Err(RecordError::MalformedDate {
            value: String::new(),
            reason: "missing",
        });
    };
    let date = parse_dob(text).ok_or_else(|| RecordError::MalformedDate {
        value: text.to_string(),
        reason: "not a calendar date",
    })?;
    if date > reference {
        return Err(RecordError::MalformedDate {
            value: text.to_string(),
            reason: "after the reference date",
        });
    }
    Ok(age_on(date, reference))
}

/// Adds `age` and `age_group` columns (Int64) computed against `reference`.
///
/// Rows with an unusable `dob` get nulls and are returned as failures.
pub fn derive_age(df: &mut DataFrame, reference: NaiveDate) -> Result<Vec<RowFailure>> {
    let dobs = text_cells(df, DOB)?;
    let mut ages: Vec<Option<i64>> = Vec::with_capacity(dobs.len());
    let mut failures = Vec::new();

    for (row, dob) in dobs.iter().enumerate() {
        match record_age(dob.as_deref(), reference) {
            Ok(age) => ages.push(Some(age)),
            Err(error) => {
                ages.push(None);
                failures.push(RowFailure::new(row, error));
            }
        }
    }

    let groups: Vec<Option<i64>> = ages.iter().map(|age| age.map(age_group)).collect();
    df.with_column(Series::new(AGE.into(), ages))?;
    df.with_column(Series::new(AGE_GROUP.into(), groups))?;
    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_dob_formats() {
        assert_eq!(parse_dob("2000-06-15"), Some(date(2000, 6, 15)));
        assert_eq!(parse_dob(" 2000/06/15 "), Some(date(2000, 6, 15)));
        assert_eq!(parse_dob("06/15/2000"), Some(date(2000, 6, 15)));
        assert_eq!(parse_dob("2000-06-15 00:00:00"), Some(date(2000, 6, 15)));
        assert_eq!(parse_dob("2000-06-15T08:30:00.250"), Some(date(2000, 6, 15)));
    }

    #[test]
    fn parse_dob_invalid() {
        assert_eq!(parse_dob(""), None);
        assert_eq!(parse_dob("not a date"), None);
        assert_eq!(parse_dob("2000-13-01"), None);
        assert_eq!(parse_dob("2001-02-29"), None);
    }

    #[test]
    fn age_before_and_after_birthday() {
        let reference = date(2024, 1, 1);
        assert_eq!(age_on(date(2000, 6, 15), reference), 23);
        assert_eq!(age_on(date(2000, 1, 1), reference), 24);
        assert_eq!(age_on(date(2000, 1, 2), reference), 23);
        assert_eq!(age_on(date(1999, 12, 31), reference), 24);
    }

    #[test]
    fn leap_day_birthday() {
        assert_eq!(age_on(date(2000, 2, 29), date(2023, 2, 28)), 22);
        assert_eq!(age_on(date(2000, 2, 29), date(2023, 3, 1)), 23);
    }

    #[test]
    fn age_groups() {
        assert_eq!(age_group(0), 0);
        assert_eq!(age_group(9), 0);
        assert_eq!(age_group(10), 10);
        assert_eq!(age_group(23), 20);
        assert_eq!(age_group(80), 80);
    }

    #[test]
    fn record_age_errors() {
        let reference = date(2024, 1, 1);
        assert!(matches!(
            record_age(None, reference),
            Err(RecordError::MalformedDate { reason: "missing", .. })
        ));
        assert!(matches!(
            record_age(Some("yesterday"), reference),
            Err(RecordError::MalformedDate { .. })
        ));
        assert!(matches!(
            record_age(Some("2030-01-01"), reference),
            Err(RecordError::MalformedDate { reason: "after the reference date", .. })
        ));
        assert_eq!(record_age(Some("2024-01-01"), reference), Ok(0));
    }
}
