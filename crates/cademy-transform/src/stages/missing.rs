//! Missing-Data Partitioner: separates incomplete records and fills defaults.

use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::debug;

use cademy_model::PartitionCounts;
use cademy_model::schema::{
    CURRENT_CAREER_PATH_ID, FILLED_COLUMNS, JOB_ID, NUM_COURSE_TAKEN, NUMERIC_FILL_VALUE,
    TIME_SPENT_HRS,
};

use crate::error::Result;
use crate::frame::{filter_rows, invert, null_mask, require_column};

/// Cleansed and rejected frames produced by [`partition_missing`].
#[derive(Debug, Clone)]
pub struct Partition {
    pub cleansed: DataFrame,
    pub rejected: DataFrame,
    pub counts: PartitionCounts,
}

/// Moves rows with a null `num_course_taken` to the rejected frame, then
/// rows with a null `job_id` from what remains. Rejected rows keep the
/// order in which the two filters selected them.
///
/// On the cleansed frame, nulls in `current_career_path_id` and
/// `time_spent_hrs` are replaced with `0.0`.
pub fn partition_missing(df: DataFrame) -> Result<Partition> {
    let mut counts = PartitionCounts::default();

    let missing_courses = null_mask(&df, NUM_COURSE_TAKEN)?;
    let mut rejected = filter_rows(&df, &missing_courses)?;
    let remaining = filter_rows(&df, &invert(&missing_courses))?;
    counts.missing_num_course_taken = rejected.height();

    let missing_job = null_mask(&remaining, JOB_ID)?;
    let rejected_jobs = filter_rows(&remaining, &missing_job)?;
    let mut cleansed = filter_rows(&remaining, &invert(&missing_job))?;
    counts.missing_job_id = rejected_jobs.height();
    rejected.vstack_mut(&rejected_jobs)?;

    for name in FILLED_COLUMNS {
        let filled = fill_nulls(&mut cleansed, name)?;
        match name {
            CURRENT_CAREER_PATH_ID => counts.filled_current_career_path_id = filled,
            TIME_SPENT_HRS => counts.filled_time_spent_hrs = filled,
            _ => {}
        }
    }

    debug!(
        cleansed = cleansed.height(),
        rejected = rejected.height(),
        "partitioned missing data"
    );
    Ok(Partition {
        cleansed,
        rejected,
        counts,
    })
}

/// Replaces nulls in a Float64 column with the fill value; returns how many.
fn fill_nulls(df: &mut DataFrame, name: &str) -> Result<usize> {
    let column = require_column(df, name)?;
    let floats = column.f64()?;
    let filled = floats.null_count();
    let values: Vec<Option<f64>> = floats
        .into_iter()
        .map(|value| Some(value.unwrap_or(NUMERIC_FILL_VALUE)))
        .collect();
    df.with_column(Series::new(name.into(), values))?;
    Ok(filled)
}
