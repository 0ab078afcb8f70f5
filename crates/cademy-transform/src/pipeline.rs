//! Cleansing pipeline with explicit stages.
//!
//! The stages run in order:
//! 1. **Age Deriver**: `age` and `age_group` from `dob`
//! 2. **Contact Flattener**: `contact_info` keys promoted to columns
//! 3. **Address Splitter**: `mailing_address` into four components
//! 4. **Type Normalizer**: numeric columns coerced to Float64
//! 5. **Missing-Data Partitioner**: cleansed and rejected frames
//!
//! Records that stages 1-4 cannot interpret are either quarantined into the
//! errors frame or abort the run, depending on [`ErrorPolicy`].

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::{debug, info, info_span, warn};

use cademy_model::schema::{ERROR_MESSAGE, ERROR_STAGE, REQUIRED_INPUT_COLUMNS};
use cademy_model::{CleanseOptions, CleanseReport, ErrorPolicy, Stage, StageReport};

use crate::error::{CleanseError, RecordError, Result};
use crate::frame::{filter_rows, require_column};
use crate::stages::{
    AddressOutcome, ContactOutcome, RowFailure, derive_age, flatten_contact_info,
    normalize_numeric_columns, partition_missing, split_mailing_address,
};

/// Frames and counts produced by [`cleanse_students`].
#[derive(Debug, Clone)]
pub struct CleanseOutput {
    /// Complete records with derived columns and filled defaults.
    pub cleansed: DataFrame,
    /// Records missing `num_course_taken` or `job_id`.
    pub rejected: DataFrame,
    /// Quarantined raw records with `error_stage` and `error_message`.
    pub errors: DataFrame,
    pub report: CleanseReport,
}

/// Working state threaded through the record stages.
struct Run {
    frame: DataFrame,
    /// Input row index of each row currently in `frame`.
    origins: Vec<usize>,
    quarantined: BTreeMap<usize, (Stage, RecordError)>,
    policy: ErrorPolicy,
    stages: Vec<StageReport>,
}

impl Run {
    fn new(frame: DataFrame, policy: ErrorPolicy) -> Self {
        let origins = (0..frame.height()).collect();
        Self {
            frame,
            origins,
            quarantined: BTreeMap::new(),
            policy,
            stages: Vec::new(),
        }
    }

    /// Runs one record stage and settles its failures.
    fn record_stage<F>(&mut self, stage: Stage, apply: F) -> Result<()>
    where
        F: FnOnce(&mut DataFrame) -> Result<Vec<RowFailure>>,
    {
        let span = info_span!("stage", stage = %stage);
        let _guard = span.enter();
        let start = Instant::now();
        let input_rows = self.frame.height();

        let failures = apply(&mut self.frame)?;
        let quarantined = self.settle(stage, failures)?;

        let duration_ms = start.elapsed().as_millis();
        info!(
            stage = %stage,
            input_rows,
            output_rows = self.frame.height(),
            quarantined,
            duration_ms,
            "stage complete"
        );
        self.stages.push(StageReport {
            stage,
            input_rows,
            quarantined,
            duration_ms,
        });
        Ok(())
    }

    /// Removes failed rows from the working frame, or aborts under fail-fast.
    fn settle(&mut self, stage: Stage, failures: Vec<RowFailure>) -> Result<usize> {
        if failures.is_empty() {
            return Ok(0);
        }
        if self.policy == ErrorPolicy::FailFast {
            return match failures.into_iter().min_by_key(|failure| failure.row) {
                Some(first) => Err(CleanseError::Record {
                    row: self.origins[first.row],
                    stage,
                    source: first.error,
                }),
                None => Ok(0),
            };
        }

        let mut keep = vec![true; self.frame.height()];
        for failure in failures {
            keep[failure.row] = false;
            let origin = self.origins[failure.row];
            debug!(stage = %stage, row = origin, "record quarantined");
            self.quarantined.insert(origin, (stage, failure.error));
        }
        let removed = keep.iter().filter(|flag| !**flag).count();

        self.frame = filter_rows(&self.frame, &keep)?;
        self.origins = self
            .origins
            .iter()
            .zip(&keep)
            .filter_map(|(origin, kept)| kept.then_some(*origin))
            .collect();
        warn!(stage = %stage, count = removed, "records quarantined");
        Ok(removed)
    }
}

/// Runs the five cleansing stages over a raw student table.
///
/// Every input record ends up in exactly one of the cleansed, rejected or
/// errors frames. Under [`ErrorPolicy::FailFast`] the first bad record
/// aborts the run with [`CleanseError::Record`].
pub fn cleanse_students(raw: DataFrame, options: &CleanseOptions) -> Result<CleanseOutput> {
    for column in REQUIRED_INPUT_COLUMNS {
        require_column(&raw, column)?;
    }

    let reference = options
        .reference_date
        .unwrap_or_else(default_reference_date);
    let input_records = raw.height();
    info!(
        input_records,
        reference_date = %reference,
        error_policy = ?options.error_policy,
        address_policy = ?options.address_policy,
        "cleansing student records"
    );

    let mut run = Run::new(raw.clone(), options.error_policy);

    run.record_stage(Stage::AgeDeriver, |df| derive_age(df, reference))?;

    let mut contact = ContactOutcome::default();
    run.record_stage(Stage::ContactFlattener, |df| {
        contact = flatten_contact_info(df)?;
        Ok(std::mem::take(&mut contact.failures))
    })?;

    let mut address = AddressOutcome::default();
    run.record_stage(Stage::AddressSplitter, |df| {
        address = split_mailing_address(df, options.address_policy)?;
        Ok(std::mem::take(&mut address.failures))
    })?;

    run.record_stage(Stage::TypeNormalizer, normalize_numeric_columns)?;

    let Run {
        frame,
        quarantined,
        mut stages,
        ..
    } = run;

    let partition = {
        let stage = Stage::MissingDataPartitioner;
        let span = info_span!("stage", stage = %stage);
        let _guard = span.enter();
        let start = Instant::now();
        let input_rows = frame.height();
        let partition = partition_missing(frame)?;
        let duration_ms = start.elapsed().as_millis();
        info!(
            stage = %stage,
            input_rows,
            cleansed = partition.cleansed.height(),
            rejected = partition.rejected.height(),
            duration_ms,
            "stage complete"
        );
        stages.push(StageReport {
            stage,
            input_rows,
            quarantined: 0,
            duration_ms,
        });
        partition
    };

    let errors = build_errors_frame(&raw, &quarantined)?;

    let report = CleanseReport {
        reference_date: reference,
        error_policy: options.error_policy,
        address_policy: options.address_policy,
        input_records,
        cleansed_records: partition.cleansed.height(),
        rejected_records: partition.rejected.height(),
        quarantined_records: errors.height(),
        contact_columns: contact.columns,
        padded_addresses: address.padded,
        truncated_addresses: address.truncated,
        partition: partition.counts,
        stages,
    };
    info!(
        cleansed = report.cleansed_records,
        rejected = report.rejected_records,
        quarantined = report.quarantined_records,
        "cleansing complete"
    );

    Ok(CleanseOutput {
        cleansed: partition.cleansed,
        rejected: partition.rejected,
        errors,
        report,
    })
}

/// Raw quarantined rows in input order, tagged with stage and message.
fn build_errors_frame(
    raw: &DataFrame,
    quarantined: &BTreeMap<usize, (Stage, RecordError)>,
) -> Result<DataFrame> {
    let keep: Vec<bool> = (0..raw.height())
        .map(|row| quarantined.contains_key(&row))
        .collect();
    let mut errors = filter_rows(raw, &keep)?;

    let stages: Vec<&str> = quarantined
        .values()
        .map(|(stage, _)| stage.as_str())
        .collect();
    let messages: Vec<String> = quarantined
        .values()
        .map(|(_, error)| error.to_string())
        .collect();
    errors.with_column(Series::new(ERROR_STAGE.into(), stages))?;
    errors.with_column(Series::new(ERROR_MESSAGE.into(), messages))?;
    Ok(errors)
}

/// The date ages are computed against when none is configured.
pub fn default_reference_date() -> NaiveDate {
    Local::now().date_naive()
}
