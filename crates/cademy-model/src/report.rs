//! Per-run counts reported by the cleansing pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::options::{AddressPolicy, ErrorPolicy};
use crate::stage::Stage;

/// Outcome of a single stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: Stage,
    /// Rows entering the stage.
    pub input_rows: usize,
    /// Rows moved to the errors table by this stage.
    pub quarantined: usize,
    pub duration_ms: u128,
}

/// Counts produced by the missing-data partitioner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionCounts {
    /// Rows removed because `num_course_taken` was null.
    pub missing_num_course_taken: usize,
    /// Rows removed because `job_id` was null (after the first filter).
    pub missing_job_id: usize,
    /// Nulls replaced in `current_career_path_id`.
    pub filled_current_career_path_id: usize,
    /// Nulls replaced in `time_spent_hrs`.
    pub filled_time_spent_hrs: usize,
}

impl PartitionCounts {
    pub fn rejected(&self) -> usize {
        self.missing_num_course_taken + self.missing_job_id
    }
}

/// Summary of a cleansing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanseReport {
    pub reference_date: NaiveDate,
    pub error_policy: ErrorPolicy,
    pub address_policy: AddressPolicy,
    pub input_records: usize,
    pub cleansed_records: usize,
    pub rejected_records: usize,
    pub quarantined_records: usize,
    /// Columns promoted from `contact_info`, in first-seen order.
    pub contact_columns: Vec<String>,
    /// Addresses with fewer than four segments (padded with nulls).
    pub padded_addresses: usize,
    /// Addresses with more than four segments (extras dropped).
    pub truncated_addresses: usize,
    pub partition: PartitionCounts,
    pub stages: Vec<StageReport>,
}

impl CleanseReport {
    /// Records quarantined by the given stage.
    pub fn quarantined_in(&self, stage: Stage) -> usize {
        self.stages
            .iter()
            .filter(|report| report.stage == stage)
            .map(|report| report.quarantined)
            .sum()
    }

    pub fn has_quarantined(&self) -> bool {
        self.quarantined_records > 0
    }

    /// True when every input record is accounted for exactly once.
    pub fn is_balanced(&self) -> bool {
        self.cleansed_records + self.rejected_records + self.quarantined_records
            == self.input_records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> CleanseReport {
        CleanseReport {
            reference_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            error_policy: ErrorPolicy::Quarantine,
            address_policy: AddressPolicy::Lenient,
            input_records: 10,
            cleansed_records: 6,
            rejected_records: 3,
            quarantined_records: 1,
            contact_columns: vec!["email".to_string()],
            padded_addresses: 0,
            truncated_addresses: 1,
            partition: PartitionCounts {
                missing_num_course_taken: 2,
                missing_job_id: 1,
                filled_current_career_path_id: 4,
                filled_time_spent_hrs: 0,
            },
            stages: vec![
                StageReport {
                    stage: Stage::AgeDeriver,
                    input_rows: 10,
                    quarantined: 1,
                    duration_ms: 0,
                },
                StageReport {
                    stage: Stage::TypeNormalizer,
                    input_rows: 9,
                    quarantined: 0,
                    duration_ms: 0,
                },
            ],
        }
    }

    #[test]
    fn report_counts() {
        let report = sample_report();
        assert!(report.is_balanced());
        assert!(report.has_quarantined());
        assert_eq!(report.quarantined_in(Stage::AgeDeriver), 1);
        assert_eq!(report.quarantined_in(Stage::AddressSplitter), 0);
        assert_eq!(report.partition.rejected(), report.rejected_records);
    }

    #[test]
    fn report_serializes_snake_case() {
        let json = serde_json::to_value(sample_report()).expect("serialize report");
        assert_eq!(json["error_policy"], "quarantine");
        assert_eq!(json["reference_date"], "2024-01-01");
        assert_eq!(json["stages"][0]["stage"], "age_deriver");
        let round: CleanseReport = serde_json::from_value(json).expect("deserialize report");
        assert_eq!(round, sample_report());
    }
}
