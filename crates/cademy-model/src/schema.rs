//! Column names of the student table.
//!
//! Raw columns are the ones read from the source table; derived columns
//! are produced by the pipeline stages.

/// Date of birth (raw, date string).
pub const DOB: &str = "dob";
/// Serialized contact mapping literal (raw).
pub const CONTACT_INFO: &str = "contact_info";
/// Comma-delimited mailing address (raw or promoted from `contact_info`).
pub const MAILING_ADDRESS: &str = "mailing_address";

pub const JOB_ID: &str = "job_id";
pub const CURRENT_CAREER_PATH_ID: &str = "current_career_path_id";
pub const NUM_COURSE_TAKEN: &str = "num_course_taken";
pub const TIME_SPENT_HRS: &str = "time_spent_hrs";

pub const AGE: &str = "age";
pub const AGE_GROUP: &str = "age_group";

pub const STREET: &str = "street";
pub const CITY: &str = "city";
pub const STATE: &str = "state";
pub const ZIP_CODE: &str = "zip_code";

/// Address components in split order.
pub const ADDRESS_COMPONENTS: [&str; 4] = [STREET, CITY, STATE, ZIP_CODE];

/// Columns coerced to Float64 by the type normalizer.
pub const NUMERIC_COLUMNS: [&str; 4] = [
    JOB_ID,
    CURRENT_CAREER_PATH_ID,
    NUM_COURSE_TAKEN,
    TIME_SPENT_HRS,
];

/// Columns whose nulls are replaced with [`NUMERIC_FILL_VALUE`] on survivors.
pub const FILLED_COLUMNS: [&str; 2] = [CURRENT_CAREER_PATH_ID, TIME_SPENT_HRS];

/// Default written into [`FILLED_COLUMNS`].
pub const NUMERIC_FILL_VALUE: f64 = 0.0;

/// Separator used when flattening nested contact mappings (`address.zip`).
pub const NESTED_KEY_SEPARATOR: &str = ".";

/// Quarantine columns appended to the errors table.
pub const ERROR_STAGE: &str = "error_stage";
pub const ERROR_MESSAGE: &str = "error_message";

/// Raw columns that must be present before the pipeline starts.
///
/// `mailing_address` is absent here because it may be supplied as a key
/// of `contact_info`; the address splitter checks it after flattening.
pub const REQUIRED_INPUT_COLUMNS: [&str; 6] = [
    DOB,
    CONTACT_INFO,
    JOB_ID,
    CURRENT_CAREER_PATH_ID,
    NUM_COURSE_TAKEN,
    TIME_SPENT_HRS,
];

/// Returns the nested contact key promoted under a prefix after a collision.
pub fn prefixed_contact_key(key: &str) -> String {
    format!("{CONTACT_INFO}{NESTED_KEY_SEPARATOR}{key}")
}
