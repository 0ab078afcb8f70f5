//! Data model for the student record cleansing pipeline.
//!
//! - **schema**: raw and derived column names
//! - **options**: run configuration (`CleanseOptions`)
//! - **stage**: the ordered pipeline stages
//! - **report**: serializable per-run counts

pub mod options;
pub mod report;
pub mod schema;
pub mod stage;

pub use options::{AddressPolicy, CleanseOptions, ErrorPolicy};
pub use report::{CleanseReport, PartitionCounts, StageReport};
pub use stage::Stage;
