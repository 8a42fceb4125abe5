//! Call detail records (CDRs) as supplied by the data-access layer.
//!
//! - One record per party per call, with join/leave instants
//! - Optional descriptive fields consumed by the usage tallies
//! - Skip reports for rows the analytics have to exclude

mod types;

pub use types::{CallRecord, RecordError};
