//! Concurrency and usage analytics over call detail records.
//!
//! Given CDRs with join/leave instants, computes the peak number of
//! distinct callers simultaneously on line:
//! - Per calendar day across a date range
//! - For one call ("participants per call")
//! - Across a whole record set
//!
//! plus the usage tallies the surrounding dashboards chart (top callers
//! and rooms, calls per day, platform/OS/country breakdowns).
//!
//! Every computation here is a pure function over the records it is
//! handed. Fetching, filtering, and persistence belong to the data
//! layer; rendering belongs to the presentation layer. Malformed rows
//! never abort a run: they are skipped and reported next to the result.

pub mod extract;
pub mod record;
pub mod sweep;
pub mod tally;

pub use extract::{extract_intervals, CallInterval, Extraction, IntervalMap};
pub use record::{CallRecord, RecordError};
pub use sweep::{
    aggregate_global, aggregate_global_with, aggregate_per_call, aggregate_per_call_with,
    aggregate_per_day, aggregate_per_day_with, in_range, DateRange, DayPeaks, OpenEndPolicy,
    PeakCount, SweepConfig,
};
pub use tally::{
    calls_per_day, country_tally, merge_ranked, os_tally, platform_tally, top_callers,
    top_rooms, CountryTally,
};
