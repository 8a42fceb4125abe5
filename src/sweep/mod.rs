//! Peak-concurrency sweep over extracted call intervals.
//!
//! Computes the maximum number of distinct callers simultaneously on
//! line:
//! - Per calendar day across a date range
//! - For one call, or across a whole record set
//! - With configurable handling of spans that never completed
//!
//! Every entry point is a pure function over the records it is handed.
//! Invocations share no state and run concurrently without
//! coordination; per-day shards computed separately combine with
//! `DayPeaks::merge`.

mod engine;
mod events;
mod range;
mod types;

pub use range::{in_range, DateRange};
pub use types::{DayPeaks, OpenEndPolicy, PeakCount, SweepConfig};

use tracing::{debug, instrument};

use crate::extract::{extract_intervals, Extraction};
use crate::record::CallRecord;

use self::events::{build_timeline, latest_defined_instant};

/// Peak concurrent callers per day, for records in a date range.
///
/// Open-ended spans are treated as active through the end of the range.
pub fn aggregate_per_day(records: &[CallRecord], range: DateRange) -> DayPeaks {
    aggregate_per_day_with(records, range, &SweepConfig::default())
}

/// Peak concurrent callers per day, with explicit sweep configuration.
///
/// Buckets cover every day a sample instant fell on. The records are
/// assumed already scoped by the data layer; the range is not used to
/// re-filter them, only to resolve open-ended spans.
#[instrument(skip_all, fields(records = records.len(), range_start = %range.start, range_end = %range.end))]
pub fn aggregate_per_day_with(
    records: &[CallRecord],
    range: DateRange,
    config: &SweepConfig,
) -> DayPeaks {
    let Extraction {
        intervals,
        mut skipped,
    } = extract_intervals(records);

    let mut timeline = build_timeline(&intervals, range.end_instant(), config.open_ended);
    skipped.append(&mut timeline.rejected);

    let peaks = engine::day_peaks(&timeline);

    debug!(
        days = peaks.len(),
        skipped = skipped.len(),
        "per-day aggregation complete"
    );

    DayPeaks { peaks, skipped }
}

/// Peak concurrent callers across the whole record set.
pub fn aggregate_global(records: &[CallRecord]) -> PeakCount {
    aggregate_global_with(records, &SweepConfig::default())
}

/// Global peak with explicit sweep configuration.
///
/// Without a query range, open-ended spans resolve to the latest join
/// or leave instant the record set defines.
#[instrument(skip_all, fields(records = records.len()))]
pub fn aggregate_global_with(records: &[CallRecord], config: &SweepConfig) -> PeakCount {
    let Extraction {
        intervals,
        mut skipped,
    } = extract_intervals(records);

    let Some(clamp) = latest_defined_instant(&intervals) else {
        debug!(skipped = skipped.len(), "no sweepable intervals");
        return PeakCount { peak: 0, skipped };
    };

    let mut timeline = build_timeline(&intervals, clamp, config.open_ended);
    skipped.append(&mut timeline.rejected);

    let peak = engine::global_peak(&timeline);

    debug!(peak, skipped = skipped.len(), "global aggregation complete");

    PeakCount { peak, skipped }
}

/// Peak distinct participants of one call.
///
/// The records are taken as already scoped to `call_id` by the data
/// layer; the id labels the computation, it does not filter.
pub fn aggregate_per_call(records: &[CallRecord], call_id: &str) -> PeakCount {
    aggregate_per_call_with(records, call_id, &SweepConfig::default())
}

/// Per-call peak with explicit sweep configuration.
#[instrument(skip_all, fields(call_id = %call_id, records = records.len()))]
pub fn aggregate_per_call_with(
    records: &[CallRecord],
    call_id: &str,
    config: &SweepConfig,
) -> PeakCount {
    aggregate_global_with(records, config)
}
