//! The delta sweep over an event timeline.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use super::events::EventTimeline;

/// Walk the timeline once, handing each sample instant and its active
/// count to `visit`.
///
/// The active count at `t` is the number of merged spans with
/// `start <= t` minus the number with `end < t`; with per-caller merged
/// spans that equals the number of distinct active callers. Ends advance
/// on strict `<` only, so a span still counts at its own end instant and
/// a zero-length span still registers presence.
fn walk<F: FnMut(DateTime<Utc>, usize)>(timeline: &EventTimeline, mut visit: F) {
    let mut started = 0;
    let mut ended = 0;

    for &t in &timeline.samples {
        while started < timeline.starts.len() && timeline.starts[started] <= t {
            started += 1;
        }
        while ended < timeline.ends.len() && timeline.ends[ended] < t {
            ended += 1;
        }
        visit(t, started - ended);
    }
}

/// Peak active callers per calendar day of the sampled instants.
///
/// Each sample is bucketed by its own date, so a span crossing midnight
/// contributes to every day it was sampled on. Days without a sample get
/// no bucket.
pub(super) fn day_peaks(timeline: &EventTimeline) -> BTreeMap<NaiveDate, usize> {
    let mut peaks: BTreeMap<NaiveDate, usize> = BTreeMap::new();

    walk(timeline, |t, active| {
        let entry = peaks.entry(t.date_naive()).or_default();
        *entry = (*entry).max(active);
    });

    debug!(
        days = peaks.len(),
        samples = timeline.samples.len(),
        "computed per-day peaks"
    );

    peaks
}

/// Peak active callers over every sampled instant.
pub(super) fn global_peak(timeline: &EventTimeline) -> usize {
    let mut peak = 0;

    walk(timeline, |_, active| peak = peak.max(active));

    peak
}
