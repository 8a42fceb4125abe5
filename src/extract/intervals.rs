//! Normalizes raw call records into per-caller interval lists.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::record::{CallRecord, RecordError};

/// One participation span of a caller.
///
/// Activity is inclusive at both endpoints: a span is active at its own
/// start and at its own end instant. `end == None` marks an open-ended
/// span (the record never completed); the sweep resolves those against
/// the query range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallInterval {
    /// Instant the span becomes active (inclusive)
    pub start: DateTime<Utc>,
    /// Instant the span becomes inactive (inclusive), if the call completed
    pub end: Option<DateTime<Utc>>,
}

impl CallInterval {
    /// Span with both endpoints known.
    pub fn closed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Span with no recorded leave time.
    pub fn open(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    /// Whether the span is active at `t`.
    ///
    /// An open-ended span counts as active at every instant from its
    /// start on, until the sweep resolves it.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        match self.end {
            Some(end) => t >= self.start && t <= end,
            None => t >= self.start,
        }
    }

    /// Whether the leave instant lies before the join instant.
    pub fn is_inverted(&self) -> bool {
        matches!(self.end, Some(end) if end < self.start)
    }
}

/// Participation spans grouped by caller name, in record order per caller.
///
/// Every span is kept: a caller re-joining contributes multiple, possibly
/// overlapping, entries.
pub type IntervalMap = HashMap<String, Vec<CallInterval>>;

/// Extractor output: the grouped spans plus the records it had to reject.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Per-caller participation spans
    pub intervals: IntervalMap,
    /// Records that could not form a span
    pub skipped: Vec<RecordError>,
}

impl Extraction {
    /// Total number of spans across all callers.
    pub fn span_count(&self) -> usize {
        self.intervals.values().map(Vec::len).sum()
    }
}

/// Group records into per-caller interval lists.
///
/// A record without a join time cannot form a span; it is skipped and
/// reported. A record without a leave time yields an open-ended span for
/// the sweep to resolve. Inverted join/leave pairs pass through here
/// unchanged; the sweep excludes and reports them.
pub fn extract_intervals(records: &[CallRecord]) -> Extraction {
    let mut extraction = Extraction::default();

    for record in records {
        let Some(join) = record.join_time else {
            warn!(caller = %record.caller_name, "record has no join time, skipping");
            extraction.skipped.push(RecordError::MissingJoinTime {
                caller: record.caller_name.clone(),
            });
            continue;
        };

        let interval = match record.leave_time {
            Some(leave) => CallInterval::closed(join, leave),
            None => CallInterval::open(join),
        };

        extraction
            .intervals
            .entry(record.caller_name.clone())
            .or_default()
            .push(interval);
    }

    debug!(
        callers = extraction.intervals.len(),
        spans = extraction.span_count(),
        skipped = extraction.skipped.len(),
        "extracted intervals"
    );

    extraction
}
