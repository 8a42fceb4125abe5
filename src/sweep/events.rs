//! Event timeline construction for the sweep.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::extract::IntervalMap;
use crate::record::RecordError;

use super::types::OpenEndPolicy;

/// A validated span with both endpoints resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResolvedSpan {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Sweep input derived from an interval map.
///
/// `samples` holds every distinct start and resolved end instant of the
/// valid spans, ascending. `starts` and `ends` hold the endpoints of the
/// per-caller merged spans, each sorted ascending, so the sweep can
/// count active callers with two cursors.
#[derive(Debug, Default)]
pub(super) struct EventTimeline {
    pub samples: Vec<DateTime<Utc>>,
    pub starts: Vec<DateTime<Utc>>,
    pub ends: Vec<DateTime<Utc>>,
    pub rejected: Vec<RecordError>,
}

/// Resolve, validate, and merge an interval map into sweep form.
///
/// Open-ended spans resolve to `range_end` under the clamp policy; an
/// open-ended span starting past `range_end` covers none of the range
/// and contributes nothing. Spans whose recorded leave precedes their
/// join are excluded and reported.
pub(super) fn build_timeline(
    intervals: &IntervalMap,
    range_end: DateTime<Utc>,
    policy: OpenEndPolicy,
) -> EventTimeline {
    let mut timeline = EventTimeline::default();

    for (caller, spans) in intervals {
        let mut resolved = Vec::with_capacity(spans.len());

        for span in spans {
            let end = match span.end {
                Some(end) => end,
                None => match policy {
                    OpenEndPolicy::ClampToRangeEnd if span.start > range_end => {
                        debug!(
                            caller = %caller,
                            start = %span.start,
                            "open-ended span starts past the range end, dropping"
                        );
                        continue;
                    }
                    OpenEndPolicy::ClampToRangeEnd => range_end,
                    OpenEndPolicy::Exclude => {
                        debug!(caller = %caller, start = %span.start, "dropping open-ended span");
                        continue;
                    }
                },
            };

            if end < span.start {
                warn!(
                    caller = %caller,
                    join = %span.start,
                    leave = %end,
                    "inverted interval, excluding from sweep"
                );
                timeline.rejected.push(RecordError::InvertedInterval {
                    caller: caller.clone(),
                    join: span.start,
                    leave: end,
                });
                continue;
            }

            timeline.samples.push(span.start);
            timeline.samples.push(end);
            resolved.push(ResolvedSpan {
                start: span.start,
                end,
            });
        }

        for span in merge_spans(resolved) {
            timeline.starts.push(span.start);
            timeline.ends.push(span.end);
        }
    }

    timeline.samples.sort_unstable();
    timeline.samples.dedup();
    timeline.starts.sort_unstable();
    timeline.ends.sort_unstable();

    timeline
}

/// Latest instant the map defines: the greatest join or recorded leave.
///
/// The range-less aggregation variants clamp open-ended spans to this
/// instant. `None` only for an empty map.
pub(super) fn latest_defined_instant(intervals: &IntervalMap) -> Option<DateTime<Utc>> {
    intervals
        .values()
        .flatten()
        .flat_map(|span| [Some(span.start), span.end])
        .flatten()
        .max()
}

/// Merge one caller's resolved spans into disjoint inclusive spans.
///
/// Overlapping or touching spans collapse, so the sweep counts a caller
/// once however many records they produced.
fn merge_spans(mut spans: Vec<ResolvedSpan>) -> Vec<ResolvedSpan> {
    if spans.len() < 2 {
        return spans;
    }

    spans.sort_unstable_by_key(|span| (span.start, span.end));

    let mut merged: Vec<ResolvedSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => {
                last.end = last.end.max(span.end);
            }
            _ => merged.push(span),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::CallInterval;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 5, 1, hour, minute, 0).unwrap()
    }

    fn span(start: DateTime<Utc>, end: DateTime<Utc>) -> ResolvedSpan {
        ResolvedSpan { start, end }
    }

    fn map(entries: &[(&str, CallInterval)]) -> IntervalMap {
        let mut intervals = IntervalMap::new();
        for (caller, interval) in entries {
            intervals
                .entry(caller.to_string())
                .or_default()
                .push(*interval);
        }
        intervals
    }

    #[test]
    fn test_merge_overlapping_spans() {
        let merged = merge_spans(vec![
            span(at(9, 0), at(10, 0)),
            span(at(9, 30), at(10, 30)),
        ]);

        assert_eq!(merged, vec![span(at(9, 0), at(10, 30))]);
    }

    #[test]
    fn test_merge_touching_spans() {
        let merged = merge_spans(vec![
            span(at(9, 0), at(10, 0)),
            span(at(10, 0), at(11, 0)),
        ]);

        assert_eq!(merged, vec![span(at(9, 0), at(11, 0))]);
    }

    #[test]
    fn test_merge_keeps_disjoint_spans() {
        let merged = merge_spans(vec![
            span(at(11, 0), at(12, 0)),
            span(at(9, 0), at(10, 0)),
        ]);

        assert_eq!(
            merged,
            vec![span(at(9, 0), at(10, 0)), span(at(11, 0), at(12, 0))]
        );
    }

    #[test]
    fn test_merge_contained_span() {
        let merged = merge_spans(vec![
            span(at(9, 0), at(12, 0)),
            span(at(10, 0), at(10, 30)),
        ]);

        assert_eq!(merged, vec![span(at(9, 0), at(12, 0))]);
    }

    #[test]
    fn test_inverted_span_excluded_and_reported() {
        let intervals = map(&[
            ("alice", CallInterval::closed(at(10, 0), at(9, 0))),
            ("bob", CallInterval::closed(at(9, 0), at(9, 30))),
        ]);

        let timeline = build_timeline(&intervals, at(23, 0), OpenEndPolicy::ClampToRangeEnd);

        assert_eq!(timeline.starts, vec![at(9, 0)]);
        assert_eq!(
            timeline.rejected,
            vec![RecordError::InvertedInterval {
                caller: "alice".to_string(),
                join: at(10, 0),
                leave: at(9, 0),
            }]
        );
        // The excluded span contributes no samples either
        assert_eq!(timeline.samples, vec![at(9, 0), at(9, 30)]);
    }

    #[test]
    fn test_open_span_clamped_to_range_end() {
        let intervals = map(&[("alice", CallInterval::open(at(9, 0)))]);

        let timeline = build_timeline(&intervals, at(23, 0), OpenEndPolicy::ClampToRangeEnd);

        assert_eq!(timeline.starts, vec![at(9, 0)]);
        assert_eq!(timeline.ends, vec![at(23, 0)]);
        assert_eq!(timeline.samples, vec![at(9, 0), at(23, 0)]);
        assert!(timeline.rejected.is_empty());
    }

    #[test]
    fn test_open_span_past_range_end_dropped() {
        let intervals = map(&[("alice", CallInterval::open(at(23, 30)))]);

        let timeline = build_timeline(&intervals, at(23, 0), OpenEndPolicy::ClampToRangeEnd);

        assert!(timeline.samples.is_empty());
        assert!(timeline.rejected.is_empty());
    }

    #[test]
    fn test_open_span_dropped_under_exclude_policy() {
        let intervals = map(&[
            ("alice", CallInterval::open(at(9, 0))),
            ("bob", CallInterval::closed(at(9, 0), at(9, 30))),
        ]);

        let timeline = build_timeline(&intervals, at(23, 0), OpenEndPolicy::Exclude);

        assert_eq!(timeline.starts.len(), 1);
        assert!(timeline.rejected.is_empty());
    }

    #[test]
    fn test_samples_deduplicated_and_sorted() {
        let intervals = map(&[
            ("alice", CallInterval::closed(at(9, 0), at(10, 0))),
            ("bob", CallInterval::closed(at(10, 0), at(11, 0))),
        ]);

        let timeline = build_timeline(&intervals, at(23, 0), OpenEndPolicy::ClampToRangeEnd);

        assert_eq!(timeline.samples, vec![at(9, 0), at(10, 0), at(11, 0)]);
    }

    #[test]
    fn test_latest_defined_instant_takes_latest_endpoint() {
        let intervals = map(&[
            ("alice", CallInterval::closed(at(9, 0), at(12, 0))),
            ("bob", CallInterval::open(at(10, 0))),
        ]);

        assert_eq!(latest_defined_instant(&intervals), Some(at(12, 0)));
    }

    #[test]
    fn test_latest_defined_instant_counts_joins_past_every_leave() {
        let intervals = map(&[
            ("alice", CallInterval::closed(at(9, 0), at(12, 0))),
            ("bob", CallInterval::open(at(13, 0))),
        ]);

        assert_eq!(latest_defined_instant(&intervals), Some(at(13, 0)));
    }

    #[test]
    fn test_latest_defined_instant_falls_back_to_joins() {
        let intervals = map(&[
            ("alice", CallInterval::open(at(9, 0))),
            ("bob", CallInterval::open(at(10, 0))),
        ]);

        assert_eq!(latest_defined_instant(&intervals), Some(at(10, 0)));
    }

    #[test]
    fn test_latest_defined_instant_empty_map() {
        assert_eq!(latest_defined_instant(&IntervalMap::new()), None);
    }

    #[test]
    fn test_zero_length_span_kept() {
        let intervals = map(&[("alice", CallInterval::closed(at(9, 0), at(9, 0)))]);

        let timeline = build_timeline(&intervals, at(23, 0), OpenEndPolicy::ClampToRangeEnd);

        assert_eq!(timeline.starts, vec![at(9, 0)]);
        assert_eq!(timeline.ends, vec![at(9, 0)]);
        assert_eq!(timeline.samples, vec![at(9, 0)]);
    }
}
