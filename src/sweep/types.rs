//! Sweep configuration and result types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::RecordError;

/// How the sweep resolves spans that never recorded a leave time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenEndPolicy {
    /// Treat the span as active through the end of the query range.
    #[default]
    ClampToRangeEnd,
    /// Drop open-ended spans from the sweep, for deployments whose data
    /// layer only ever supplies completed calls.
    Exclude,
}

/// Sweep configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Open-ended span handling
    pub open_ended: OpenEndPolicy,
}

/// Per-day peak concurrency result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPeaks {
    /// Peak distinct active callers, per sampled day
    pub peaks: BTreeMap<NaiveDate, usize>,

    /// Records excluded from the computation
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<RecordError>,
}

impl DayPeaks {
    /// Peak for one day, 0 when the day was never sampled.
    pub fn peak_on(&self, day: NaiveDate) -> usize {
        self.peaks.get(&day).copied().unwrap_or(0)
    }

    /// Highest per-day peak in the result.
    pub fn max_peak(&self) -> usize {
        self.peaks.values().copied().max().unwrap_or(0)
    }

    /// Union with another result, taking the larger peak per day.
    ///
    /// Buckets of independently computed shards are disjoint by
    /// construction, so sharded runs merge without conflict; days present
    /// in both keep the larger peak.
    pub fn merge(mut self, other: DayPeaks) -> DayPeaks {
        for (day, peak) in other.peaks {
            let entry = self.peaks.entry(day).or_default();
            *entry = (*entry).max(peak);
        }
        self.skipped.extend(other.skipped);
        self
    }
}

/// Single-number peak concurrency result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakCount {
    /// Peak distinct active callers over all sampled instants
    pub peak: usize,

    /// Records excluded from the computation
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<RecordError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 5, day).unwrap()
    }

    fn peaks(entries: &[(u32, usize)]) -> DayPeaks {
        DayPeaks {
            peaks: entries.iter().map(|&(d, p)| (day(d), p)).collect(),
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_default_policy_clamps() {
        assert_eq!(OpenEndPolicy::default(), OpenEndPolicy::ClampToRangeEnd);
        assert_eq!(SweepConfig::default().open_ended, OpenEndPolicy::ClampToRangeEnd);
    }

    #[test]
    fn test_policy_serializes_snake_case() {
        let json = serde_json::to_string(&OpenEndPolicy::ClampToRangeEnd).unwrap();
        assert_eq!(json, "\"clamp_to_range_end\"");
    }

    #[test]
    fn test_merge_unions_disjoint_days() {
        let merged = peaks(&[(1, 3), (2, 1)]).merge(peaks(&[(3, 2)]));

        assert_eq!(merged.peaks.len(), 3);
        assert_eq!(merged.peak_on(day(1)), 3);
        assert_eq!(merged.peak_on(day(3)), 2);
    }

    #[test]
    fn test_merge_takes_max_on_shared_days() {
        let merged = peaks(&[(1, 3), (2, 1)]).merge(peaks(&[(1, 2), (2, 4)]));

        assert_eq!(merged.peak_on(day(1)), 3);
        assert_eq!(merged.peak_on(day(2)), 4);
    }

    #[test]
    fn test_merge_concatenates_skip_reports() {
        let mut left = peaks(&[(1, 1)]);
        left.skipped.push(RecordError::MissingJoinTime {
            caller: "alice".to_string(),
        });
        let mut right = peaks(&[(2, 1)]);
        right.skipped.push(RecordError::MissingJoinTime {
            caller: "bob".to_string(),
        });

        let merged = left.merge(right);
        assert_eq!(merged.skipped.len(), 2);
    }

    #[test]
    fn test_peak_on_unsampled_day_is_zero() {
        let result = peaks(&[(1, 5)]);

        assert_eq!(result.peak_on(day(2)), 0);
        assert_eq!(result.max_peak(), 5);
    }

    #[test]
    fn test_empty_result_serializes_without_skip_list() {
        let json = serde_json::to_string(&PeakCount::default()).unwrap();
        assert_eq!(json, "{\"peak\":0}");
    }
}
