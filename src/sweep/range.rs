//! Range tests and the query date range.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive range membership with wrap-around.
///
/// For an ordered range (`start <= end`) this is the plain inclusive
/// test. When `start > end` the range is treated as wrapping around
/// midnight (e.g. a 23:00 to 01:00 window): `t` matches when it lies at
/// or after the start, or at or before the end.
pub fn in_range<T: PartialOrd>(start: T, end: T, t: T) -> bool {
    if start <= end {
        t >= start && t <= end
    } else {
        t >= start || t <= end
    }
}

/// Inclusive calendar date range of a per-day query.
///
/// Passed explicitly into the aggregation entry points; there is no
/// ambient query state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range (inclusive)
    pub start: NaiveDate,
    /// Last day of the range (inclusive)
    pub end: NaiveDate,
}

impl DateRange {
    /// Range covering `start` through `end`, both inclusive.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range covering a single day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Whether `day` falls inside the range.
    pub fn contains(&self, day: NaiveDate) -> bool {
        in_range(self.start, self.end, day)
    }

    /// The last inclusive second of the range, as a UTC instant.
    ///
    /// Open-ended spans resolve to this instant under the default clamp
    /// policy.
    pub fn end_instant(&self) -> DateTime<Utc> {
        self.end.and_hms_opt(23, 59, 59).unwrap().and_utc()
    }
}
