//! Interval extraction.
//!
//! Turns raw call records into typed participation spans keyed by
//! caller name:
//! - Every span is kept, including re-joins and overlaps (no dedup)
//! - Records with no join time go into the skip report
//! - Open-ended spans stay open for the sweep to resolve

mod intervals;

pub use intervals::{extract_intervals, CallInterval, Extraction, IntervalMap};
