//! Usage tallies over a record set.
//!
//! The counting behind the dashboard charts that are not about
//! concurrency:
//! - Most active callers and rooms
//! - Distinct calls per day
//! - Client platform and operating system breakdowns
//! - Caller-directory country grouping

mod counters;

pub use counters::{
    calls_per_day, country_tally, merge_ranked, os_tally, platform_tally, top_callers,
    top_rooms, CountryTally,
};
