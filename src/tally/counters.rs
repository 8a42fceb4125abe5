//! Record-set counting behind the dashboard charts.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::CallRecord;

/// Caller id the conferencing platform assigns to anonymous parties.
/// Anonymous rows are left out of directory grouping entirely.
const GUEST_CALLER_ID: &str = "Guest";

/// Country grouping of callers resolved through a directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryTally {
    /// Record count per directory group
    pub groups: HashMap<String, usize>,
    /// Records whose caller id the directory does not know
    pub unmatched: usize,
}

/// Most active callers by record count, descending, first `limit` entries.
pub fn top_callers(records: &[CallRecord], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.caller_name.clone()).or_default() += 1;
    }

    let mut ranked = rank(counts);
    ranked.truncate(limit);
    ranked
}

/// Most active rooms by distinct calls hosted, descending, first `limit`
/// entries.
pub fn top_rooms(records: &[CallRecord], limit: usize) -> Vec<(String, usize)> {
    let mut calls_by_room: HashMap<String, HashSet<&str>> = HashMap::new();
    for record in records {
        let (Some(room), Some(call_id)) = (&record.conference_name, &record.unique_call_id)
        else {
            continue;
        };
        calls_by_room
            .entry(room.clone())
            .or_default()
            .insert(call_id.as_str());
    }

    let counts = calls_by_room
        .into_iter()
        .map(|(room, calls)| (room, calls.len()))
        .collect();

    let mut ranked = rank(counts);
    ranked.truncate(limit);
    ranked
}

/// Distinct calls per calendar day of their join instants.
pub fn calls_per_day(records: &[CallRecord]) -> BTreeMap<NaiveDate, usize> {
    let mut calls_by_day: BTreeMap<NaiveDate, HashSet<&str>> = BTreeMap::new();
    for record in records {
        let (Some(join), Some(call_id)) = (record.join_time, &record.unique_call_id) else {
            continue;
        };
        calls_by_day
            .entry(join.date_naive())
            .or_default()
            .insert(call_id.as_str());
    }

    calls_by_day
        .into_iter()
        .map(|(day, calls)| (day, calls.len()))
        .collect()
}

/// Client applications in use, by record count.
pub fn platform_tally(records: &[CallRecord]) -> HashMap<String, usize> {
    field_tally(records, |record| record.application_name.as_deref())
}

/// Client operating systems in use, by record count.
pub fn os_tally(records: &[CallRecord]) -> HashMap<String, usize> {
    field_tally(records, |record| record.application_os.as_deref())
}

/// Group records through a caller-id directory, typically id to country.
///
/// Guest rows are skipped; rows whose caller id is absent or unknown to
/// the directory count as unmatched.
pub fn country_tally(
    records: &[CallRecord],
    directory: &HashMap<String, String>,
) -> CountryTally {
    let mut tally = CountryTally::default();

    for record in records {
        if record.caller_id.as_deref() == Some(GUEST_CALLER_ID) {
            continue;
        }
        match record.caller_id.as_ref().and_then(|id| directory.get(id)) {
            Some(group) => *tally.groups.entry(group.clone()).or_default() += 1,
            None => tally.unmatched += 1,
        }
    }

    tally
}

/// Merge two count maps into one ranked list, descending by count.
///
/// On a shared key the overlay count replaces the base count.
pub fn merge_ranked(
    base: &HashMap<String, usize>,
    overlay: &HashMap<String, usize>,
) -> Vec<(String, usize)> {
    let mut merged = base.clone();
    merged.extend(overlay.iter().map(|(key, count)| (key.clone(), *count)));
    rank(merged)
}

/// Occurrence counts of one optional descriptive field, blanks skipped.
fn field_tally<'a, F>(records: &'a [CallRecord], field: F) -> HashMap<String, usize>
where
    F: Fn(&'a CallRecord) -> Option<&'a str>,
{
    let mut counts = HashMap::new();
    for value in records.iter().filter_map(field) {
        if value.is_empty() {
            continue;
        }
        *counts.entry(value.to_string()).or_default() += 1;
    }
    counts
}

/// Order counts descending, names ascending between equal counts.
fn rank(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}
