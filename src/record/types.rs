//! Call record type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Data-shape problems found in individual call records.
///
/// These are skip reports, never failures: the offending record is left
/// out of the computation and the report is surfaced next to the result.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordError {
    /// The record has no join time, so no interval can be formed from it.
    #[error("record for '{caller}' has no join time")]
    MissingJoinTime { caller: String },

    /// The record's leave time lies strictly before its join time.
    #[error("record for '{caller}' leaves at {leave} before joining at {join}")]
    InvertedInterval {
        caller: String,
        join: DateTime<Utc>,
        leave: DateTime<Utc>,
    },
}

/// One call detail record: a single party's participation in a call.
///
/// Field optionality mirrors the upstream export. The caller name is the
/// identity used for distinct-active counting; join and leave instants may
/// be absent on in-progress or corrupt rows, and the remaining descriptive
/// fields feed the usage tallies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallRecord {
    /// Caller identity (display name)
    pub caller_name: String,

    /// When the party joined the call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_time: Option<DateTime<Utc>>,

    /// When the party left, absent while a call is in progress
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leave_time: Option<DateTime<Utc>>,

    /// Platform-wide identifier of the call this row belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_call_id: Option<String>,

    /// Room name the party joined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conference_name: Option<String>,

    /// Network identity of the caller (directory lookups key on this)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_id: Option<String>,

    /// Client application reported at join
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,

    /// Client operating system reported at join
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_os: Option<String>,
}

impl CallRecord {
    /// Create a record for a caller joining at the given instant.
    pub fn new(caller_name: &str, join_time: DateTime<Utc>) -> Self {
        Self {
            caller_name: caller_name.to_string(),
            join_time: Some(join_time),
            ..Self::default()
        }
    }

    /// Set the leave instant.
    pub fn with_leave_time(mut self, leave_time: DateTime<Utc>) -> Self {
        self.leave_time = Some(leave_time);
        self
    }

    /// Set the call identifier.
    pub fn with_call_id(mut self, call_id: &str) -> Self {
        self.unique_call_id = Some(call_id.to_string());
        self
    }

    /// Set the room name.
    pub fn with_conference(mut self, conference_name: &str) -> Self {
        self.conference_name = Some(conference_name.to_string());
        self
    }

    /// Set the caller network identity.
    pub fn with_caller_id(mut self, caller_id: &str) -> Self {
        self.caller_id = Some(caller_id.to_string());
        self
    }

    /// Set client information.
    pub fn with_client(mut self, application_name: &str, application_os: &str) -> Self {
        self.application_name = Some(application_name.to_string());
        self.application_os = Some(application_os.to_string());
        self
    }
}
