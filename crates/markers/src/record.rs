//! Log records and the export document.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::{current_pid, current_tid};
use crate::error::MarkersResult;

/// Instance key used by records that are not instance-correlated.
pub const NO_INSTANCE_KEY: i32 = -1;

/// Payload returned when the log could not be serialized.
pub const FAILED_EXPORT: &str = "{}";

/// A single timestamped event.
///
/// Records are created by [`EventLog`](crate::EventLog) at append time and
/// are never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    time: i64,
    name: String,
    tag: Option<String>,
    instance_key: i32,
    pid: i32,
    tid: i32,
}

impl LogRecord {
    /// Create a record on the calling thread.
    pub(crate) fn new(name: String, tag: Option<String>, instance_key: i32, time: i64) -> Self {
        Self {
            time,
            name,
            tag,
            instance_key,
            pid: current_pid(),
            tid: current_tid(),
        }
    }

    /// Timestamp in milliseconds since the Unix epoch.
    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Correlator for concurrent instances of the same marker.
    pub fn instance_key(&self) -> i32 {
        self.instance_key
    }

    pub fn pid(&self) -> i32 {
        self.pid
    }

    pub fn tid(&self) -> i32 {
        self.tid
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.time,
            self.name,
            self.tag.as_deref().unwrap_or("null"),
            self.instance_key,
            self.tid,
            self.pid
        )
    }
}

/// The JSON document published at TTI completion.
///
/// ```json
/// {"startTime":1000,"data":[{"time":1000,"name":"LOAD_START","tag":null,"instanceKey":-1,"pid":1,"tid":1}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogExport {
    /// Logical zero-point of the session
    pub start_time: i64,
    /// Records in append order
    pub data: Vec<LogRecord>,
}

/// Borrowed form of [`LogExport`], serialized without cloning the records.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogExportRef<'a> {
    pub start_time: i64,
    pub data: &'a [LogRecord],
}

impl LogExport {
    /// Serialize to the wire format.
    pub fn to_json(&self) -> MarkersResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a published payload.
    ///
    /// Returns `Ok(None)` for the failed-export marker `{}`, which must not be
    /// mistaken for a session with zero events.
    pub fn from_json(payload: &str) -> MarkersResult<Option<Self>> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        if value.as_object().is_some_and(|o| o.is_empty()) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Number of records in the export.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
