//! The append-only event log.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::error::{MarkersError, MarkersResult};
use crate::record::{LogExport, LogExportRef, LogRecord, FAILED_EXPORT, NO_INSTANCE_KEY};

/// An ordered, append-only collection of timestamped records.
///
/// The log is shared by `Arc` between every producer (framework markers,
/// custom events) and the completion watcher. Appends may race from any
/// thread; append order is the order in which callers acquire the lock, and
/// is never re-sorted by timestamp.
///
/// # Example
///
/// ```rust
/// use markers::EventLog;
///
/// let log = EventLog::new(1000);
/// log.log_start("fetch_config", None).unwrap();
/// log.log_end("fetch_config", None).unwrap();
///
/// assert_eq!(log.records()[0].name(), "@fetch_config_START");
/// assert!(log.to_json().starts_with(r#"{"startTime":1000,"data":["#));
/// ```
pub struct EventLog {
    start_time: i64,
    records: Mutex<Vec<LogRecord>>,
    clock: Arc<dyn Clock>,
}

impl EventLog {
    /// Create an empty log whose logical zero-point is `start_time`.
    pub fn new(start_time: i64) -> Self {
        Self::with_clock(start_time, Arc::new(SystemClock))
    }

    /// Create an empty log that stamps records with `clock`.
    pub fn with_clock(start_time: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            start_time,
            records: Mutex::new(Vec::new()),
            clock,
        }
    }

    /// The logical start time given at construction.
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Current time according to the log's clock.
    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Append a record at the tail of the log.
    ///
    /// `time` of `None` stamps the record with the current clock value.
    pub fn append(
        &self,
        name: impl Into<String>,
        tag: Option<&str>,
        instance_key: i32,
        time: Option<i64>,
    ) -> MarkersResult<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(MarkersError::EmptyName);
        }
        let time = time.unwrap_or_else(|| self.now());

        tracing::trace!(
            target: "markers",
            marker = %name,
            tag = tag,
            instance_key,
            time,
            "append"
        );

        let record = LogRecord::new(name, tag.map(str::to_owned), instance_key, time);
        self.lock().push(record);
        Ok(())
    }

    /// Log a custom event under its own name.
    pub fn log_event(&self, name: &str, tag: Option<&str>) -> MarkersResult<()> {
        self.append(name, tag, NO_INSTANCE_KEY, None)
    }

    /// Log a custom event with an explicit timestamp.
    pub fn log_event_at(&self, name: &str, tag: Option<&str>, time: i64) -> MarkersResult<()> {
        self.append(name, tag, NO_INSTANCE_KEY, Some(time))
    }

    /// Log the start of a custom span, recorded as `@<name>_START`.
    pub fn log_start(&self, name: &str, tag: Option<&str>) -> MarkersResult<()> {
        self.append(start_marker(name), tag, NO_INSTANCE_KEY, None)
    }

    pub fn log_start_at(&self, name: &str, tag: Option<&str>, time: i64) -> MarkersResult<()> {
        self.append(start_marker(name), tag, NO_INSTANCE_KEY, Some(time))
    }

    /// Log the end of a custom span, recorded as `@<name>_END`.
    pub fn log_end(&self, name: &str, tag: Option<&str>) -> MarkersResult<()> {
        self.append(end_marker(name), tag, NO_INSTANCE_KEY, None)
    }

    pub fn log_end_at(&self, name: &str, tag: Option<&str>, time: i64) -> MarkersResult<()> {
        self.append(end_marker(name), tag, NO_INSTANCE_KEY, Some(time))
    }

    /// Number of records appended so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of all records in append order.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    /// Owned copy of the export document.
    pub fn snapshot(&self) -> LogExport {
        LogExport {
            start_time: self.start_time,
            data: self.records(),
        }
    }

    /// Serialize the whole log, reporting failures to the caller.
    pub fn try_to_json(&self) -> MarkersResult<String> {
        let records = self.lock();
        let export = LogExportRef {
            start_time: self.start_time,
            data: &records,
        };
        Ok(serde_json::to_string(&export)?)
    }

    /// Serialize the whole log.
    ///
    /// Never fails: if serialization goes wrong the result is `{}`, which
    /// consumers treat as "export failed".
    pub fn to_json(&self) -> String {
        let records = self.lock();
        serialize_or_failed(&LogExportRef {
            start_time: self.start_time,
            data: &records,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        // Records survive a producer that panicked while holding the lock.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog")
            .field("start_time", &self.start_time)
            .field("records", &self.len())
            .field("clock", &self.clock)
            .finish()
    }
}

fn serialize_or_failed<T: Serialize>(export: &T) -> String {
    match serde_json::to_string(export) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(target: "markers", error = %e, "could not convert records to JSON");
            FAILED_EXPORT.to_string()
        }
    }
}

fn start_marker(name: &str) -> String {
    format!("@{name}_START")
}

fn end_marker(name: &str) -> String {
    format!("@{name}_END")
}
