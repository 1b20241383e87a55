//! Chrome trace-event projection.
//!
//! Converts an exported markers log into the JSON understood by
//! `chrome://tracing` and Perfetto. `_START`/`_END` record pairs collapse
//! into complete (`X`) events; everything else is an instant (`I`) event.

use serde::{Deserialize, Serialize};

use markers::{LogExport, LogRecord};

use crate::error::TraceResult;
use crate::spans::TimeSpans;

/// Category stamped on events that come from the markers log.
pub const MARKERS_CATEGORY: &str = "react-native";
/// Tag stamped on events measured on the script side.
pub const SCRIPT_SPAN_TAG: &str = "JS_EVENT";

const START_SUFFIX: &str = "_START";
const END_SUFFIX: &str = "_END";

/// Trace event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// A point in time
    #[serde(rename = "I")]
    Instant,
    /// A span with a duration
    #[serde(rename = "X")]
    Complete,
}

/// Extra arguments shown in the trace viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceArgs {
    pub instance_key: i32,
    pub tag: Option<String>,
}

/// One event in the Chrome trace format. Times are in microseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub cat: String,
    pub ph: Phase,
    pub name: String,
    /// Offset from the session start
    pub ts: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dur: Option<i64>,
    pub pid: i32,
    pub tid: i32,
    pub args: TraceArgs,
}

impl TraceEvent {
    fn instant(record: &LogRecord, epoch: i64) -> Self {
        Self {
            cat: MARKERS_CATEGORY.to_string(),
            ph: Phase::Instant,
            name: record.name().to_string(),
            ts: to_micros(record.time().saturating_sub(epoch)),
            dur: None,
            pid: record.pid(),
            tid: record.tid(),
            args: TraceArgs {
                instance_key: record.instance_key(),
                tag: record.tag().map(str::to_owned),
            },
        }
    }
}

/// A document loadable by `chrome://tracing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChromeTrace {
    pub trace_events: Vec<TraceEvent>,
    /// Session start all offsets are relative to, in milliseconds
    #[serde(skip)]
    epoch: i64,
}

/// Export shape tolerant of missing fields.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialExport {
    start_time: Option<i64>,
    #[serde(default)]
    data: Vec<LogRecord>,
}

impl ChromeTrace {
    /// Create an empty trace anchored at `epoch` milliseconds.
    pub fn new(epoch: i64) -> Self {
        Self {
            trace_events: Vec::new(),
            epoch,
        }
    }

    /// Project an export, anchored at its start time.
    pub fn from_export(export: &LogExport) -> Self {
        Self::from_records(&export.data, export.start_time)
    }

    /// Project records relative to `epoch`.
    pub fn from_records(records: &[LogRecord], epoch: i64) -> Self {
        let mut trace = Self::new(epoch);

        for (index, record) in records.iter().enumerate() {
            let name = record.name();
            if let Some(base) = name.strip_suffix(START_SUFFIX) {
                let mut event = TraceEvent::instant(record, epoch);
                event.name = base.to_string();
                match find_end(record, base, &records[index + 1..]) {
                    Some(end) => {
                        event.ph = Phase::Complete;
                        event.dur = Some(to_micros(end.time().saturating_sub(record.time())));
                    }
                    None => {
                        tracing::debug!(
                            target: "trace",
                            marker = name,
                            tag = record.tag(),
                            instance_key = record.instance_key(),
                            "no closing event"
                        );
                    }
                }
                trace.trace_events.push(event);
            } else if !name.ends_with(END_SUFFIX) {
                trace.trace_events.push(TraceEvent::instant(record, epoch));
            }
        }

        trace
    }

    /// Project a published payload.
    ///
    /// `fallback_epoch` anchors the trace when the payload has no start time,
    /// which includes the failed-export payload `{}`.
    pub fn from_payload(payload: &str, fallback_epoch: i64) -> TraceResult<Self> {
        let export: PartialExport = serde_json::from_str(payload)?;
        let epoch = export.start_time.unwrap_or(fallback_epoch);
        Ok(Self::from_records(&export.data, epoch))
    }

    /// The session start in milliseconds.
    pub fn epoch(&self) -> i64 {
        self.epoch
    }

    /// Append every completed script-side span.
    pub fn push_spans(&mut self, spans: &TimeSpans) {
        for span in spans.completed() {
            self.trace_events.push(TraceEvent {
                cat: MARKERS_CATEGORY.to_string(),
                ph: Phase::Complete,
                name: span.name.to_string(),
                ts: to_micros(span.start.saturating_sub(self.epoch)),
                dur: Some(to_micros(span.end.saturating_sub(span.start))),
                pid: 0,
                tid: 0,
                args: TraceArgs {
                    instance_key: 0,
                    tag: Some(SCRIPT_SPAN_TAG.to_string()),
                },
            });
        }
    }

    pub fn len(&self) -> usize {
        self.trace_events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace_events.is_empty()
    }

    /// Serialize as `{"traceEvents":[...]}`.
    pub fn to_json(&self) -> TraceResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> TraceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// First later record closing `start`.
///
/// An end record carrying a tag must match the start's tag; an untagged end
/// record must match its instance key.
fn find_end<'a>(start: &LogRecord, base: &str, later: &'a [LogRecord]) -> Option<&'a LogRecord> {
    later.iter().find(|candidate| {
        candidate
            .name()
            .strip_suffix(END_SUFFIX)
            .is_some_and(|end_base| end_base == base)
            && match candidate.tag() {
                // An empty tag counts as untagged.
                Some(tag) if !tag.is_empty() => start.tag() == Some(tag),
                _ => candidate.instance_key() == start.instance_key(),
            }
    })
}

fn to_micros(millis: i64) -> i64 {
    millis.saturating_mul(1000)
}
