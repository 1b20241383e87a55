//! Startup Markers Log
//!
//! This crate records timestamped events during application startup and
//! publishes them as JSON once the app reaches time-to-interaction (TTI):
//!
//! - An append-only [`EventLog`] shared by every producer, safe under
//!   concurrent appends
//! - A [`MarkerIngestor`] forwarding the host framework's marker stream
//! - A one-shot [`CompletionWatcher`] that finalizes the log when the
//!   completion view is first drawn
//! - A typed JSON export ([`LogExport`])
//!
//! Everything host specific sits behind narrow traits: [`MarkerSource`],
//! [`ViewHierarchy`]/[`RenderTarget`] and [`ScriptRuntime`] (reached through a
//! deferred [`RuntimeProvider`]).
//!
//! # Example
//!
//! ```rust
//! use markers::EventLog;
//!
//! let log = EventLog::new(1000);
//! log.append("LOAD_START", None, -1, Some(1000)).unwrap();
//! log.append("LOAD_END", Some("tag1"), -1, Some(1500)).unwrap();
//!
//! let json = log.to_json();
//! assert!(json.starts_with(r#"{"startTime":1000,"data":[{"time":1000,"name":"LOAD_START","tag":null,"instanceKey":-1,"#));
//! ```
//!
//! # Export format
//!
//! ```text
//! { "startTime": <i64>, "data": [ { "time": <i64>, "name": <string>, "tag": <string|null>,
//!   "instanceKey": <i32>, "pid": <i32>, "tid": <i32> }, ... ] }
//! ```
//!
//! A payload of `{}` means the export failed, not that nothing was logged.

mod clock;
mod config;
mod error;
mod ingest;
mod log;
mod record;
mod runtime;
mod session;
mod view;
mod watcher;

pub use clock::{current_pid, current_tid, Clock, ManualClock, SystemClock};
pub use config::{
    MarkersConfig, DEFAULT_BIRTH_MARKER, DEFAULT_COMPLETION_MARKER, DEFAULT_COMPLETION_VIEW_ID,
    DEFAULT_READY_EVENT, DEFAULT_VARIABLE_NAME,
};
pub use error::{MarkersError, MarkersResult};
pub use ingest::{Marker, MarkerIngestor, MarkerListener, MarkerSource};
pub use log::EventLog;
pub use record::{LogExport, LogRecord, FAILED_EXPORT, NO_INSTANCE_KEY};
pub use runtime::{FixedRuntime, RuntimeProvider, ScriptRuntime};
pub use session::{MarkersSession, SessionBuilder};
pub use view::{RenderHook, RenderTarget, ViewFoundCallback, ViewHierarchy};
pub use watcher::{CompletionReceiver, CompletionReport, CompletionWatcher, WatcherState};
