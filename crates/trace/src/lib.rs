//! Chrome Trace Projection
//!
//! Turns the JSON published by a markers session into a trace that
//! `chrome://tracing` or Perfetto can load:
//!
//! - `_START`/`_END` record pairs become complete events with a duration
//! - All other records become instant events
//! - Script-side [`TimeSpans`] can be merged into the same timeline
//!
//! # Example
//!
//! ```rust
//! use trace::ChromeTrace;
//!
//! let payload = r#"{"startTime":1000,"data":[
//!     {"time":1000,"name":"@boot_START","tag":null,"instanceKey":-1,"pid":1,"tid":1},
//!     {"time":1300,"name":"@boot_END","tag":null,"instanceKey":-1,"pid":1,"tid":1}
//! ]}"#;
//!
//! let trace = ChromeTrace::from_payload(payload, 0).unwrap();
//! assert_eq!(trace.trace_events[0].name, "@boot");
//! assert_eq!(trace.trace_events[0].dur, Some(300_000));
//! ```

mod chrome;
mod error;
mod spans;

pub use chrome::{ChromeTrace, Phase, TraceArgs, TraceEvent, MARKERS_CATEGORY, SCRIPT_SPAN_TAG};
pub use error::{TraceError, TraceResult};
pub use spans::{CompletedSpan, TimeSpans};
