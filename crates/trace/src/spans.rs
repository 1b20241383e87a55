//! Named start/stop spans measured outside the markers log.

use std::sync::Arc;

use markers::{Clock, SystemClock};

/// A span that has both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedSpan<'a> {
    pub name: &'a str,
    /// Start in milliseconds since the Unix epoch
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: i64,
    end: Option<i64>,
}

/// Records script-side spans such as component mount and first update.
///
/// # Example
///
/// ```rust
/// use trace::TimeSpans;
///
/// let mut spans = TimeSpans::new();
/// spans.start("Feed_mount");
/// // ... mount ...
/// spans.stop("Feed_mount");
///
/// assert_eq!(spans.completed().count(), 1);
/// ```
#[derive(Debug)]
pub struct TimeSpans {
    clock: Arc<dyn Clock>,
    spans: Vec<(String, Span)>,
}

impl TimeSpans {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            spans: Vec::new(),
        }
    }

    /// Start `name`, discarding any earlier span with that name.
    pub fn start(&mut self, name: &str) {
        let span = Span {
            start: self.clock.now_millis(),
            end: None,
        };
        match self.spans.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = span,
            None => self.spans.push((name.to_string(), span)),
        }
    }

    /// Stop `name` and return its duration in milliseconds.
    ///
    /// Stopping a span that was never started does nothing.
    pub fn stop(&mut self, name: &str) -> Option<i64> {
        let now = self.clock.now_millis();
        let (_, span) = self.spans.iter_mut().find(|(n, _)| n == name)?;
        span.end = Some(now);
        Some(now - span.start)
    }

    /// Completed spans in the order they were first started.
    pub fn completed(&self) -> impl Iterator<Item = CompletedSpan<'_>> {
        self.spans.iter().filter_map(|(name, span)| {
            span.end.map(|end| CompletedSpan {
                name,
                start: span.start,
                end,
            })
        })
    }

    /// Number of spans, finished or not.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }
}

impl Default for TimeSpans {
    fn default() -> Self {
        Self::new()
    }
}
