//! Forwarding of framework marker events into the log.

use std::sync::Arc;

use crate::log::EventLog;

/// A marker reported by the host framework's instrumentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Marker name, e.g. `RUN_JS_BUNDLE_START`
    pub name: String,
    /// Optional classification
    pub tag: Option<String>,
    /// Correlator supplied by the framework
    pub instance_key: i32,
    /// Framework clock value, when the framework provides one
    pub time: Option<i64>,
}

impl Marker {
    /// Create a marker observed now.
    pub fn new(name: impl Into<String>, tag: Option<&str>, instance_key: i32) -> Self {
        Self {
            name: name.into(),
            tag: tag.map(str::to_owned),
            instance_key,
            time: None,
        }
    }

    /// Attach the framework's own timestamp.
    pub fn at(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }
}

/// Receives framework markers. Called from any thread.
pub trait MarkerListener: Send + Sync {
    fn on_marker(&self, marker: Marker);
}

/// A framework marker stream that listeners can subscribe to.
pub trait MarkerSource {
    fn add_listener(&self, listener: Arc<dyn MarkerListener>);
}

/// Pure forwarding shim from a [`MarkerSource`] into an [`EventLog`].
#[derive(Debug)]
pub struct MarkerIngestor {
    log: Arc<EventLog>,
}

impl MarkerIngestor {
    pub fn new(log: Arc<EventLog>) -> Self {
        Self { log }
    }

    /// Subscribe a new ingestor to `source`.
    ///
    /// Must happen before the framework starts emitting, otherwise early
    /// markers are lost.
    pub fn install(source: &dyn MarkerSource, log: Arc<EventLog>) -> Arc<Self> {
        let ingestor = Arc::new(Self::new(log));
        source.add_listener(ingestor.clone());
        tracing::debug!(target: "markers", "marker listener installed");
        ingestor
    }
}

impl MarkerListener for MarkerIngestor {
    fn on_marker(&self, marker: Marker) {
        let Marker {
            name,
            tag,
            instance_key,
            time,
        } = marker;

        if let Err(e) = self.log.append(name, tag.as_deref(), instance_key, time) {
            tracing::warn!(target: "markers", error = %e, instance_key, "dropped framework marker");
        }
    }
}
