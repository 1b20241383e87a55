//! Session wiring: one log, one ingestor, one watcher.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::MarkersConfig;
use crate::error::MarkersResult;
use crate::ingest::{MarkerIngestor, MarkerSource};
use crate::log::EventLog;
use crate::record::NO_INSTANCE_KEY;
use crate::runtime::RuntimeProvider;
use crate::view::ViewHierarchy;
use crate::watcher::{CompletionReceiver, CompletionWatcher};

/// Builder for a [`MarkersSession`].
#[derive(Debug)]
pub struct SessionBuilder {
    start_time: i64,
    config: MarkersConfig,
    clock: Arc<dyn Clock>,
}

impl SessionBuilder {
    /// Use the given names instead of the defaults.
    pub fn with_config(mut self, config: MarkersConfig) -> Self {
        self.config = config;
        self
    }

    /// Stamp records with `clock` instead of the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create the log and hook it up to the host.
    ///
    /// The birth record is appended before the marker listener is installed,
    /// so it is the first record unless a custom event races ahead of it.
    pub fn start(
        self,
        markers: &dyn MarkerSource,
        views: &dyn ViewHierarchy,
        runtime: Arc<dyn RuntimeProvider>,
    ) -> MarkersResult<MarkersSession> {
        self.config.validate()?;

        let log = Arc::new(EventLog::with_clock(self.start_time, self.clock));
        log.append(
            self.config.birth_marker.as_str(),
            None,
            NO_INSTANCE_KEY,
            Some(self.start_time),
        )?;

        let ingestor = MarkerIngestor::install(markers, log.clone());
        let watcher = CompletionWatcher::new(log.clone(), runtime, self.config.clone())?;
        watcher.watch(views);

        tracing::info!(
            target: "markers",
            start_time = self.start_time,
            native_id = %self.config.completion_view_id,
            "markers session started"
        );

        Ok(MarkersSession {
            log,
            ingestor,
            watcher,
            config: self.config,
        })
    }
}

/// A running markers session.
///
/// Create one per process, as early as possible:
///
/// ```rust,ignore
/// let session = MarkersSession::builder(process_start_millis)
///     .start(&react_markers, &view_finder, Arc::new(move || bridge.current()))?;
///
/// session.log().log_start("fetch_config", None)?;
/// ```
#[derive(Debug)]
pub struct MarkersSession {
    log: Arc<EventLog>,
    ingestor: Arc<MarkerIngestor>,
    watcher: Arc<CompletionWatcher>,
    config: MarkersConfig,
}

impl MarkersSession {
    /// Begin configuring a session whose logical zero-point is `start_time`.
    pub fn builder(start_time: i64) -> SessionBuilder {
        SessionBuilder {
            start_time,
            config: MarkersConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// The shared log, for custom events.
    pub fn log(&self) -> &Arc<EventLog> {
        &self.log
    }

    pub fn ingestor(&self) -> &Arc<MarkerIngestor> {
        &self.ingestor
    }

    pub fn watcher(&self) -> &Arc<CompletionWatcher> {
        &self.watcher
    }

    pub fn config(&self) -> &MarkersConfig {
        &self.config
    }

    /// Take the completion receiver; see [`CompletionWatcher::completion`].
    pub fn completion(&self) -> Option<CompletionReceiver> {
        self.watcher.completion()
    }
}
