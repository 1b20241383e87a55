//! One-shot TTI completion trigger.
//!
//! The watcher waits for a view carrying the configured native id to be
//! found and drawn, then finalizes the session exactly once:
//!
//! 1. append the terminal marker to the log
//! 2. serialize the log
//! 3. publish the payload to the script runtime
//! 4. emit the ready event naming the published variable
//!
//! There is no timeout. If the view never appears the watcher stays armed.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;

use crate::config::MarkersConfig;
use crate::error::MarkersResult;
use crate::log::EventLog;
use crate::record::NO_INSTANCE_KEY;
use crate::runtime::RuntimeProvider;
use crate::view::{RenderHook, RenderTarget, ViewHierarchy};

/// Lifecycle of a [`CompletionWatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    /// Waiting for the completion view to be drawn
    Armed,
    /// Finalized; further triggers are ignored
    Fired,
}

/// Outcome of finalization, delivered once on the completion channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    /// The serialized log, as handed to the runtime
    pub payload: String,
    /// Why delivery failed, if it did
    pub delivery_error: Option<String>,
}

impl CompletionReport {
    /// Whether both sinks accepted the payload.
    pub fn is_delivered(&self) -> bool {
        self.delivery_error.is_none()
    }
}

/// Receiver resolving once with the [`CompletionReport`].
pub type CompletionReceiver = oneshot::Receiver<CompletionReport>;

/// Finalizes the markers log when the completion view is first drawn.
pub struct CompletionWatcher {
    log: Arc<EventLog>,
    runtime: Arc<dyn RuntimeProvider>,
    config: MarkersConfig,
    fired: AtomicBool,
    completion_tx: Mutex<Option<oneshot::Sender<CompletionReport>>>,
    completion_rx: Mutex<Option<CompletionReceiver>>,
}

impl CompletionWatcher {
    /// Create an armed watcher.
    ///
    /// Fails with [`InvalidConfig`](crate::MarkersError::InvalidConfig) if any configured name is
    /// blank.
    pub fn new(
        log: Arc<EventLog>,
        runtime: Arc<dyn RuntimeProvider>,
        config: MarkersConfig,
    ) -> MarkersResult<Arc<Self>> {
        config.validate()?;

        let (tx, rx) = oneshot::channel();
        Ok(Arc::new(Self {
            log,
            runtime,
            config,
            fired: AtomicBool::new(false),
            completion_tx: Mutex::new(Some(tx)),
            completion_rx: Mutex::new(Some(rx)),
        }))
    }

    /// Start watching `views` for the completion view.
    ///
    /// Every time the hierarchy reports the view (initially or after a
    /// rebuild) a one-shot render hook is registered on it. Only the first
    /// hook to fire finalizes.
    pub fn watch(self: &Arc<Self>, views: &dyn ViewHierarchy) {
        let watcher = Arc::clone(self);
        views.on_view_found(
            &self.config.completion_view_id,
            Box::new(move |view: Arc<dyn RenderTarget>| watcher.on_view_found(view.as_ref())),
        );
        tracing::debug!(
            target: "markers",
            native_id = %self.config.completion_view_id,
            "waiting for completion view"
        );
    }

    fn on_view_found(self: &Arc<Self>, view: &dyn RenderTarget) {
        if self.state() == WatcherState::Fired {
            return;
        }
        tracing::debug!(target: "markers", "completion view found, waiting for draw");

        let watcher = Arc::clone(self);
        view.on_next_render(RenderHook::new(move || watcher.on_render()));
    }

    fn on_render(&self) {
        match self.finalize() {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::debug!(target: "markers", "completion view drawn again, ignoring");
            }
            Err(e) => {
                tracing::error!(target: "markers", error = %e, "failed to deliver markers log");
            }
        }
    }

    /// Run the finalize sequence if it has not run yet.
    ///
    /// Returns the delivered payload, or `None` if the watcher had already
    /// fired. Delivery errors are returned after the terminal marker has been
    /// logged; they are not retried.
    pub fn finalize(&self) -> MarkersResult<Option<String>> {
        if self
            .fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(None);
        }

        if let Err(e) =
            self.log
                .append(self.config.completion_marker.as_str(), None, NO_INSTANCE_KEY, None)
        {
            self.complete(CompletionReport {
                payload: self.log.to_json(),
                delivery_error: Some(e.to_string()),
            });
            return Err(e);
        }
        let payload = self.log.to_json();

        tracing::info!(
            target: "markers",
            records = self.log.len(),
            bytes = payload.len(),
            "TTI complete, publishing markers log"
        );

        let delivered = self.deliver(&payload);
        self.complete(CompletionReport {
            payload: payload.clone(),
            delivery_error: delivered.as_ref().err().map(ToString::to_string),
        });
        delivered.map(|()| Some(payload))
    }

    fn deliver(&self, payload: &str) -> MarkersResult<()> {
        let runtime = self.runtime.require()?;
        runtime.publish_value(&self.config.variable_name, payload)?;
        runtime.emit_event(&self.config.ready_event, &self.config.variable_name)
    }

    fn complete(&self, report: CompletionReport) {
        let tx = self
            .completion_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(tx) = tx {
            // Nobody listening is fine.
            let _ = tx.send(report);
        }
    }

    /// Take the receiver for the completion report.
    ///
    /// Only the first call gets it.
    pub fn completion(&self) -> Option<CompletionReceiver> {
        self.completion_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn state(&self) -> WatcherState {
        if self.fired.load(Ordering::Acquire) {
            WatcherState::Fired
        } else {
            WatcherState::Armed
        }
    }

    pub fn config(&self) -> &MarkersConfig {
        &self.config
    }
}

impl fmt::Debug for CompletionWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionWatcher")
            .field("state", &self.state())
            .field("native_id", &self.config.completion_view_id)
            .finish_non_exhaustive()
    }
}
