//! Sinks exposed by the host's embedded scripting runtime.

use std::fmt;
use std::sync::Arc;

use crate::error::{MarkersError, MarkersResult};

/// The two operations the completion watcher needs from the script runtime.
pub trait ScriptRuntime: Send + Sync {
    /// Make `value` available as the global variable `name`.
    fn publish_value(&self, name: &str, value: &str) -> MarkersResult<()>;

    /// Emit `event_name` to script-side listeners with `payload`.
    fn emit_event(&self, event_name: &str, payload: &str) -> MarkersResult<()>;
}

/// Deferred access to the script runtime.
///
/// The runtime usually does not exist yet when the session starts, so the
/// handle is only resolved at the moment of delivery.
pub trait RuntimeProvider: Send + Sync {
    fn runtime(&self) -> Option<Arc<dyn ScriptRuntime>>;

    /// Resolve the handle, failing if the host has not created it yet.
    fn require(&self) -> MarkersResult<Arc<dyn ScriptRuntime>> {
        self.runtime().ok_or(MarkersError::RuntimeUnavailable)
    }
}

impl<F> RuntimeProvider for F
where
    F: Fn() -> Option<Arc<dyn ScriptRuntime>> + Send + Sync,
{
    fn runtime(&self) -> Option<Arc<dyn ScriptRuntime>> {
        self()
    }
}

/// Provider for a runtime that already exists.
#[derive(Clone)]
pub struct FixedRuntime(Arc<dyn ScriptRuntime>);

impl FixedRuntime {
    pub fn new(runtime: Arc<dyn ScriptRuntime>) -> Self {
        Self(runtime)
    }
}

impl RuntimeProvider for FixedRuntime {
    fn runtime(&self) -> Option<Arc<dyn ScriptRuntime>> {
        Some(self.0.clone())
    }
}

impl fmt::Debug for FixedRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FixedRuntime").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl ScriptRuntime for Recorder {
        fn publish_value(&self, name: &str, value: &str) -> MarkersResult<()> {
            self.calls.lock().unwrap().push(format!("publish {name}={value}"));
            Ok(())
        }

        fn emit_event(&self, event_name: &str, payload: &str) -> MarkersResult<()> {
            self.calls.lock().unwrap().push(format!("emit {event_name}({payload})"));
            Ok(())
        }
    }

    #[test]
    fn test_fixed_runtime_resolves() {
        let recorder = Arc::new(Recorder::default());
        let provider = FixedRuntime::new(recorder.clone());

        let runtime = provider.require().unwrap();
        runtime.publish_value("V", "1").unwrap();
        assert_eq!(recorder.calls.lock().unwrap().as_slice(), ["publish V=1"]);
    }

    #[test]
    fn test_closure_provider_is_deferred() {
        let slot: Arc<Mutex<Option<Arc<dyn ScriptRuntime>>>> = Arc::new(Mutex::new(None));
        let lookup = slot.clone();
        let provider = move || lookup.lock().unwrap().clone();

        assert!(matches!(provider.require(), Err(MarkersError::RuntimeUnavailable)));

        *slot.lock().unwrap() = Some(Arc::new(Recorder::default()));
        assert!(provider.require().is_ok());
    }
}
