//! Narrow interface to the host view hierarchy.

use std::fmt;
use std::sync::Arc;

/// A callback that runs on the next render pass of a view, at most once.
///
/// Firing consumes the hook, so a hook that has run can never run again no
/// matter how many times the render channel signals.
pub struct RenderHook {
    callback: Box<dyn FnOnce() + Send>,
}

impl RenderHook {
    pub fn new(callback: impl FnOnce() + Send + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Run the hook.
    pub fn fire(self) {
        (self.callback)()
    }
}

impl fmt::Debug for RenderHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderHook").finish_non_exhaustive()
    }
}

/// A view that has been laid out and will be drawn.
pub trait RenderTarget: Send + Sync {
    /// Run `hook` right before the next draw of this view.
    fn on_next_render(&self, hook: RenderHook);
}

/// Callback invoked each time a view with the watched native id is attached.
pub type ViewFoundCallback = Box<dyn Fn(Arc<dyn RenderTarget>) + Send + Sync>;

/// Lookup of views by native id over a tree that may be rebuilt.
pub trait ViewHierarchy {
    /// Register a persistent listener for views carrying `native_id`.
    ///
    /// The view does not have to exist yet. Implementations call `on_found`
    /// again whenever a new hierarchy containing such a view is attached.
    fn on_view_found(&self, native_id: &str, on_found: ViewFoundCallback);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_render_hook_runs_callback() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let hook = RenderHook::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        hook.fire();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_render_hook_debug() {
        let hook = RenderHook::new(|| {});
        assert_eq!(format!("{hook:?}"), "RenderHook { .. }");
    }
}
