//! The `Lifetime` registry.

use crate::errors::{CleanupFailure, LifetimeError};
use crate::observability::LIFETIME_TARGET;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// A deferred action, with optional name.
struct CleanupAction {
    /// The action itself.
    action: Box<dyn FnOnce() + Send>,
    /// Optional name for logs and failure reports.
    name: Option<String>,
}

impl CleanupAction {
    fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| "<unnamed>".to_string())
    }
}

/// A panic caught while running an action.
type CaughtPanic = (String, Box<dyn Any + Send>);

/// Registry of deferred actions executed in LIFO order.
///
/// Every action runs at most once. Destroying the registry moves the actions
/// out before running them, so a second `destroy()` (or the final `Drop`) finds
/// nothing left to do. Moving a `Lifetime` moves its actions; [`Lifetime::take`]
/// does the same through a `&mut` and leaves an empty registry behind.
///
/// If an action panics the remaining actions still run. [`Lifetime::destroy`]
/// then re-raises the first panic on the calling thread,
/// [`Lifetime::try_destroy`] reports all of them as an error, and `Drop` only
/// logs them.
#[derive(Default)]
pub struct Lifetime {
    /// Registered actions, oldest first.
    actions: Vec<CleanupAction>,
}

impl Lifetime {
    /// Creates an empty lifetime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a deferred action.
    pub fn add<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.actions.push(CleanupAction {
            action: Box::new(action),
            name: None,
        });
    }

    /// Registers a deferred action under a name used in logs and failures.
    pub fn add_named<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.actions.push(CleanupAction {
            action: Box::new(action),
            name: Some(name.into()),
        });
    }

    /// Nests another lifetime inside this one.
    ///
    /// The nested actions run, as a unit, at the position the nested lifetime
    /// was added.
    pub fn add_lifetime(&mut self, mut other: Self) {
        if other.is_empty() {
            return;
        }
        self.add(move || other.destroy());
    }

    /// Keeps `value` alive until this lifetime is destroyed.
    pub fn keep_alive<T>(&mut self, value: T)
    where
        T: Send + 'static,
    {
        self.add(move || drop(value));
    }

    /// Moves every action into a new lifetime, leaving this one empty.
    #[must_use]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Forgets every action without running it.
    ///
    /// State captured by the actions is dropped.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Returns the number of pending actions.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if no action is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Runs every pending action, most recent first.
    ///
    /// # Panics
    ///
    /// Re-raises the first panic raised by an action, after all actions have
    /// run. Nothing is re-raised if the current thread is already unwinding.
    pub fn destroy(&mut self) {
        let mut panics = self.run_pending().into_iter();
        if let Some((_, payload)) = panics.next() {
            if !std::thread::panicking() {
                panic::resume_unwind(payload);
            }
        }
    }

    /// Runs every pending action, most recent first, reporting panics.
    pub fn try_destroy(&mut self) -> Result<(), LifetimeError> {
        let failures: Vec<CleanupFailure> = self
            .run_pending()
            .into_iter()
            .map(|(name, payload)| CleanupFailure::from_panic(name, payload.as_ref()))
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LifetimeError::CleanupPanicked { failures })
        }
    }

    fn run_pending(&mut self) -> Vec<CaughtPanic> {
        let actions = std::mem::take(&mut self.actions);
        if actions.is_empty() {
            return Vec::new();
        }

        debug!(target: LIFETIME_TARGET, count = actions.len(), "destroying lifetime");

        let mut panics = Vec::new();
        for entry in actions.into_iter().rev() {
            let name = entry.display_name();
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(entry.action)) {
                let failure = CleanupFailure::from_panic(name.as_str(), payload.as_ref());
                warn!(
                    target: LIFETIME_TARGET,
                    action = %failure.name,
                    "cleanup action panicked: {}",
                    failure.message
                );
                panics.push((name, payload));
            }
        }
        panics
    }
}

impl Drop for Lifetime {
    fn drop(&mut self) {
        // Already logged by run_pending.
        let _ = self.run_pending();
    }
}

impl fmt::Debug for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifetime")
            .field("pending_count", &self.pending_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(counter: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
        let counter = counter.clone();
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_lifetime_creation() {
        let lifetime = Lifetime::new();
        assert_eq!(lifetime.pending_count(), 0);
        assert!(lifetime.is_empty());
    }

    #[test]
    fn test_destroy_runs_each_action_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut lifetime = Lifetime::new();
        lifetime.add(counting(&counter));
        lifetime.add(counting(&counter));

        lifetime.destroy();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(lifetime.is_empty());

        lifetime.destroy();
        drop(lifetime);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_destroy_empty_is_noop() {
        let mut lifetime = Lifetime::new();
        lifetime.destroy();
        assert!(lifetime.try_destroy().is_ok());
    }

    #[test]
    fn test_lifo_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut lifetime = Lifetime::new();

        for i in 1..=3 {
            let order = order.clone();
            lifetime.add(move || order.lock().push(i));
        }

        lifetime.destroy();
        assert_eq!(*order.lock(), vec![3, 2, 1]);
    }

    #[test]
    fn test_drop_runs_actions() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let mut lifetime = Lifetime::new();
            lifetime.add(counting(&counter));
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_take_leaves_source_empty() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut source = Lifetime::new();
        for _ in 0..3 {
            source.add(counting(&counter));
        }

        let mut moved = source.take();
        assert_eq!(source.pending_count(), 0);
        assert_eq!(moved.pending_count(), 3);

        source.destroy();
        drop(source);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        moved.destroy();
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_clear_forgets_without_running() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut lifetime = Lifetime::new();
        lifetime.add(counting(&counter));

        lifetime.clear();
        lifetime.destroy();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_add_lifetime_nests() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let push = |label: &'static str| {
            let order = order.clone();
            move || order.lock().push(label)
        };

        let mut inner = Lifetime::new();
        inner.add(push("inner-1"));
        inner.add(push("inner-2"));

        let mut outer = Lifetime::new();
        outer.add(push("outer-1"));
        outer.add_lifetime(inner);
        outer.add(push("outer-2"));
        assert_eq!(outer.pending_count(), 3);

        outer.destroy();
        assert_eq!(
            *order.lock(),
            vec!["outer-2", "inner-2", "inner-1", "outer-1"]
        );
    }

    #[test]
    fn test_add_empty_lifetime_is_skipped() {
        let mut outer = Lifetime::new();
        outer.add_lifetime(Lifetime::new());
        assert!(outer.is_empty());
    }

    #[test]
    fn test_keep_alive_releases_on_destroy() {
        let resource = Arc::new(());
        let mut lifetime = Lifetime::new();
        lifetime.keep_alive(resource.clone());
        assert_eq!(Arc::strong_count(&resource), 2);

        lifetime.destroy();
        assert_eq!(Arc::strong_count(&resource), 1);
    }

    #[test]
    fn test_try_destroy_runs_all_and_reports() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut lifetime = Lifetime::new();
        lifetime.add(counting(&counter));
        lifetime.add_named("explodes", || panic!("Intentional"));
        lifetime.add(counting(&counter));

        let err = lifetime.try_destroy().unwrap_err();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(
            err.failures(),
            &[CleanupFailure::new("explodes", "Intentional")]
        );
        assert!(lifetime.is_empty());
    }

    #[test]
    fn test_destroy_reraises_first_panic_after_running_all() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut lifetime = Lifetime::new();
        lifetime.add(counting(&counter));
        lifetime.add_named("second", || panic!("second"));
        lifetime.add_named("first", || panic!("first"));

        let result = panic::catch_unwind(AssertUnwindSafe(|| lifetime.destroy()));

        let payload = result.unwrap_err();
        assert_eq!(crate::errors::panic_message(payload.as_ref()), "first");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_swallows_panics() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut lifetime = Lifetime::new();
        lifetime.add(counting(&counter));
        lifetime.add(|| panic!("Intentional"));

        drop(lifetime);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug_shows_pending_count() {
        let mut lifetime = Lifetime::new();
        lifetime.add(|| {});
        assert_eq!(format!("{lifetime:?}"), "Lifetime { pending_count: 1 }");
    }
}
