//! The shared consumer state and its handle.

use super::{ConsumerBuilder, NoError, Observer, TerminationGuard};
use crate::lifetime::Lifetime;
use crate::observability::CONSUMER_TARGET;
use parking_lot::Mutex;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{trace, warn};

pub(super) type NextFn<V> = Arc<dyn Fn(V) + Send + Sync>;
pub(super) type ErrorFn<E> = Box<dyn FnOnce(E) + Send>;
pub(super) type DoneFn = Box<dyn FnOnce() + Send>;

/// The two terminal handlers. Claimed together so only one of them can fire.
struct Terminal<E> {
    error: ErrorFn<E>,
    done: DoneFn,
}

/// Bookkeeping guarded by the consumer lock.
struct State<V, E> {
    /// Set once, never cleared.
    terminated: bool,
    /// `None` once terminated.
    next: Option<NextFn<V>>,
    /// `None` once a terminal handler was claimed or the channel terminated.
    terminal: Option<Terminal<E>>,
    /// Destroyed on termination.
    lifetime: Lifetime,
}

impl<V, E> State<V, E> {
    /// Values are only accepted until a terminal handler is claimed.
    fn accepts_values(&self) -> bool {
        !self.terminated && self.terminal.is_some()
    }
}

struct Shared<V, E> {
    state: Mutex<State<V, E>>,
}

impl<V, E> Drop for Shared<V, E> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if !state.terminated {
            state.terminated = true;
            trace!(
                target: CONSUMER_TARGET,
                pending = state.lifetime.pending_count(),
                "consumer dropped before termination"
            );
            drop(state.lifetime.take());
        }
    }
}

/// A handle to one push-based channel.
///
/// Cloning a `Consumer` yields another handle to the **same** channel. Any
/// handle may deliver or terminate, from any thread.
///
/// # Invariants
///
/// 1. The channel terminates exactly once and is never re-armed.
/// 2. No callback is invoked after termination.
/// 3. The attached lifetime is destroyed exactly once, on the thread that
///    terminated the channel, after the internal lock has been released.
/// 4. `on_error` and `on_done` are mutually exclusive and each terminates.
///
/// The internal lock is never held while user code runs, so callbacks and
/// cleanup actions may call back into the same channel.
pub struct Consumer<V, E = NoError> {
    shared: Arc<Shared<V, E>>,
}

impl<V, E> Consumer<V, E> {
    /// Creates a consumer from its value, error and done handlers.
    pub fn new<N, R, D>(next: N, error: R, done: D) -> Self
    where
        N: Fn(V) + Send + Sync + 'static,
        R: FnOnce(E) + Send + 'static,
        D: FnOnce() + Send + 'static,
    {
        Self::from_parts(Arc::new(next), Box::new(error), Box::new(done))
    }

    /// Creates a consumer that only handles values.
    ///
    /// Errors are absorbed; termination and cleanup behave as usual.
    pub fn from_next<N>(next: N) -> Self
    where
        N: Fn(V) + Send + Sync + 'static,
    {
        Self::new(next, |_| {}, || {})
    }

    /// Creates a consumer that forwards every event to `observer`.
    pub fn from_observer<O>(observer: O) -> Self
    where
        O: Observer<V, E> + Send + Sync + 'static,
        V: 'static,
        E: 'static,
    {
        let observer = Arc::new(observer);
        let on_error = Arc::clone(&observer);
        let on_done = Arc::clone(&observer);
        Self::new(
            move |value| observer.on_next(value),
            move |error| on_error.on_error(error),
            move || on_done.on_done(),
        )
    }

    /// Starts building a consumer with optional handlers.
    #[must_use]
    pub fn builder() -> ConsumerBuilder<V, E> {
        ConsumerBuilder::new()
    }

    pub(super) fn from_parts(next: NextFn<V>, error: ErrorFn<E>, done: DoneFn) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    terminated: false,
                    next: Some(next),
                    terminal: Some(Terminal { error, done }),
                    lifetime: Lifetime::new(),
                }),
            }),
        }
    }

    /// Delivers a value.
    ///
    /// Returns `false`, without invoking anything, if the channel has already
    /// terminated; the producer should stop. Returns `true` once the value
    /// handler has run.
    pub fn put_next(&self, value: V) -> bool {
        let next = {
            let state = self.shared.state.lock();
            if !state.accepts_values() {
                return false;
            }
            match &state.next {
                Some(next) => Arc::clone(next),
                None => return false,
            }
        };

        next(value);
        true
    }

    /// Delivers the terminal error, then terminates.
    ///
    /// No-op if the channel has terminated or another terminal event won.
    pub fn put_error(&self, error: E) {
        let Some(Terminal { error: handler, done }) = self.claim_terminal() else {
            return;
        };
        drop(done);

        let _terminate = TerminateOnExit(self);
        handler(error);
    }

    /// Delivers the completion signal, then terminates.
    ///
    /// No-op if the channel has terminated or another terminal event won.
    pub fn put_done(&self) {
        let Some(Terminal { error, done: handler }) = self.claim_terminal() else {
            return;
        };
        drop(error);

        let _terminate = TerminateOnExit(self);
        handler();
    }

    fn claim_terminal(&self) -> Option<Terminal<E>> {
        let mut state = self.shared.state.lock();
        if state.terminated {
            return None;
        }
        state.terminal.take()
    }

    /// Attaches the lifetime to destroy when the channel terminates.
    ///
    /// If the channel has already terminated, `lifetime` is destroyed right
    /// away on the calling thread.
    ///
    /// A channel owns one lifetime. Attaching a second one replaces the first,
    /// and the replaced lifetime is destroyed immediately so its actions are
    /// not lost; combine lifetimes with [`Lifetime::add_lifetime`] instead.
    pub fn set_lifetime(&self, mut lifetime: Lifetime) {
        let mut state = self.shared.state.lock();
        if state.terminated {
            drop(state);
            trace!(
                target: CONSUMER_TARGET,
                pending = lifetime.pending_count(),
                "lifetime attached after termination"
            );
            lifetime.destroy();
            return;
        }

        let mut superseded = std::mem::replace(&mut state.lifetime, lifetime);
        drop(state);

        if !superseded.is_empty() {
            warn!(
                target: CONSUMER_TARGET,
                pending = superseded.pending_count(),
                "replacing an attached lifetime; destroying the previous one"
            );
            superseded.destroy();
        }
    }

    /// Adds one cleanup action to the attached lifetime.
    ///
    /// Runs `action` right away if the channel has already terminated.
    pub fn add_cleanup<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.shared.state.lock();
        if state.terminated {
            drop(state);
            action();
        } else {
            state.lifetime.add(action);
        }
    }

    /// Terminates the channel.
    ///
    /// Idempotent. The first call marks the channel terminated, releases the
    /// handlers and destroys the attached lifetime. After it returns,
    /// `put_next` returns `false`.
    ///
    /// # Panics
    ///
    /// Re-raises the first panic of a cleanup action, see
    /// [`Lifetime::destroy`].
    pub fn terminate(&self) {
        let (mut lifetime, next, terminal) = {
            let mut state = self.shared.state.lock();
            if state.terminated {
                return;
            }
            state.terminated = true;
            (state.lifetime.take(), state.next.take(), state.terminal.take())
        };

        trace!(
            target: CONSUMER_TARGET,
            pending = lifetime.pending_count(),
            "consumer terminated"
        );

        drop(next);
        drop(terminal);
        lifetime.destroy();
    }

    /// Returns whether the channel has terminated.
    ///
    /// The channel counts as terminated as soon as a terminal event has been
    /// claimed, including while its `on_error` or `on_done` handler runs. This
    /// is the same point from which `put_next` returns `false`.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        !self.shared.state.lock().accepts_values()
    }

    /// Returns a guard that terminates the channel when dropped.
    #[must_use]
    pub fn terminate_on_drop(&self) -> TerminationGuard<V, E> {
        TerminationGuard::new(self.clone())
    }
}

/// Terminates on scope exit, including when a terminal handler panics.
struct TerminateOnExit<'a, V, E>(&'a Consumer<V, E>);

impl<V, E> Drop for TerminateOnExit<'_, V, E> {
    fn drop(&mut self) {
        self.0.terminate();
    }
}

impl<V, E> Clone for Consumer<V, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V, E> PartialEq for Consumer<V, E> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<V, E> Eq for Consumer<V, E> {}

impl<V, E> Hash for Consumer<V, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.shared).hash(state);
    }
}

impl<V, E> fmt::Debug for Consumer<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("Consumer")
            .field("terminated", &!state.accepts_values())
            .field("pending_cleanup", &state.lifetime.pending_count())
            .finish()
    }
}
