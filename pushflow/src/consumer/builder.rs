//! Builder for consumers with optional handlers.

use super::handle::{DoneFn, ErrorFn, NextFn};
use super::Consumer;
use crate::lifetime::Lifetime;
use std::fmt;
use std::sync::Arc;

/// Builds a [`Consumer`] from whichever handlers are provided.
///
/// Missing handlers default to no-ops. An absent error handler still lets the
/// channel terminate and run its cleanup when an error is delivered.
pub struct ConsumerBuilder<V, E> {
    next: Option<NextFn<V>>,
    error: Option<ErrorFn<E>>,
    done: Option<DoneFn>,
    lifetime: Lifetime,
}

impl<V, E> ConsumerBuilder<V, E> {
    /// Creates a builder with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: None,
            error: None,
            done: None,
            lifetime: Lifetime::new(),
        }
    }

    /// Sets the value handler.
    #[must_use]
    pub fn on_next<F>(mut self, next: F) -> Self
    where
        F: Fn(V) + Send + Sync + 'static,
    {
        self.next = Some(Arc::new(next));
        self
    }

    /// Sets the error handler.
    #[must_use]
    pub fn on_error<F>(mut self, error: F) -> Self
    where
        F: FnOnce(E) + Send + 'static,
    {
        self.error = Some(Box::new(error));
        self
    }

    /// Sets the completion handler.
    #[must_use]
    pub fn on_done<F>(mut self, done: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.done = Some(Box::new(done));
        self
    }

    /// Sets the lifetime attached to the consumer from the start.
    #[must_use]
    pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Builds the consumer.
    #[must_use]
    pub fn build(self) -> Consumer<V, E> {
        let consumer = Consumer::from_parts(
            self.next.unwrap_or_else(|| Arc::new(|_: V| {})),
            self.error.unwrap_or_else(|| Box::new(|_: E| {})),
            self.done.unwrap_or_else(|| Box::new(|| {})),
        );
        if !self.lifetime.is_empty() {
            consumer.set_lifetime(self.lifetime);
        }
        consumer
    }
}

impl<V, E> Default for ConsumerBuilder<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> fmt::Debug for ConsumerBuilder<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerBuilder")
            .field("on_next", &self.next.is_some())
            .field("on_error", &self.error.is_some())
            .field("on_done", &self.done.is_some())
            .field("lifetime", &self.lifetime)
            .finish()
    }
}
