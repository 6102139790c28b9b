//! Scope guard terminating a consumer.

use super::Consumer;
use std::fmt;

/// Terminates its consumer when dropped.
///
/// Meant for the scope that owns a subscription: whatever the producer does,
/// the channel is terminated and its cleanup runs when the scope ends.
pub struct TerminationGuard<V, E> {
    consumer: Option<Consumer<V, E>>,
}

impl<V, E> TerminationGuard<V, E> {
    pub(super) fn new(consumer: Consumer<V, E>) -> Self {
        Self {
            consumer: Some(consumer),
        }
    }

    /// Returns the guarded consumer.
    #[must_use]
    pub fn consumer(&self) -> Option<&Consumer<V, E>> {
        self.consumer.as_ref()
    }

    /// Disarms the guard, handing back the consumer without terminating it.
    #[must_use]
    pub fn release(mut self) -> Option<Consumer<V, E>> {
        self.consumer.take()
    }
}

impl<V, E> Drop for TerminationGuard<V, E> {
    fn drop(&mut self) {
        if let Some(consumer) = self.consumer.take() {
            consumer.terminate();
        }
    }
}

impl<V, E> fmt::Debug for TerminationGuard<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminationGuard")
            .field("consumer", &self.consumer)
            .finish()
    }
}
