//! Recording consumers.

use crate::consumer::Consumer;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// An event observed by a [`Recorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<V, E> {
    /// A delivered value.
    Next(V),
    /// The terminal error.
    Error(E),
    /// The completion signal.
    Done,
}

/// Records the events delivered to the consumers it creates.
pub struct Recorder<V, E> {
    events: Arc<Mutex<Vec<Event<V, E>>>>,
}

impl<V, E> Recorder<V, E>
where
    V: Send + 'static,
    E: Send + 'static,
{
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a consumer whose handlers append to this recorder.
    #[must_use]
    pub fn consumer(&self) -> Consumer<V, E> {
        let on_next = Arc::clone(&self.events);
        let on_error = Arc::clone(&self.events);
        let on_done = Arc::clone(&self.events);
        Consumer::new(
            move |value: V| on_next.lock().push(Event::Next(value)),
            move |error: E| on_error.lock().push(Event::Error(error)),
            move || on_done.lock().push(Event::Done),
        )
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Returns how many terminal events (error or done) were recorded.
    #[must_use]
    pub fn terminal_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| !matches!(event, Event::Next(_)))
            .count()
    }
}

impl<V, E> Recorder<V, E>
where
    V: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Returns a copy of every recorded event, in delivery order.
    #[must_use]
    pub fn events(&self) -> Vec<Event<V, E>> {
        self.events.lock().clone()
    }

    /// Returns the recorded values, in delivery order.
    #[must_use]
    pub fn values(&self) -> Vec<V> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Next(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the recorded errors.
    #[must_use]
    pub fn errors(&self) -> Vec<E> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Error(error) => Some(error.clone()),
                _ => None,
            })
            .collect()
    }
}

impl<V, E> Clone for Recorder<V, E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<V, E> Default for Recorder<V, E>
where
    V: Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> fmt::Debug for Recorder<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("event_count", &self.events.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recorder_captures_events() {
        let recorder = Recorder::<i32, String>::new();
        let consumer = recorder.consumer();

        consumer.put_next(1);
        consumer.put_next(2);
        consumer.put_error("boom".to_string());

        assert_eq!(
            recorder.events(),
            vec![
                Event::Next(1),
                Event::Next(2),
                Event::Error("boom".to_string())
            ]
        );
        assert_eq!(recorder.values(), vec![1, 2]);
        assert_eq!(recorder.errors(), vec!["boom".to_string()]);
        assert_eq!(recorder.terminal_count(), 1);
    }

    #[test]
    fn test_empty_recorder() {
        let recorder = Recorder::<i32, String>::default();
        assert!(recorder.is_empty());
        assert_eq!(recorder.len(), 0);
    }
}
