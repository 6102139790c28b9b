//! The observer capability set and marker types.

/// Something that can receive the events of one channel.
///
/// [`Consumer::from_observer`](super::Consumer::from_observer) adapts an
/// observer into a consumer. The consumer guarantees that `on_error` and
/// `on_done` are mutually exclusive, that each is called at most once, and
/// that nothing is called after either of them.
#[cfg_attr(test, mockall::automock)]
pub trait Observer<V: 'static, E: 'static> {
    /// Receives a value.
    fn on_next(&self, value: V);

    /// Receives the terminal error.
    fn on_error(&self, error: E);

    /// Receives the completion signal.
    fn on_done(&self);
}

/// Error type of channels that cannot fail.
///
/// Uninhabited, so `put_error` can never be called on such a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoError {}

/// Value type of channels that only signal termination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoValue;
