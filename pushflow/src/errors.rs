//! Error types for pushflow.
//!
//! Stream errors never pass through these types: they are handed untouched to
//! the consumer's error callback. What lives here are faults of the primitive's
//! own bookkeeping, currently only cleanup actions that panicked.

use std::any::Any;
use std::fmt;
use thiserror::Error;

/// The main error type for pushflow operations.
#[derive(Debug, Error)]
pub enum PushflowError {
    /// A lifetime failed while running its cleanup actions.
    #[error("{0}")]
    Lifetime(#[from] LifetimeError),
}

/// Errors reported when a [`Lifetime`](crate::lifetime::Lifetime) is destroyed.
#[derive(Debug, Clone, Error)]
pub enum LifetimeError {
    /// One or more cleanup actions panicked. Every action was still run.
    #[error("{}", describe_failures(.failures))]
    CleanupPanicked {
        /// Failures in execution order.
        failures: Vec<CleanupFailure>,
    },
}

impl LifetimeError {
    /// Returns the recorded failures.
    #[must_use]
    pub fn failures(&self) -> &[CleanupFailure] {
        match self {
            Self::CleanupPanicked { failures } => failures,
        }
    }
}

/// A single cleanup action that panicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    /// Name the action was registered with, or `<unnamed>`.
    pub name: String,
    /// Rendered panic payload.
    pub message: String,
}

impl CleanupFailure {
    /// Creates a failure record.
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a failure record from a caught panic payload.
    #[must_use]
    pub fn from_panic(name: impl Into<String>, payload: &(dyn Any + Send)) -> Self {
        Self::new(name, panic_message(payload))
    }
}

impl fmt::Display for CleanupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

/// Renders a panic payload as text.
///
/// `panic!` produces either a `&'static str` or a `String`; anything else is
/// reported generically.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

fn describe_failures(failures: &[CleanupFailure]) -> String {
    let listed = failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} cleanup action(s) panicked: {listed}", failures.len())
}
