//! Observability utilities.
//!
//! pushflow logs through `tracing` under two targets, so filters such as
//! `pushflow::consumer=trace` select one side of the primitive.

#[cfg(feature = "tracing-init")]
mod subscriber;

#[cfg(feature = "tracing-init")]
pub use subscriber::{init_tracing, TracingConfig};

/// Target of consumer events: termination, late attachment, replacement.
pub const CONSUMER_TARGET: &str = "pushflow::consumer";

/// Target of lifetime events: destruction and cleanup panics.
pub const LIFETIME_TARGET: &str = "pushflow::lifetime";
