//! Consumer handles.
//!
//! A [`Consumer`] is the receiving end of a push-based channel: a cheap,
//! clonable handle to shared state holding the three user callbacks (value,
//! error, done) and the [`Lifetime`](crate::lifetime::Lifetime) to destroy when
//! the channel terminates.
//!
//! This module provides:
//! - `Consumer` with the delivery and termination operations
//! - `ConsumerBuilder` for consumers with only some handlers
//! - `Observer` for building a consumer from a trait object
//! - `TerminationGuard` for scopes that must terminate their consumers on exit

mod builder;
mod guard;
mod handle;
mod observer;

pub use builder::ConsumerBuilder;
pub use guard::TerminationGuard;
pub use handle::Consumer;
pub use observer::{NoError, NoValue, Observer};

#[cfg(test)]
pub use observer::MockObserver;
