//! Scoped cleanup.
//!
//! A [`Lifetime`] owns a stack of deferred actions and runs each of them
//! exactly once, either when it is explicitly destroyed or when it goes out of
//! scope. Consumers take ownership of a lifetime through
//! [`Consumer::set_lifetime`](crate::consumer::Consumer::set_lifetime) and
//! destroy it on termination.

mod scoped;

pub use scoped::Lifetime;
