//! # Pushflow
//!
//! Thread-safe, push-based consumer handles with scoped cleanup.
//!
//! A producer delivers values to a [`Consumer`](consumer::Consumer) and ends
//! the channel with an error or a completion signal. The channel may also be
//! terminated from outside, for example by the scope that owns the
//! subscription. Whichever happens first wins, and the
//! [`Lifetime`](lifetime::Lifetime) attached to the consumer is destroyed
//! exactly once:
//!
//! - **Single termination**: error, done and terminate may race freely
//! - **No callbacks after termination**: `put_next` returns `false`
//! - **Reentrancy**: handlers and cleanup actions may call back into the channel
//! - **Cleanup on every path**: termination, late attachment, or dropping the
//!   last handle
//!
//! ## Quick Start
//!
//! ```rust
//! use pushflow::prelude::*;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//!
//! let released = Arc::new(AtomicBool::new(false));
//!
//! let consumer: Consumer<i32, String> = Consumer::builder()
//!     .on_next(|value: i32| println!("got {value}"))
//!     .on_error(|error: String| eprintln!("failed: {error}"))
//!     .build();
//!
//! let mut lifetime = Lifetime::new();
//! let flag = released.clone();
//! lifetime.add(move || flag.store(true, Ordering::SeqCst));
//! consumer.set_lifetime(lifetime);
//!
//! assert!(consumer.put_next(1));
//! consumer.put_error("boom".to_string());
//!
//! assert!(released.load(Ordering::SeqCst));
//! assert!(!consumer.put_next(2));
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod consumer;
pub mod errors;
pub mod lifetime;
pub mod observability;
pub mod testing;


/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::consumer::{
        Consumer, ConsumerBuilder, NoError, NoValue, Observer, TerminationGuard,
    };
    pub use crate::errors::{CleanupFailure, LifetimeError, PushflowError};
    pub use crate::lifetime::Lifetime;
}
