//! Testing utilities for code built on consumers.
//!
//! This module provides:
//! - `Recorder`, a consumer factory that records every event it receives
//! - `CleanupProbe`, cleanup actions that count how often they ran

mod probe;
mod recorder;

pub use probe::CleanupProbe;
pub use recorder::{Event, Recorder};
