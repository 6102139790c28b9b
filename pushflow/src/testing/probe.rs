//! Counting cleanup actions.

use crate::lifetime::Lifetime;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Hands out cleanup actions that count their runs.
#[derive(Debug, Clone, Default)]
pub struct CleanupProbe {
    runs: Arc<AtomicUsize>,
}

impl CleanupProbe {
    /// Creates a probe with no recorded runs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an action that records one run.
    #[must_use]
    pub fn action(&self) -> impl FnOnce() + Send + 'static {
        let runs = Arc::clone(&self.runs);
        move || {
            runs.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Returns a lifetime holding a single action of this probe.
    #[must_use]
    pub fn lifetime(&self) -> Lifetime {
        let mut lifetime = Lifetime::new();
        lifetime.add(self.action());
        lifetime
    }

    /// Returns how many actions of this probe have run.
    #[must_use]
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_counts_runs() {
        let probe = CleanupProbe::new();
        let mut lifetime = probe.lifetime();
        lifetime.add(probe.action());
        assert_eq!(probe.runs(), 0);

        lifetime.destroy();
        assert_eq!(probe.runs(), 2);
    }
}
