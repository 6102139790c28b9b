//! Subscriber installation for binaries, benches and tests.

use tracing_subscriber::EnvFilter;

/// Settings for [`init_tracing`].
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Filter directives used when `RUST_LOG` is not set.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Include the event target in each line.
    pub with_target: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: "pushflow=info".to_string(),
            json: false,
            with_target: true,
        }
    }
}

impl TracingConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback filter directives.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Switches JSON output on or off.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Shows or hides event targets.
    #[must_use]
    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }
}

/// Installs a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over [`TracingConfig::filter`]. Returns false
/// if a global subscriber was already installed.
pub fn init_tracing(config: &TracingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_builder() {
        let config = TracingConfig::new()
            .with_filter("pushflow::consumer=trace")
            .with_json(true)
            .with_target(false);

        assert_eq!(config.filter, "pushflow::consumer=trace");
        assert!(config.json);
        assert!(!config.with_target);
    }

    #[test]
    fn test_init_is_idempotent() {
        let _ = init_tracing(&TracingConfig::default());
        assert!(!init_tracing(&TracingConfig::default()));
    }
}
