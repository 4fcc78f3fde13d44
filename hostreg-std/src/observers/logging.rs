//! Logging observer for lifecycle observation.

use hostreg_core::{BoxError, HostObserver, VirtualHost};

/// An observer that logs host lifecycle events.
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    name: String,
}

impl LoggingObserver {
    /// Create a logging observer reported under `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new("logging")
    }
}

impl HostObserver for LoggingObserver {
    async fn on_host_added(&self, host: &VirtualHost) -> Result<(), BoxError> {
        tracing::info!(observer = %self.name, hostname = host.hostname(), "host added");
        Ok(())
    }

    async fn on_host_removed(&self, host: &VirtualHost) -> Result<(), BoxError> {
        tracing::info!(observer = %self.name, hostname = host.hostname(), "host removed");
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
