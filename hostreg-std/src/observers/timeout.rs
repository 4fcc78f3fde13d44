//! Timeout observer for time-limited notification.

use hostreg_core::{BoxError, HostObserver, VirtualHost};
use std::time::Duration;
use tokio::time::timeout;

/// Error returned when a notification times out.
#[derive(Debug, Clone, thiserror::Error)]
#[error("observer notification timed out after {0:?}")]
pub struct TimeoutError(pub Duration);

/// An observer that wraps another observer with a timeout.
pub struct TimeoutObserver<O> {
    inner: O,
    duration: Duration,
}

impl<O> TimeoutObserver<O> {
    /// Create a new timeout observer.
    pub fn new(inner: O, duration: Duration) -> Self {
        Self { inner, duration }
    }
}

impl<O: HostObserver> HostObserver for TimeoutObserver<O> {
    async fn on_host_added(&self, host: &VirtualHost) -> Result<(), BoxError> {
        match timeout(self.duration, self.inner.on_host_added(host)).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(TimeoutError(self.duration))),
        }
    }

    async fn on_host_removed(&self, host: &VirtualHost) -> Result<(), BoxError> {
        match timeout(self.duration, self.inner.on_host_removed(host)).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(TimeoutError(self.duration))),
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::LoggingObserver;

    struct Stalled;

    impl HostObserver for Stalled {
        async fn on_host_added(&self, _host: &VirtualHost) -> Result<(), BoxError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }

        async fn on_host_removed(&self, _host: &VirtualHost) -> Result<(), BoxError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn stalled_observer_times_out() {
        let observer = TimeoutObserver::new(Stalled, Duration::from_millis(10));
        let err = observer
            .on_host_added(&VirtualHost::new("a.example"))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<TimeoutError>().is_some());

        observer
            .on_host_removed(&VirtualHost::new("a.example"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn keeps_inner_name() {
        let observer = TimeoutObserver::new(LoggingObserver::new("audit"), Duration::from_secs(1));
        assert_eq!(observer.name(), "audit");
    }
}
