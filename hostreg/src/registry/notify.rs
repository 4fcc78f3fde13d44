//! Observer fan-out and guarded activation.
//!
//! Both wrap collaborator futures in `catch_unwind` so a panicking observer
//! or activator is reported like any other failure instead of tearing down
//! the pass.

use crate::report::{Failure, Report};
use futures::FutureExt;
use hostreg_core::{
    ActivationError, Activator, HostEvent, ObserverError, SharedObserver, VirtualHost,
    panic_message,
};
use std::{panic::AssertUnwindSafe, time::Duration};

/// Delivers events to a fixed observer snapshot.
pub(crate) struct Fanout<'a> {
    observers: &'a [SharedObserver],
    timeout: Option<Duration>,
}

impl<'a> Fanout<'a> {
    pub(crate) fn new(observers: &'a [SharedObserver], timeout: Option<Duration>) -> Self {
        Self { observers, timeout }
    }

    /// Notify every observer in order. Failures go to `report`.
    pub(crate) async fn deliver(&self, event: &HostEvent, report: &mut Report) {
        for observer in self.observers {
            if let Err(source) = self.deliver_one(observer, event).await {
                tracing::warn!(
                    hostname = event.hostname(),
                    error = %source,
                    "observer notification failed"
                );
                report.failures.push(Failure::Observer {
                    hostname: event.hostname().to_owned(),
                    source,
                });
            }
        }
    }

    async fn deliver_one(
        &self,
        observer: &SharedObserver,
        event: &HostEvent,
    ) -> Result<(), ObserverError> {
        let name = observer.name_dyn();
        let kind = event.kind();
        tracing::debug!(observer = name, hostname = event.hostname(), %kind, "notifying");

        // The call itself sits inside the guard; an observer may panic
        // before it hands back a future.
        let call = async {
            match event {
                HostEvent::Added(host) => observer.on_host_added_dyn(host).await,
                HostEvent::Removed(host) => observer.on_host_removed_dyn(host).await,
            }
        };
        let guarded = AssertUnwindSafe(call).catch_unwind();

        let outcome = match self.timeout {
            Some(after) => match tokio::time::timeout(after, guarded).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    return Err(ObserverError::TimedOut {
                        observer: name.to_owned(),
                        event: kind,
                        after,
                    });
                }
            },
            None => guarded.await,
        };

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(ObserverError::Failed {
                observer: name.to_owned(),
                event: kind,
                source,
            }),
            Err(payload) => Err(ObserverError::Panicked {
                observer: name.to_owned(),
                event: kind,
                message: panic_message(&*payload),
            }),
        }
    }
}

/// Run the activator for one host, turning a panic into an error.
pub(crate) async fn activate<A: Activator>(
    activator: &A,
    host: &VirtualHost,
) -> Result<(), ActivationError> {
    match AssertUnwindSafe(async { activator.activate(host.context()).await })
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(payload) => Err(ActivationError::Panicked(panic_message(&*payload))),
    }
}
