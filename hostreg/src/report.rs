//! Outcome of a registry operation.

use hostreg_core::{ActivationError, ObserverError, VirtualHost};
use std::sync::Arc;
use thiserror::Error;

/// An isolated failure that did not stop the operation.
#[derive(Error, Debug)]
pub enum Failure {
    /// A host could not be activated.
    #[error("activation of `{hostname}` failed: {source}")]
    Activation {
        /// Host whose activation failed.
        hostname: String,
        /// Underlying failure.
        #[source]
        source: ActivationError,
    },

    /// An observer failed while being told about a host.
    #[error("notification about `{hostname}` failed: {source}")]
    Observer {
        /// Host the notification was about.
        hostname: String,
        /// Underlying failure.
        #[source]
        source: ObserverError,
    },
}

impl Failure {
    /// Host the failure concerns.
    pub fn hostname(&self) -> &str {
        match self {
            Failure::Activation { hostname, .. } | Failure::Observer { hostname, .. } => hostname,
        }
    }
}

/// What an operation changed, and what went wrong along the way.
///
/// `added` and `removed` list the hosts that were announced to observers.
/// `failures` collects per-host and per-observer failures; they never abort
/// the operation that produced them.
#[derive(Debug, Default)]
pub struct Report {
    /// Hosts announced as added, in announcement order.
    pub added: Vec<Arc<VirtualHost>>,
    /// Hosts announced as removed.
    pub removed: Vec<Arc<VirtualHost>>,
    /// Per-host failures that did not abort the operation.
    pub failures: Vec<Failure>,
}

impl Report {
    /// `true` if nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// `true` if membership did not change.
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Hostnames of `added`.
    pub fn added_hostnames(&self) -> Vec<&str> {
        self.added.iter().map(|h| h.hostname()).collect()
    }

    /// Hostnames of `removed`.
    pub fn removed_hostnames(&self) -> Vec<&str> {
        self.removed.iter().map(|h| h.hostname()).collect()
    }

    /// Activation failures, in the order they happened.
    pub fn activation_failures(&self) -> impl Iterator<Item = (&str, &ActivationError)> {
        self.failures.iter().filter_map(|f| match f {
            Failure::Activation { hostname, source } => Some((hostname.as_str(), source)),
            Failure::Observer { .. } => None,
        })
    }

    /// Observer failures, in the order they happened.
    pub fn observer_failures(&self) -> impl Iterator<Item = (&str, &ObserverError)> {
        self.failures.iter().filter_map(|f| match f {
            Failure::Observer { hostname, source } => Some((hostname.as_str(), source)),
            Failure::Activation { .. } => None,
        })
    }
}
