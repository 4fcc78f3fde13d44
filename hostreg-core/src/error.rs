//! Error types for hostreg.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`RegistryError`] - Errors surfaced to callers of registry operations
//! - [`ActivationError`] - Errors from provisioning a single host
//! - [`ObserverError`] - Errors from a single observer notification

use crate::event::HostEventKind;
use std::time::Duration;
use thiserror::Error;

/// A boxed error type for collaborator failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by registry operations.
///
/// Only failures that end an operation show up here. Per-host and
/// per-observer failures inside a batch are reported, not returned.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The host store (or document source) could not complete a call.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] BoxError),

    /// Activation of a single host failed during `add`.
    #[error("activation of `{hostname}` failed: {source}")]
    Activation {
        /// Host whose activation failed.
        hostname: String,
        /// Underlying activation failure.
        #[source]
        source: ActivationError,
    },
}

impl RegistryError {
    /// Wraps a store failure.
    pub fn store(err: impl Into<BoxError>) -> Self {
        RegistryError::StoreUnavailable(err.into())
    }
}

/// Errors that can occur while activating a host.
#[derive(Error, Debug)]
pub enum ActivationError {
    /// A required context key is absent or not a string.
    #[error("context key `{0}` is missing or not a string")]
    MissingKey(&'static str),

    /// The backing resource refused the binding.
    #[error("backend error: {0}")]
    Backend(#[source] BoxError),

    /// The activator panicked.
    #[error("activator panicked: {0}")]
    Panicked(String),
}

impl From<BoxError> for ActivationError {
    fn from(err: BoxError) -> Self {
        ActivationError::Backend(err)
    }
}

/// Errors that can occur while notifying one observer.
#[derive(Error, Debug)]
pub enum ObserverError {
    /// The observer returned an error.
    #[error("observer `{observer}` failed on {event}: {source}")]
    Failed {
        /// Observer name.
        observer: String,
        /// Event being delivered.
        event: HostEventKind,
        /// Error returned by the observer.
        #[source]
        source: BoxError,
    },

    /// The observer panicked.
    #[error("observer `{observer}` panicked on {event}: {message}")]
    Panicked {
        /// Observer name.
        observer: String,
        /// Event being delivered.
        event: HostEventKind,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// The observer did not finish in time.
    #[error("observer `{observer}` timed out on {event} after {after:?}")]
    TimedOut {
        /// Observer name.
        observer: String,
        /// Event being delivered.
        event: HostEventKind,
        /// Configured bound.
        after: Duration,
    },
}

impl ObserverError {
    /// Name of the observer that failed.
    pub fn observer(&self) -> &str {
        match self {
            ObserverError::Failed { observer, .. }
            | ObserverError::Panicked { observer, .. }
            | ObserverError::TimedOut { observer, .. } => observer,
        }
    }

    /// Event that was being delivered.
    pub fn event(&self) -> HostEventKind {
        match self {
            ObserverError::Failed { event, .. }
            | ObserverError::Panicked { event, .. }
            | ObserverError::TimedOut { event, .. } => *event,
        }
    }
}

/// Extracts a readable message from a panic payload.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
