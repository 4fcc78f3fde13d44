//! # hostreg-core
//!
//! Core types and collaborator traits for the hostreg virtual host registry.
//!
//! This crate has minimal dependencies and is meant to be imported by
//! observers, stores and activators that don't need the registry itself.
//!
//! # Collaborators
//!
//! The registry talks to the outside world through four seams:
//!
//! - [`HostStore`]: the durable copy of host records (create, delete, list all)
//! - [`Activator`]: per-host provisioning, typically a database binding
//! - [`HostObserver`]: processors told about hosts joining or leaving
//! - [`DocumentSource`]: host-scoped configuration documents (alias lookup)
//!
//! Every trait uses native `async fn` for static dispatch. Observers are
//! discovered at runtime, so they also come in the object-safe
//! [`DynHostObserver`] flavour.
//!
//! # Error Types
//!
//! - [`RegistryError`] - Failures that end an operation
//! - [`ActivationError`] - Per-host activation failures
//! - [`ObserverError`] - Per-observer notification failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod activator;
mod documents;
mod error;
mod event;
mod host;
mod observer;
mod store;

// Re-exports
pub use activator::{Activator, DatabaseBinder, DatabaseParams, DatabaseTarget, NoopActivator};
pub use documents::DocumentSource;
pub use error::{ActivationError, BoxError, ObserverError, RegistryError, panic_message};
pub use event::{HostEvent, HostEventKind};
pub use host::{Context, VirtualHost};
pub use observer::{
    DynHostObserver, HostObserver, ObserverFuture, ObserverSource, SharedObserver,
};
pub use store::HostStore;
