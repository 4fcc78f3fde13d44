//! # hostreg-std
//!
//! Standard implementations for the hostreg virtual host registry.
//!
//! This crate provides:
//! - **Stores**: [`MemoryStore`](store::MemoryStore)
//! - **Activators**: [`BindingActivator`](activator::BindingActivator) over a
//!   [`DatabaseBinder`](hostreg_core::DatabaseBinder)
//! - **Observers**: catalog registration, logging, timeout
//! - **Documents**: [`MemoryDocuments`](documents::MemoryDocuments)
//! - **Testing**: recording and misbehaving collaborators

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use hostreg_core;

// Modules
pub mod activator;
pub mod documents;
pub mod observers;
pub mod store;
pub mod testing;
