//! # hostreg - Virtual Host Registry
//!
//! `hostreg` keeps the in-process set of virtual hosts (tenant/site
//! configurations) of a multi-tenant server in step with a persisted store,
//! and tells a dynamic set of observers when hosts join or leave.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hostreg::prelude::*;
//!
//! let catalog = ObserverCatalog::new();
//! catalog.register(LoggingObserver::default());
//!
//! let registry = Registry::builder(MemoryStore::new())
//!     .activator(BindingActivator::new(binder))
//!     .observer_source(catalog.clone())
//!     .build();
//!
//! registry.run().await?;          // bootstrap: activate and announce everything
//! registry.reconcile().await?;    // steady state: announce only the delta
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod alias;
pub mod config;
pub mod install;
pub mod registry;
pub mod report;

pub use hostreg_core::{
    // Activation
    ActivationError,
    Activator,
    // Errors
    BoxError,
    // Host model
    Context,
    DatabaseBinder,
    DatabaseParams,
    DatabaseTarget,
    DocumentSource,
    // Observers
    DynHostObserver,
    HostEvent,
    HostEventKind,
    HostObserver,
    // Store
    HostStore,
    NoopActivator,
    ObserverError,
    ObserverSource,
    RegistryError,
    SharedObserver,
    VirtualHost,
};

pub use alias::{AliasResolver, resolve_alias};
pub use config::{ActivationPolicy, RegistryConfig};
pub use install::{InstallForm, InstallMethod, InstallOutcome, InstallRequest, Installer};
pub use registry::{Registry, RegistryBuilder};
pub use report::{Failure, Report};

/// Store implementations.
pub mod store {
    pub use hostreg_std::store::MemoryStore;
}

/// Activator implementations.
pub mod activator {
    pub use hostreg_std::activator::{BindingActivator, RecordingBinder};
}

/// Standard observer implementations.
pub mod observers {
    pub use hostreg_std::observers::{
        LoggingObserver, ObserverCatalog, TimeoutError, TimeoutObserver,
    };
}

/// Document source implementations.
pub mod documents {
    pub use hostreg_std::documents::MemoryDocuments;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use hostreg_std::testing::*;
}

/// Prelude module - common imports for hostreg.
///
/// # Usage
///
/// ```rust,ignore
/// use hostreg::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ActivationPolicy, Activator, HostObserver, HostStore, ObserverSource, Registry,
        RegistryConfig, RegistryError, Report, VirtualHost,
        activator::BindingActivator,
        observers::{LoggingObserver, ObserverCatalog},
        store::MemoryStore,
    };
}
