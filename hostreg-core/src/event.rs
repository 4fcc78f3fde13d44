//! Host lifecycle events.

use crate::host::VirtualHost;
use std::{fmt, sync::Arc};

/// Kind of a host lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEventKind {
    /// The host became known to the process.
    Added,
    /// The host is no longer known to the process.
    Removed,
}

impl fmt::Display for HostEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEventKind::Added => f.write_str("host-added"),
            HostEventKind::Removed => f.write_str("host-removed"),
        }
    }
}

/// A membership change delivered to observers.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// The host was added.
    Added(Arc<VirtualHost>),
    /// The host was removed.
    Removed(Arc<VirtualHost>),
}

impl HostEvent {
    /// Returns the kind of this event.
    pub fn kind(&self) -> HostEventKind {
        match self {
            HostEvent::Added(_) => HostEventKind::Added,
            HostEvent::Removed(_) => HostEventKind::Removed,
        }
    }

    /// Returns the host this event is about.
    pub fn host(&self) -> &Arc<VirtualHost> {
        match self {
            HostEvent::Added(host) | HostEvent::Removed(host) => host,
        }
    }

    /// Shorthand for `self.host().hostname()`.
    pub fn hostname(&self) -> &str {
        self.host().hostname()
    }
}
