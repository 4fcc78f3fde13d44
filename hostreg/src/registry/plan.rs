//! Membership delta between the in-memory set and a fresh store listing.

use hostreg_core::VirtualHost;
use indexmap::IndexMap;
use std::{collections::HashSet, sync::Arc};

/// One position of the next membership, in store order.
#[derive(Debug)]
pub(crate) enum Slot {
    /// Already known; the in-memory instance is carried over.
    Kept(Arc<VirtualHost>),
    /// Not known yet; needs activation and an `Added` notification.
    Discovered(VirtualHost),
}

/// The delta computed for one reconciliation.
#[derive(Debug, Default)]
pub(crate) struct Plan {
    pub(crate) slots: Vec<Slot>,
    /// Known hosts missing from the store listing, in their in-memory order.
    pub(crate) stale: Vec<Arc<VirtualHost>>,
    /// Hostnames listed more than once by the store; later copies were skipped.
    pub(crate) duplicates: Vec<String>,
}

impl Plan {
    pub(crate) fn discovered(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Discovered(_)))
            .count()
    }
}

/// Diff `fresh` against `current`.
///
/// Only membership is reconciled: a hostname present on both sides keeps
/// its in-memory instance, so runtime-only context survives.
pub(crate) fn plan(current: &IndexMap<String, Arc<VirtualHost>>, fresh: Vec<VirtualHost>) -> Plan {
    let mut old = current.clone();
    let mut seen = HashSet::with_capacity(fresh.len());
    let mut plan = Plan {
        slots: Vec::with_capacity(fresh.len()),
        ..Plan::default()
    };

    for host in fresh {
        if !seen.insert(host.hostname().to_owned()) {
            plan.duplicates.push(host.hostname().to_owned());
            continue;
        }
        match old.shift_remove(host.hostname()) {
            Some(kept) => plan.slots.push(Slot::Kept(kept)),
            None => plan.slots.push(Slot::Discovered(host)),
        }
    }

    plan.stale = old.into_values().collect();
    plan
}
