//! Wait-for graph construction.
//!
//! One edge per waiting thread, pointing at the thread that holds the lock it
//! waits on. Nodes are thread names; a lock nobody claims points at the
//! `UNKNOWN` sentinel node. Serialization lives in [`crate::export::dot`].

use super::lock_resolver::LockResolver;
use crate::domain::{LockId, Owner, ThreadName, Timestamp};
use crate::parsing::DumpModel;
use serde::Serialize;

/// Edge label value when the waiting thread had no timestamp.
pub const NO_TIMESTAMP: &str = "N/A";

/// "`from` waits for a lock held by `to`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitForEdge {
    pub from: ThreadName,
    pub to: Owner,
    pub lock: LockId,
    pub timestamp: Option<Timestamp>,
}

impl WaitForEdge {
    #[must_use]
    pub fn timestamp_label(&self) -> &str {
        self.timestamp.as_ref().map_or(NO_TIMESTAMP, Timestamp::as_str)
    }
}

/// Edges in document order of each thread's first wait.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WaitForGraph {
    pub edges: Vec<WaitForEdge>,
}

impl WaitForGraph {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges whose lock has no known holder.
    pub fn unresolved(&self) -> impl Iterator<Item = &WaitForEdge> {
        self.edges.iter().filter(|e| !e.to.is_known())
    }
}

/// Build the wait-for graph from a finished model.
#[must_use]
pub fn build_graph(model: &DumpModel, resolver: &LockResolver) -> WaitForGraph {
    let edges = model
        .waiters()
        .filter_map(|record| {
            let lock = record.waiting_on.clone()?;
            Some(WaitForEdge {
                from: record.name.clone(),
                to: resolver.resolve(&lock),
                lock,
                timestamp: record.last_timestamp.clone(),
            })
        })
        .collect();
    WaitForGraph { edges }
}
