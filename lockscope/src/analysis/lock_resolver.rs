//! Lock ownership resolution.
//!
//! Dumps record ownership from the holder's side (`- locked <0x...>` under the
//! holder's stack) and waiting from the waiter's side. Answering "who holds
//! the lock this thread waits on" needs the inverse of the held-lock records.
//! The parse pass keeps that inverse as its lock claim log; it is indexed once
//! here and shared by the report and the graph.
//!
//! # Performance
//!
//! - `new()`: O(distinct locked locks)
//! - `resolve()`: O(1) average

use crate::domain::{LockId, Owner, ThreadName};
use crate::parsing::{DumpModel, ThreadRecord};
use log::debug;
use std::collections::HashMap;

/// Inverted index from lock identifier to holding thread.
#[derive(Debug, Clone, Default)]
pub struct LockResolver {
    owners: HashMap<LockId, ThreadName>,
}

impl LockResolver {
    /// Index every held lock in the model.
    ///
    /// A consistent dump never has two holders for one lock. If it does, the
    /// thread owning the last `locked` line for it wins.
    #[must_use]
    pub fn new(model: &DumpModel) -> Self {
        let owners: HashMap<LockId, ThreadName> =
            model.lock_claims().map(|(lock, name)| (lock.clone(), name.clone())).collect();
        debug!("indexed {} held locks", owners.len());
        Self { owners }
    }

    /// Holder of `lock`, or [`Owner::Unknown`].
    #[must_use]
    pub fn resolve(&self, lock: &LockId) -> Owner {
        self.owners.get(lock).map_or(Owner::Unknown, |name| Owner::Thread(name.clone()))
    }

    /// Holder of the lock `record` waits on. `None` if the thread isn't waiting.
    #[must_use]
    pub fn holder_of(&self, record: &ThreadRecord) -> Option<Owner> {
        record.waiting_on.as_ref().map(|lock| self.resolve(lock))
    }

    /// Number of distinct held locks indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
