//! Thread model produced by a single pass over a dump.

use crate::domain::{LockId, ThreadName, ThreadState, Timestamp};
use indexmap::{IndexMap, IndexSet};

/// Everything known about one thread after the parse pass.
///
/// A thread name seen twice updates the same record: scalar fields are
/// last-write-wins, and the stack frame list restarts at each header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRecord {
    pub name: ThreadName,
    pub state: ThreadState,
    /// Lock from the last `waiting on` / `parking to wait for` line
    pub waiting_on: Option<LockId>,
    /// Locks from `locked <...>` lines, in encounter order
    pub held_locks: IndexSet<LockId>,
    /// Method signatures in document order (top of stack first)
    pub stack_frames: Vec<String>,
    pub last_timestamp: Option<Timestamp>,
}

impl ThreadRecord {
    #[must_use]
    pub fn new(name: ThreadName) -> Self {
        Self {
            name,
            state: ThreadState::Unknown,
            waiting_on: None,
            held_locks: IndexSet::new(),
            stack_frames: Vec::new(),
            last_timestamp: None,
        }
    }

    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.waiting_on.is_some()
    }

    /// Last frame captured for this thread, in document order.
    #[must_use]
    pub fn last_frame(&self) -> Option<&str> {
        self.stack_frames.last().map(String::as_str)
    }
}

/// Line accounting for one parse pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Lines consumed
    pub lines: usize,
    /// Lines that produced a structural event
    pub events: usize,
    /// Lines that carried a timestamp
    pub timestamps: usize,
    /// Lines matching no rule
    pub ignored: usize,
    /// Events dropped because no thread header had been seen yet
    pub orphaned: usize,
}

/// Immutable result of a parse pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpModel {
    pub(super) threads: IndexMap<ThreadName, ThreadRecord>,
    pub(super) state_counts: IndexMap<ThreadState, usize>,
    pub(super) waiters: IndexSet<ThreadName>,
    /// Lock -> thread current at its latest `locked` line, oldest claim first
    pub(super) lock_claims: IndexMap<LockId, ThreadName>,
    pub(super) unattributed_timestamp: Option<Timestamp>,
    pub(super) stats: ParseStats,
}

impl DumpModel {
    /// Thread records in order of first header appearance.
    pub fn threads(&self) -> impl Iterator<Item = &ThreadRecord> {
        self.threads.values()
    }

    #[must_use]
    pub fn thread(&self, name: &ThreadName) -> Option<&ThreadRecord> {
        self.threads.get(name)
    }

    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Number of state lines seen per state, in order of first appearance.
    #[must_use]
    pub fn state_counts(&self) -> &IndexMap<ThreadState, usize> {
        &self.state_counts
    }

    /// Waiting threads in the order their first wait line appeared.
    pub fn waiters(&self) -> impl Iterator<Item = &ThreadRecord> {
        self.waiters.iter().filter_map(|name| self.threads.get(name))
    }

    /// First thread observed waiting on a lock.
    ///
    /// Document order, not timestamp order.
    #[must_use]
    pub fn oldest_waiter(&self) -> Option<&ThreadName> {
        self.waiters.first()
    }

    /// Holder of each locked lock, taken from the last `locked` line for it.
    pub fn lock_claims(&self) -> impl Iterator<Item = (&LockId, &ThreadName)> {
        self.lock_claims.iter()
    }

    /// Timestamp seen before any thread header.
    #[must_use]
    pub fn unattributed_timestamp(&self) -> Option<&Timestamp> {
        self.unattributed_timestamp.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> ParseStats {
        self.stats
    }
}
