//! Diagnostic report over a parsed dump.
//!
//! The report is a view model: it is built once from a finished
//! [`DumpModel`] and handed to a presenter (console text or JSON). Nothing
//! here formats output.
//!
//! ```text
//! Thread State Summary        Waiting Thread Analysis
//! ─────────────────────       ─────────────────────────────────────
//!   RUNNABLE: 12                worker-3   BLOCKED  <0x76ab62208>
//!   BLOCKED: 2                    held by: main
//!   WAITING: 5                    root:    com.example.Cache.get
//!                                 ★ oldest waiter
//! ```

use super::lock_resolver::LockResolver;
use crate::domain::{LockId, Owner, ThreadName, ThreadState, Timestamp};
use crate::parsing::{DumpModel, ThreadRecord};
use serde::Serialize;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Shown when a waiting thread has no stack frames.
pub const UNKNOWN_ROOT_CAUSE: &str = "Unknown";

/// Shown when a waiting thread never had a timestamp attributed to it.
pub const UNKNOWN_TIMESTAMP: &str = "Unknown";

/// Advice attached to every waiting thread after the method review line.
const GENERIC_SUGGESTIONS: [&str; 2] =
    ["Consider optimizing synchronization.", "Check for I/O or long wait periods."];

// =============================================================================
// REPORT (OUTPUT TYPES)
// =============================================================================

/// Number of threads seen in one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateCount {
    pub state: ThreadState,
    pub count: usize,
}

/// One thread that is waiting on a lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitingThread {
    pub thread: ThreadName,
    /// `UNKNOWN` if the thread had no state line
    pub state: ThreadState,
    pub lock: LockId,
    /// Thread holding `lock`, or `UNKNOWN`
    pub holder: Owner,
    /// Last stack frame captured for the thread
    pub root_cause: String,
    pub timestamp: Option<Timestamp>,
    pub is_oldest: bool,
    pub suggestions: Vec<String>,
}

impl WaitingThread {
    /// Timestamp for display, `Unknown` if none was seen.
    #[must_use]
    pub fn timestamp_or_unknown(&self) -> &str {
        self.timestamp.as_ref().map_or(UNKNOWN_TIMESTAMP, Timestamp::as_str)
    }

    /// Where to look next, based on whether the holder is known.
    #[must_use]
    pub fn holder_suggestion(&self) -> String {
        match &self.holder {
            Owner::Thread(name) => format!("Check synchronization in {name}"),
            Owner::Unknown => "Investigate the lock holder.".to_string(),
        }
    }
}

/// Complete diagnostic report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub total_threads: usize,
    pub state_counts: Vec<StateCount>,
    /// Waiting threads in document order
    pub waiting: Vec<WaitingThread>,
}

impl Report {
    #[must_use]
    pub fn oldest_waiter(&self) -> Option<&WaitingThread> {
        self.waiting.iter().find(|w| w.is_oldest)
    }

    #[must_use]
    pub fn count_for(&self, state: &ThreadState) -> usize {
        self.state_counts.iter().find(|c| &c.state == state).map_or(0, |c| c.count)
    }
}

// =============================================================================
// GENERATION
// =============================================================================

/// Build the report from a finished model.
///
/// Pure: the same model always yields the same report.
#[must_use]
pub fn generate_report(model: &DumpModel, resolver: &LockResolver) -> Report {
    let state_counts = model
        .state_counts()
        .iter()
        .map(|(state, &count)| StateCount { state: state.clone(), count })
        .collect();

    let oldest = model.oldest_waiter();
    let waiting = model
        .waiters()
        .filter_map(|record| {
            let is_oldest = oldest == Some(&record.name);
            waiting_entry(record, resolver, is_oldest)
        })
        .collect();

    Report { total_threads: model.thread_count(), state_counts, waiting }
}

fn waiting_entry(
    record: &ThreadRecord,
    resolver: &LockResolver,
    is_oldest: bool,
) -> Option<WaitingThread> {
    let lock = record.waiting_on.clone()?;
    let holder = resolver.resolve(&lock);
    let root_cause = record.last_frame().unwrap_or(UNKNOWN_ROOT_CAUSE).to_string();

    Some(WaitingThread {
        thread: record.name.clone(),
        state: record.state.clone(),
        lock,
        holder,
        suggestions: suggestions_for(&root_cause),
        root_cause,
        timestamp: record.last_timestamp.clone(),
        is_oldest,
    })
}

fn suggestions_for(root_cause: &str) -> Vec<String> {
    std::iter::once(format!("Review method: {root_cause}"))
        .chain(GENERIC_SUGGESTIONS.iter().map(|s| (*s).to_string()))
        .collect()
}
