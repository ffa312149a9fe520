//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers prevent common bugs like passing a lock identifier
//! where a thread name is expected, and make function signatures more expressive.

use serde::{Serialize, Serializer};
use std::fmt;

/// Sentinel printed wherever a lock holder or thread state could not be determined.
pub const UNKNOWN: &str = "UNKNOWN";

/// Thread name as printed in a dump header line.
///
/// Thread names are the unique key of the thread model. They are taken
/// verbatim from between the quotes of a header line, so they may contain
/// spaces, `#` and other punctuation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ThreadName(String);

impl ThreadName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the thread name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThreadName {
    fn from(s: &str) -> Self {
        ThreadName::new(s)
    }
}

impl From<String> for ThreadName {
    fn from(s: String) -> Self {
        ThreadName::new(s)
    }
}

/// Lock identifier
///
/// Opaque string naming a synchronization object, usually a memory address
/// such as `0x000000076ab62208`. Only compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LockId(String);

impl LockId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LockId {
    fn from(s: &str) -> Self {
        LockId::new(s)
    }
}

/// Wall-clock timestamp captured from a dump line (`YYYY-MM-DDThh:mm:ss`).
///
/// Kept as text: dumps never carry a timezone and the value is only displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    #[must_use]
    pub fn new(ts: impl Into<String>) -> Self {
        Self(ts.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Timestamp::new(s)
    }
}

/// `java.lang.Thread.State` value.
///
/// Words outside the JVM's six states are kept verbatim in [`ThreadState::Other`]
/// so they are still counted and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ThreadState {
    New,
    Runnable,
    Blocked,
    Waiting,
    TimedWaiting,
    Terminated,
    Other(String),
    /// No state line was seen for the thread
    #[default]
    Unknown,
}

impl ThreadState {
    /// Parse the word captured after `java.lang.Thread.State: `.
    #[must_use]
    pub fn from_word(word: &str) -> Self {
        match word {
            "NEW" => ThreadState::New,
            "RUNNABLE" => ThreadState::Runnable,
            "BLOCKED" => ThreadState::Blocked,
            "WAITING" => ThreadState::Waiting,
            "TIMED_WAITING" => ThreadState::TimedWaiting,
            "TERMINATED" => ThreadState::Terminated,
            other => ThreadState::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ThreadState::New => "NEW",
            ThreadState::Runnable => "RUNNABLE",
            ThreadState::Blocked => "BLOCKED",
            ThreadState::Waiting => "WAITING",
            ThreadState::TimedWaiting => "TIMED_WAITING",
            ThreadState::Terminated => "TERMINATED",
            ThreadState::Other(word) => word,
            ThreadState::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ThreadState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Resolved holder of a lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    Thread(ThreadName),
    /// No thread in the dump claims the lock
    Unknown,
}

impl Owner {
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Owner::Thread(_))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Owner::Thread(name) => name.as_str(),
            Owner::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Owner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
