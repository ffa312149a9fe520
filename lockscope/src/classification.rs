//! Line classification for thread dump text.
//!
//! A thread dump is line oriented, but the lines don't carry a type tag. This
//! module pattern-matches a single line into at most one [`LineEvent`], with no
//! knowledge of surrounding lines. Context (which thread a line belongs to) is
//! the job of [`crate::parsing`].
//!
//! # Classification Strategy
//!
//! The patterns overlap in matching power (a header line can contain
//! `waiting on`, a frame line can contain `locked <`), so they are tried in a
//! fixed order and the first match wins:
//!
//! 1. **Thread header** - `"name" #12 prio=5 ...`
//! 2. **State line** - `java.lang.Thread.State: BLOCKED (on object monitor)`
//! 3. **Waiting on** - `- waiting on <0x...> (a java.lang.Object)`
//! 4. **Parking** - `- parking to wait for  <0x...> (a ...ReentrantLock$NonfairSync)`
//! 5. **Locked** - `- locked <0x...> (a java.lang.Object)`
//! 6. **Stack frame** - `at com.example.Worker.run(Worker.java:42)`
//!
//! Timestamps are captured on every line regardless of which rule matched.

use crate::domain::{LockId, ThreadName, ThreadState, Timestamp};
use regex::Regex;
use std::sync::LazyLock;

/// Structured event extracted from one dump line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// Start of a thread section; establishes the current-thread context
    ThreadHeader(ThreadName),
    /// `java.lang.Thread.State:` line
    State(ThreadState),
    /// `waiting on <lock>`
    WaitingOn(LockId),
    /// `parking to wait for  <lock>`; treated exactly like [`LineEvent::WaitingOn`]
    ParkingFor(LockId),
    /// `locked <lock>`: the current thread holds the lock
    Locked(LockId),
    /// Method signature of an `at ...(...)` frame, location discarded
    StackFrame(String),
}

impl LineEvent {
    /// Lock the thread is blocked on, for both wait flavours.
    #[must_use]
    pub fn waited_lock(&self) -> Option<&LockId> {
        match self {
            LineEvent::WaitingOn(lock) | LineEvent::ParkingFor(lock) => Some(lock),
            _ => None,
        }
    }
}

/// Result of classifying one line.
///
/// `event` and `timestamp` are independent: a header line that also carries
/// a timestamp yields both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassifiedLine {
    pub event: Option<LineEvent>,
    pub timestamp: Option<Timestamp>,
}

impl ClassifiedLine {
    /// True if the line matched no rule at all.
    #[must_use]
    pub fn is_unmatched(&self) -> bool {
        self.event.is_none() && self.timestamp.is_none()
    }
}

/// Classify a single line of dump text.
///
/// # Examples
///
/// ```
/// use lockscope::classification::{classify_line, LineEvent};
///
/// let line = classify_line("\t- locked <0x000000076ab62208> (a java.lang.Object)");
/// assert_eq!(line.event, Some(LineEvent::Locked("0x000000076ab62208".into())));
/// assert!(line.timestamp.is_none());
/// ```
#[must_use]
pub fn classify_line(line: &str) -> ClassifiedLine {
    ClassifiedLine { event: classify_event(line), timestamp: capture_timestamp(line) }
}

// =============================================================================
// CLASSIFICATION TABLES
// =============================================================================

/// Rules in precedence order. Only the first matching rule produces an event.
const RULE_ORDER: [Rule; 6] = [
    Rule::ThreadHeader,
    Rule::State,
    Rule::WaitingOn,
    Rule::ParkingFor,
    Rule::Locked,
    Rule::StackFrame,
];

static THREAD_HEADER: LazyLock<Regex> = LazyLock::new(|| compile(r#"^"(.*)""#));

static STATE_LINE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\s*java\.lang\.Thread\.State: (\w+)"));

// Lock patterns take the last occurrence of their phrase on the line, like the
// timestamp capture below.
static WAITING_ON: LazyLock<Regex> = LazyLock::new(|| compile(r"^.*waiting on <(.*)>"));

// Two spaces before '<' is how HotSpot prints it
static PARKING_FOR: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^.*parking to wait for  <(.*)>"));

static LOCKED: LazyLock<Regex> = LazyLock::new(|| compile(r"^.*locked <(.*)>"));

static STACK_FRAME: LazyLock<Regex> = LazyLock::new(|| compile(r"^\s+at (.+)\((.+)\)$"));

static TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}"));

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Rule {
    ThreadHeader,
    State,
    WaitingOn,
    ParkingFor,
    Locked,
    StackFrame,
}

impl Rule {
    fn pattern(self) -> &'static Regex {
        match self {
            Rule::ThreadHeader => &*THREAD_HEADER,
            Rule::State => &*STATE_LINE,
            Rule::WaitingOn => &*WAITING_ON,
            Rule::ParkingFor => &*PARKING_FOR,
            Rule::Locked => &*LOCKED,
            Rule::StackFrame => &*STACK_FRAME,
        }
    }

    fn event(self, capture: &str) -> LineEvent {
        match self {
            Rule::ThreadHeader => LineEvent::ThreadHeader(ThreadName::from(capture)),
            Rule::State => LineEvent::State(ThreadState::from_word(capture)),
            Rule::WaitingOn => LineEvent::WaitingOn(LockId::from(capture)),
            Rule::ParkingFor => LineEvent::ParkingFor(LockId::from(capture)),
            Rule::Locked => LineEvent::Locked(LockId::from(capture)),
            Rule::StackFrame => LineEvent::StackFrame(capture.to_owned()),
        }
    }
}

fn classify_event(line: &str) -> Option<LineEvent> {
    RULE_ORDER.into_iter().find_map(|rule| {
        let captures = rule.pattern().captures(line)?;
        captures.get(1).map(|m| rule.event(m.as_str()))
    })
}

/// Last timestamp on the line, if any.
fn capture_timestamp(line: &str) -> Option<Timestamp> {
    TIMESTAMP.find_iter(line).last().map(|m| Timestamp::new(m.as_str()))
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}
