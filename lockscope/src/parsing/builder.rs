//! Single-pass dump scanner.
//!
//! Dump lines only make sense relative to the thread header above them, so
//! the builder carries a "current thread" through the scan:
//!
//! ```text
//!              ThreadHeader                ThreadHeader
//! NoCurrentThread ──────────▶ HasCurrentThread ◀──────┐
//!   (events dropped)            (events applied) ─────┘
//! ```
//!
//! There is no terminal state. Calling [`DumpModelBuilder::finish`] at any
//! point yields a model consistent with the lines consumed so far.

use super::model::{DumpModel, ThreadRecord};
use crate::classification::{classify_line, ClassifiedLine, LineEvent};
use crate::domain::{DumpError, ThreadName, Timestamp};
use log::debug;
use std::io::BufRead;

/// Accumulates a [`DumpModel`] one line at a time.
#[derive(Debug, Default)]
pub struct DumpModelBuilder {
    model: DumpModel,
    current: Option<ThreadName>,
}

impl DumpModelBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Thread that non-header lines are currently attributed to.
    #[must_use]
    pub fn current_thread(&self) -> Option<&ThreadName> {
        self.current.as_ref()
    }

    /// Classify and apply one line.
    pub fn push_line(&mut self, line: &str) {
        self.apply(classify_line(line));
    }

    /// Apply an already classified line.
    pub fn apply(&mut self, line: ClassifiedLine) {
        self.model.stats.lines += 1;
        if line.is_unmatched() {
            self.model.stats.ignored += 1;
            return;
        }

        // The timestamp goes to whoever was current *before* this line, so a
        // header carrying a timestamp stamps the previous thread.
        if let Some(ts) = line.timestamp {
            self.model.stats.timestamps += 1;
            self.record_timestamp(ts);
        }

        if let Some(event) = line.event {
            self.model.stats.events += 1;
            self.apply_event(event);
        }
    }

    fn record_timestamp(&mut self, ts: Timestamp) {
        match self.current_record() {
            Some(record) => record.last_timestamp = Some(ts),
            None => self.model.unattributed_timestamp = Some(ts),
        }
    }

    fn apply_event(&mut self, event: LineEvent) {
        let name = match (&event, &self.current) {
            (LineEvent::ThreadHeader(name), _) | (_, Some(name)) => name.clone(),
            (_, None) => {
                self.model.stats.orphaned += 1;
                return;
            }
        };
        let model = &mut self.model;

        match event {
            LineEvent::ThreadHeader(_) => {
                model
                    .threads
                    .entry(name.clone())
                    .and_modify(|record| record.stack_frames.clear())
                    .or_insert_with(|| ThreadRecord::new(name.clone()));
                self.current = Some(name);
            }
            LineEvent::State(state) => {
                *model.state_counts.entry(state.clone()).or_insert(0) += 1;
                if let Some(record) = model.threads.get_mut(&name) {
                    record.state = state;
                }
            }
            LineEvent::WaitingOn(lock) | LineEvent::ParkingFor(lock) => {
                if let Some(record) = model.threads.get_mut(&name) {
                    record.waiting_on = Some(lock);
                }
                model.waiters.insert(name);
            }
            LineEvent::Locked(lock) => {
                if let Some(record) = model.threads.get_mut(&name) {
                    record.held_locks.insert(lock.clone());
                }
                // Re-inserting moves the claim to the end: the latest line wins.
                if let Some(previous) = model.lock_claims.shift_remove(&lock) {
                    if previous != name {
                        debug!("lock {lock} claimed by both {previous} and {name}");
                    }
                }
                model.lock_claims.insert(lock, name);
            }
            LineEvent::StackFrame(frame) => {
                if let Some(record) = model.threads.get_mut(&name) {
                    record.stack_frames.push(frame);
                }
            }
        }
    }

    fn current_record(&mut self) -> Option<&mut ThreadRecord> {
        let name = self.current.as_ref()?;
        self.model.threads.get_mut(name)
    }

    /// Stop consuming and return the model built so far.
    #[must_use]
    pub fn finish(self) -> DumpModel {
        let stats = self.model.stats;
        debug!(
            "parsed {} lines: {} threads, {} waiting, {} events, {} timestamps, {} ignored, {} orphaned",
            stats.lines,
            self.model.threads.len(),
            self.model.waiters.len(),
            stats.events,
            stats.timestamps,
            stats.ignored,
            stats.orphaned,
        );
        self.model
    }
}

impl<S: AsRef<str>> Extend<S> for DumpModelBuilder {
    fn extend<I: IntoIterator<Item = S>>(&mut self, lines: I) {
        for line in lines {
            self.push_line(line.as_ref());
        }
    }
}

/// Parse dump text that is already in memory.
#[must_use]
pub fn parse_str(text: &str) -> DumpModel {
    let mut builder = DumpModelBuilder::new();
    builder.extend(text.lines());
    builder.finish()
}

/// Parse dump text from a buffered reader.
///
/// Lines are split on `\n` (a trailing `\r` is dropped) and decoded lossily,
/// so bytes that are not valid UTF-8 end up as U+FFFD instead of failing
/// the parse.
///
/// # Errors
/// Returns [`DumpError::ReadFailed`] with the 1-based line number if the
/// reader fails; the partial model is discarded.
pub fn parse_reader<R: BufRead>(mut reader: R) -> Result<DumpModel, DumpError> {
    let mut builder = DumpModelBuilder::new();
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        line_no += 1;
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| DumpError::ReadFailed { line: line_no, source })?;
        if read == 0 {
            break;
        }
        builder.push_line(&String::from_utf8_lossy(trim_newline(&buf)));
    }
    Ok(builder.finish())
}

fn trim_newline(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LockId, ThreadState};

    #[test]
    fn test_empty_input() {
        let model = parse_str("");
        assert!(model.is_empty());
        assert!(model.state_counts().is_empty());
        assert_eq!(model.waiters().count(), 0);
        assert_eq!(model.oldest_waiter(), None);
    }

    #[test]
    fn test_no_headers_builds_nothing() {
        let dump = "\
Full thread dump OpenJDK 64-Bit Server VM:
   java.lang.Thread.State: RUNNABLE
\tat java.lang.Thread.run(Thread.java:833)
\t- waiting on <0x1> (a java.lang.Object)
\t- locked <0x2> (a java.lang.Object)
";
        let model = parse_str(dump);
        assert!(model.is_empty());
        assert!(model.state_counts().is_empty());
        assert_eq!(model.waiters().count(), 0);
        assert_eq!(model.stats().orphaned, 4);
        assert_eq!(model.stats().ignored, 1);
    }

    #[test]
    fn test_frame_before_header_is_dropped() {
        let dump = "\tat com.example.Early.call(Early.java:1)\n\"T1\" #1\n";
        let model = parse_str(dump);
        assert_eq!(model.thread_count(), 1);
        assert!(model.thread(&ThreadName::from("")).is_none());
        let t1 = model.thread(&ThreadName::from("T1")).unwrap();
        assert!(t1.stack_frames.is_empty());
    }

    #[test]
    fn test_records_thread_details() {
        let dump = "\
\"worker-1\" #12 prio=5
   java.lang.Thread.State: BLOCKED (on object monitor)
\tat com.example.Cache.get(Cache.java:10)
\t- waiting on <0xaa> (a java.lang.Object)
\tat com.example.Service.handle(Service.java:20)
\t- locked <0xbb> (a java.lang.Object)
";
        let model = parse_str(dump);
        let record = model.thread(&ThreadName::from("worker-1")).unwrap();
        assert_eq!(record.state, ThreadState::Blocked);
        assert_eq!(record.waiting_on, Some(LockId::from("0xaa")));
        assert!(record.held_locks.contains(&LockId::from("0xbb")));
        assert_eq!(record.stack_frames, vec!["com.example.Cache.get", "com.example.Service.handle"]);
        assert_eq!(model.state_counts().get(&ThreadState::Blocked), Some(&1));
    }

    #[test]
    fn test_parking_and_waiting_merge_last_wins() {
        let dump = "\
\"T\" #1
\t- waiting on <0x1>
\t- parking to wait for  <0x2> (a java.util.concurrent.locks.AbstractQueuedSynchronizer$ConditionObject)
";
        let model = parse_str(dump);
        let record = model.thread(&ThreadName::from("T")).unwrap();
        assert_eq!(record.waiting_on, Some(LockId::from("0x2")));
        assert_eq!(model.waiters().count(), 1);
    }

    #[test]
    fn test_thread_holds_many_locks() {
        let dump = "\"T\" #1\n\t- locked <0x1>\n\t- locked <0x2>\n\t- locked <0x1>\n";
        let model = parse_str(dump);
        let record = model.thread(&ThreadName::from("T")).unwrap();
        let held: Vec<&str> = record.held_locks.iter().map(LockId::as_str).collect();
        assert_eq!(held, vec!["0x1", "0x2"]);
    }

    #[test]
    fn test_repeated_header_keeps_one_record() {
        let dump = "\
\"T\" #1
   java.lang.Thread.State: RUNNABLE
\tat a.B.first(B.java:1)
\"U\" #2
\"T\" #1
\tat a.B.second(B.java:2)
";
        let model = parse_str(dump);
        assert_eq!(model.thread_count(), 2);
        let record = model.thread(&ThreadName::from("T")).unwrap();
        assert_eq!(record.state, ThreadState::Runnable);
        assert_eq!(record.stack_frames, vec!["a.B.second"]);
        let order: Vec<&str> = model.threads().map(|t| t.name.as_str()).collect();
        assert_eq!(order, vec!["T", "U"]);
    }

    #[test]
    fn test_timestamp_attaches_to_preceding_header() {
        let dump = "\
\"A\" #1
  sampled at 2024-05-01T09:00:00
\"B\" #2
";
        let model = parse_str(dump);
        let a = model.thread(&ThreadName::from("A")).unwrap();
        let b = model.thread(&ThreadName::from("B")).unwrap();
        assert_eq!(a.last_timestamp, Some(Timestamp::from("2024-05-01T09:00:00")));
        assert_eq!(b.last_timestamp, None);
    }

    #[test]
    fn test_timestamp_on_header_line_stamps_previous_thread() {
        let dump = "\"A\" #1\n\"B\" #2 2024-05-01T09:00:00\n";
        let model = parse_str(dump);
        let a = model.thread(&ThreadName::from("A")).unwrap();
        let b = model.thread(&ThreadName::from("B")).unwrap();
        assert_eq!(a.last_timestamp, Some(Timestamp::from("2024-05-01T09:00:00")));
        assert_eq!(b.last_timestamp, None);
    }

    #[test]
    fn test_timestamp_before_any_header_is_unattributed() {
        let dump = "Dump taken 2024-05-01T08:59:59\n\"A\" #1\n";
        let model = parse_str(dump);
        assert_eq!(model.unattributed_timestamp(), Some(&Timestamp::from("2024-05-01T08:59:59")));
        assert_eq!(model.thread(&ThreadName::from("A")).unwrap().last_timestamp, None);
    }

    #[test]
    fn test_oldest_waiter_is_first_in_document_order() {
        let dump = "\
\"late\" #1
\t- waiting on <0x1>
\"early\" #2
\t- waiting on <0x2>
\"late\" #1
\t- waiting on <0x3>
";
        let model = parse_str(dump);
        assert_eq!(model.oldest_waiter(), Some(&ThreadName::from("late")));
        let order: Vec<&str> = model.waiters().map(|t| t.name.as_str()).collect();
        assert_eq!(order, vec!["late", "early"]);
    }

    #[test]
    fn test_finish_mid_stream_is_consistent() {
        let mut builder = DumpModelBuilder::new();
        builder.push_line("\"A\" #1");
        builder.push_line("\t- waiting on <0x1>");
        assert_eq!(builder.current_thread(), Some(&ThreadName::from("A")));
        let model = builder.finish();
        assert_eq!(model.stats().lines, 2);
        assert_eq!(model.waiters().count(), 1);
    }

    struct BrokenPipe;

    impl std::io::Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn test_parse_reader_reports_failing_line() {
        let reader = std::io::BufReader::new(std::io::Read::chain(&b"\"A\" #1\n"[..], BrokenPipe));
        let err = parse_reader(reader).unwrap_err();
        assert!(matches!(err, DumpError::ReadFailed { line: 2, .. }));
    }

    #[test]
    fn test_parse_reader_decodes_invalid_utf8_lossily() {
        let dump: &[u8] =
            b"\"T1\" #1\n\t- waiting on <0x1>\n\"T2\" #2\n\t- locked <0x1>\n\"caf\xe9-worker\" #3\n";
        let model = parse_reader(dump).unwrap();
        assert_eq!(model.thread_count(), 3);
        assert!(model.thread(&ThreadName::from("caf\u{FFFD}-worker")).is_some());
        assert_eq!(model.stats().ignored, 0);
        let t1 = model.thread(&ThreadName::from("T1")).unwrap();
        assert_eq!(t1.waiting_on, Some(LockId::from("0x1")));
    }

    #[test]
    fn test_parse_reader_strips_crlf() {
        let model = parse_reader(&b"\"T\" #1\r\n\tat a.B.c(B.java:1)\r\n"[..]).unwrap();
        let record = model.thread(&ThreadName::from("T")).unwrap();
        assert_eq!(record.stack_frames, vec!["a.B.c"]);
    }

    #[test]
    fn test_lock_claims_follow_last_locked_line() {
        let dump = "\
\"A\" #1
\t- locked <0x1>
\"B\" #2
\t- locked <0x1>
\"A\" #1
\t- locked <0x1>
";
        let model = parse_str(dump);
        let claims: Vec<(&str, &str)> =
            model.lock_claims().map(|(lock, name)| (lock.as_str(), name.as_str())).collect();
        assert_eq!(claims, vec![("0x1", "A")]);
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let dump = "\"A\" #1\n\t- waiting on <0x1>\n\"B\" #2\n\t- locked <0x1>\n";
        assert_eq!(parse_str(dump), parse_str(dump));
    }
}
