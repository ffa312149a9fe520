//! Plain-text rendering of a [`Report`] for the terminal.

use crate::analysis::Report;
use std::io::{self, Write};

const RULE: &str = "=============================================";
const SEPARATOR: &str = "--------------------------------------";

/// Write the full report: state summary, then one block per waiting thread.
///
/// # Errors
/// Returns an error if the writer fails.
pub fn render_report<W: Write>(report: &Report, mut out: W) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "       📊 Complete Thread Dump Analysis      ")?;
    writeln!(out, "{RULE}")?;

    writeln!(out, "==== Thread State Summary ====")?;
    for entry in &report.state_counts {
        writeln!(out, "• {}: {}", entry.state, entry.count)?;
    }

    writeln!(out, "\n==== Waiting Thread Analysis ====")?;
    if report.waiting.is_empty() {
        writeln!(out, "✅ No waiting threads detected.")?;
    }
    for waiter in &report.waiting {
        writeln!(out, "⚠️ Thread: {}", waiter.thread)?;
        writeln!(out, "   State: {}", waiter.state)?;
        writeln!(out, "   Waiting on Lock: {}", waiter.lock)?;
        writeln!(out, "   Held by: {}", waiter.holder)?;
        writeln!(out, "   Root Blocking Class/Method: {}", waiter.root_cause)?;
        writeln!(out, "   Timestamp: {}", waiter.timestamp_or_unknown())?;
        if waiter.is_oldest {
            writeln!(out, "   🌟 Oldest Waiting Thread")?;
        }
        writeln!(out, "   ➡️ Suggested Solutions:")?;
        for suggestion in &waiter.suggestions {
            writeln!(out, "      - {suggestion}")?;
        }
        writeln!(out, "      - {}", waiter.holder_suggestion())?;
        writeln!(out, "{SEPARATOR}")?;
    }

    writeln!(out, "\n{RULE}")?;
    writeln!(out, "          🏁 Analysis Completed              ")?;
    writeln!(out, "{RULE}")?;
    out.flush()
}
