//! Graphviz DOT export of the wait-for graph.
//!
//! Output is one statement per edge, compatible with existing tooling that
//! consumes `thread_dependency_graph.dot` files:
//!
//! ```text
//! digraph ThreadGraph {
//! "worker-1" -> "main" [label="lock: 0x76ab62208\nTime: N/A"];
//! }
//! ```

use crate::analysis::WaitForGraph;
use crate::domain::ExportError;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Graph name used when none is configured.
pub const DEFAULT_GRAPH_NAME: &str = "ThreadGraph";

/// File name used when no output path is configured.
pub const DEFAULT_GRAPH_FILE: &str = "thread_dependency_graph.dot";

/// Renders a [`WaitForGraph`] as a named DOT digraph.
pub struct DotExporter<'a> {
    graph: &'a WaitForGraph,
    name: String,
}

impl<'a> DotExporter<'a> {
    #[must_use]
    pub fn new(graph: &'a WaitForGraph) -> Self {
        Self { graph, name: DEFAULT_GRAPH_NAME.to_string() }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Render the whole digraph to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph {} {{", graph_id(&self.name));
        for edge in &self.graph.edges {
            let _ = writeln!(
                out,
                "\"{}\" -> \"{}\" [label=\"lock: {}\\nTime: {}\"];",
                escape(edge.from.as_str()),
                escape(edge.to.as_str()),
                escape(edge.lock.as_str()),
                escape(edge.timestamp_label()),
            );
        }
        out.push_str("}\n");
        out
    }

    /// Write the digraph to `writer`.
    ///
    /// # Errors
    /// Returns an error if the writer fails.
    pub fn export<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Create (or truncate) `path` and write the digraph into it.
    ///
    /// # Errors
    /// Returns [`ExportError::WriteFailed`] naming the path.
    pub fn write_to_path(&self, path: &Path) -> Result<(), ExportError> {
        let wrap = |source: std::io::Error| ExportError::WriteFailed {
            what: "dependency graph",
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(wrap)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(self.render().as_bytes()).map_err(wrap)?;
        writer.flush().map_err(wrap)
    }
}

/// Bare identifier if DOT allows it, quoted string otherwise.
fn graph_id(name: &str) -> String {
    let mut chars = name.chars();
    let is_plain_id = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if is_plain_id {
        name.to_string()
    } else {
        format!("\"{}\"", escape(name))
    }
}

/// Escape text for a DOT double-quoted string.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::WaitForEdge;
    use crate::domain::{LockId, Owner, ThreadName, Timestamp};

    fn edge(from: &str, to: Option<&str>, lock: &str, ts: Option<&str>) -> WaitForEdge {
        WaitForEdge {
            from: ThreadName::from(from),
            to: to.map_or(Owner::Unknown, |t| Owner::Thread(ThreadName::from(t))),
            lock: LockId::from(lock),
            timestamp: ts.map(Timestamp::from),
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = WaitForGraph::default();
        assert_eq!(DotExporter::new(&graph).render(), "digraph ThreadGraph {\n}\n");
    }

    #[test]
    fn test_edge_statement_format() {
        let graph = WaitForGraph {
            edges: vec![
                edge("T1", Some("T2"), "0x1", None),
                edge("T3", None, "0x2", Some("2024-01-01T00:00:00")),
            ],
        };
        let expected = "digraph ThreadGraph {\n\
\"T1\" -> \"T2\" [label=\"lock: 0x1\\nTime: N/A\"];\n\
\"T3\" -> \"UNKNOWN\" [label=\"lock: 0x2\\nTime: 2024-01-01T00:00:00\"];\n\
}\n";
        assert_eq!(DotExporter::new(&graph).render(), expected);
    }

    #[test]
    fn test_quotes_in_names_are_escaped() {
        let graph = WaitForGraph { edges: vec![edge(r#"pool "a""#, None, "0x1", None)] };
        let rendered = DotExporter::new(&graph).render();
        assert!(rendered.contains(r#""pool \"a\"" -> "UNKNOWN""#));
    }

    #[test]
    fn test_custom_graph_name() {
        let graph = WaitForGraph::default();
        assert!(DotExporter::new(&graph).with_name("Locks_1").render().starts_with("digraph Locks_1 {"));
        assert!(DotExporter::new(&graph).with_name("my dump").render().starts_with("digraph \"my dump\" {"));
    }

    #[test]
    fn test_export_to_writer() {
        let graph = WaitForGraph { edges: vec![edge("a", Some("b"), "0x1", None)] };
        let mut buffer = Vec::new();
        DotExporter::new(&graph).export(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), DotExporter::new(&graph).render());
    }
}
