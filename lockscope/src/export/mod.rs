//! Output of analysis results
//!
//! - [`dot`]: Graphviz digraph of wait-for edges
//! - [`console`]: human-readable report text
//! - [`json`]: machine-readable report (and graph) for external tooling

pub mod console;
pub mod dot;
pub mod json;

pub use console::render_report;
pub use dot::{DotExporter, DEFAULT_GRAPH_FILE, DEFAULT_GRAPH_NAME};
pub use json::{write_json, write_json_to_path, AnalysisDocument};
