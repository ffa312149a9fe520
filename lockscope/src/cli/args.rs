//! CLI argument definitions

use crate::export::{DEFAULT_GRAPH_FILE, DEFAULT_GRAPH_NAME};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lockscope",
    version,
    about = "Summarize thread states and lock waits in a JVM thread dump",
    after_help = "\
EXAMPLES:
    lockscope dump.txt                          Report + thread_dependency_graph.dot
    jstack 1234 | lockscope -                   Read the dump from stdin
    lockscope dump.txt --no-report --graph g.dot
    dot -Tsvg thread_dependency_graph.dot -o graph.svg"
)]
pub struct Args {
    /// Thread dump to analyze (`-` for stdin)
    #[arg(value_name = "DUMP")]
    pub dump: PathBuf,

    /// Where to write the wait-for graph (Graphviz DOT)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_GRAPH_FILE)]
    pub graph: PathBuf,

    /// Name of the digraph in the DOT output
    #[arg(long, value_name = "NAME", default_value = DEFAULT_GRAPH_NAME)]
    pub graph_name: String,

    /// Skip the report pass
    #[arg(long, conflicts_with = "no_graph")]
    pub no_report: bool,

    /// Skip the graph pass
    #[arg(long)]
    pub no_graph: bool,

    /// Also write the analysis as JSON
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["lockscope", "dump.txt"]);
        assert_eq!(args.dump, PathBuf::from("dump.txt"));
        assert_eq!(args.graph, PathBuf::from("thread_dependency_graph.dot"));
        assert_eq!(args.graph_name, "ThreadGraph");
        assert!(!args.no_report && !args.no_graph);
        assert!(args.json.is_none());
    }

    #[test]
    fn test_cannot_skip_both_passes() {
        let result = Args::try_parse_from(["lockscope", "dump.txt", "--no-report", "--no-graph"]);
        assert!(result.is_err());
    }
}
