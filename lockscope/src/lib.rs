//! # lockscope - JVM Thread Dump Lock Analyzer
//!
//! lockscope reads a JVM thread dump (`jstack`, `kill -3`, `jcmd Thread.print`)
//! and answers two questions: what state are the threads in, and who is
//! waiting on whom. It produces a diagnostic report and a wait-for graph that
//! Graphviz can render.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Thread dump text                           │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ lines, in document order
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  lockscope (This Crate)                         │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//! │  │Classification│──▶│   Parsing    │──▶│ LockResolver │         │
//! │  │ (per line)   │   │ (DumpModel)  │   │ (lock→owner) │         │
//! │  └──────────────┘   └──────────────┘   └──────┬───────┘         │
//! │                                               │                 │
//! │                              ┌────────────────┴───────┐         │
//! │                              ▼                        ▼         │
//! │                     ┌──────────────┐         ┌──────────────┐   │
//! │                     │    Report    │         │  Wait Graph  │   │
//! │                     └──────┬───────┘         └──────┬───────┘   │
//! │                            ▼                        ▼           │
//! │                     ┌──────────────┐         ┌──────────────┐   │
//! │                     │ console/json │         │     DOT      │   │
//! │                     └──────────────┘         └──────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`classification`]: stateless line patterns (header, state, waiting on,
//!   parking, locked, stack frame, timestamp) applied in precedence order
//! - [`parsing`]: single-pass scanner that tracks the current thread and
//!   builds one [`parsing::ThreadRecord`] per thread name
//! - [`analysis`]: lock ownership index, report generation, wait-for graph
//! - [`export`]: DOT, console text and JSON output
//! - [`source`]: file/stdin input and the independent report and graph passes
//! - [`cli`]: command-line arguments
//! - [`domain`]: core types (`ThreadName`, `LockId`, `ThreadState`) and errors
//!
//! ## Typical Usage
//!
//! ```bash
//! jstack 1234 > dump.txt
//! lockscope dump.txt
//! dot -Tsvg thread_dependency_graph.dot -o waits.svg
//! ```
//!
//! As a library:
//!
//! ```
//! use lockscope::analysis::{build_graph, LockResolver};
//! use lockscope::parsing::parse_str;
//!
//! let model = parse_str("\"T1\" #1\n\t- waiting on <0x1>\n\"T2\" #2\n\t- locked <0x1>\n");
//! let graph = build_graph(&model, &LockResolver::new(&model));
//! assert_eq!(graph.edges[0].to.as_str(), "T2");
//! ```
//!
//! ## Key Concepts
//!
//! - **Current thread**: the most recent header line; every other line is
//!   attributed to it
//! - **Wait-for edge**: thread A waits on a lock that thread B holds
//! - **Oldest waiter**: the first waiting thread in document order

// Expose modules for testing
pub mod analysis;
pub mod classification;
pub mod cli;
pub mod domain;
pub mod export;
pub mod parsing;
pub mod source;
