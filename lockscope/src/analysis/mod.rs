//! Analysis over a parsed dump
//!
//! This module contains pure business logic derived from a finished
//! [`crate::parsing::DumpModel`], separated from the presentation layer.

pub mod lock_resolver;
pub mod report;
pub mod wait_graph;

pub use lock_resolver::LockResolver;
pub use report::{generate_report, Report, StateCount, WaitingThread};
pub use wait_graph::{build_graph, WaitForEdge, WaitForGraph};
