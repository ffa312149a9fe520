//! Dump model construction
//!
//! Turns the ordered line sequence of a thread dump into a [`DumpModel`]:
//! one [`ThreadRecord`] per thread name, global state counts and the
//! document order of waiting threads.

pub mod builder;
pub mod model;

pub use builder::{parse_reader, parse_str, DumpModelBuilder};
pub use model::{DumpModel, ParseStats, ThreadRecord};
