//! Dump input and analysis passes.
//!
//! The report pass and the graph pass each read their own copy of the input,
//! so a failure in one never prevents the other from running.

use crate::analysis::{build_graph, generate_report, LockResolver, Report, WaitForGraph};
use crate::domain::DumpError;
use crate::parsing::{parse_reader, DumpModel};
use log::info;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Where the dump text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpSource {
    File(PathBuf),
    Stdin,
    /// Text already read into memory, e.g. a buffered stdin
    Memory(String),
}

impl DumpSource {
    /// `-` means standard input, anything else is a file path.
    #[must_use]
    pub fn from_arg(arg: &Path) -> Self {
        if arg.as_os_str() == "-" {
            DumpSource::Stdin
        } else {
            DumpSource::File(arg.to_path_buf())
        }
    }

    /// Open the source for line-by-line reading.
    ///
    /// # Errors
    /// Returns [`DumpError::OpenFailed`] if the file can't be opened.
    pub fn open(&self) -> Result<Box<dyn BufRead + '_>, DumpError> {
        match self {
            DumpSource::File(path) => {
                let file = File::open(path)
                    .map_err(|source| DumpError::OpenFailed { path: path.clone(), source })?;
                Ok(Box::new(BufReader::new(file)))
            }
            DumpSource::Stdin => Ok(Box::new(io::stdin().lock())),
            DumpSource::Memory(text) => Ok(Box::new(text.as_bytes())),
        }
    }

    /// Read stdin to memory so that more than one pass can consume it.
    ///
    /// # Errors
    /// Returns an error if stdin can't be read.
    pub fn buffered(self) -> Result<Self, DumpError> {
        match self {
            DumpSource::Stdin => Ok(DumpSource::Memory(io::read_to_string(io::stdin())?)),
            other => Ok(other),
        }
    }

    /// Read and parse the whole source.
    ///
    /// # Errors
    /// Returns an error if the source can't be opened or a line can't be read.
    pub fn parse(&self) -> Result<DumpModel, DumpError> {
        let model = parse_reader(self.open()?)?;
        info!("{}: {} threads, {} lines", self, model.thread_count(), model.stats().lines);
        Ok(model)
    }
}

impl std::fmt::Display for DumpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DumpSource::File(path) => write!(f, "{}", path.display()),
            DumpSource::Stdin => f.write_str("<stdin>"),
            DumpSource::Memory(_) => f.write_str("<memory>"),
        }
    }
}

/// Parse `source` and build the diagnostic report.
///
/// # Errors
/// Fails only if the input can't be read.
pub fn run_report_pass(source: &DumpSource) -> Result<Report, DumpError> {
    let model = source.parse()?;
    Ok(generate_report(&model, &LockResolver::new(&model)))
}

/// Parse `source` and build the wait-for graph.
///
/// # Errors
/// Fails only if the input can't be read.
pub fn run_graph_pass(source: &DumpSource) -> Result<WaitForGraph, DumpError> {
    let model = source.parse()?;
    Ok(build_graph(&model, &LockResolver::new(&model)))
}
