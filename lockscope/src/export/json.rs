//! JSON export of analysis results.

use crate::analysis::{Report, WaitForGraph};
use crate::domain::ExportError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Document written by `--json`: the report, plus the graph when it was built.
#[derive(Debug, Serialize)]
pub struct AnalysisDocument<'a> {
    pub report: &'a Report,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<&'a WaitForGraph>,
}

/// Serialize `document` as pretty-printed JSON.
///
/// # Errors
/// Returns an error if serialization or the writer fails.
pub fn write_json<W: Write>(document: &AnalysisDocument<'_>, mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, document)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write `document` to a file at `path`.
///
/// # Errors
/// Returns [`ExportError::WriteFailed`] if the file can't be created.
pub fn write_json_to_path(document: &AnalysisDocument<'_>, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::WriteFailed {
        what: "JSON report",
        path: path.to_path_buf(),
        source,
    })?;
    write_json(document, BufWriter::new(file))
}
