use std::{fs::File, io, io::Write, path::Path};

use serde::Serialize;

/// Errors that can occur when exporting a result.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The output file could not be created or written.
    #[error("failed to write results: {0}")]
    Io(#[from] io::Error),

    /// The result could not be serialized.
    #[error("failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render a document as pretty-printed JSON.
///
/// A [`CheckResult`](crate::CheckResult) renders with the top-level keys
/// `metadata`, `results`, `tech_electives` and `non_tech_electives`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(document: &impl Serialize) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Write a document to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_json(document: &impl Serialize, path: &Path) -> Result<(), ExportError> {
    let mut file = io::BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut file, document)?;
    writeln!(file)?;
    file.flush()?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}
