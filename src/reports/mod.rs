//! Writing mapping results.
//!
//! - CSV (default): the six output columns, confidence with three decimals
//! - JSON: an array of objects with the same keys
//!
//! Every file is written atomically: content goes to a temporary sibling
//! and is renamed into place, so a failed run never leaves a partial file.

mod csv;
mod json;
mod types;

pub use self::csv::{render_table, CsvReporter};
pub use json::JsonReporter;
pub use types::ReportFormat;

use crate::error::{MapperError, Result};
use crate::mapping::OutputRecord;
use std::path::{Path, PathBuf};

/// Renders mapping records into one output format.
pub trait ReportGenerator {
    /// Render all records, in order.
    fn generate_mapping_report(&self, records: &[OutputRecord]) -> Result<String>;

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Reporter for `format`.
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Csv => Box::new(CsvReporter::new()),
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}

/// Write `content` to `path` via a temporary sibling file and a rename.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    write_all_atomic(&[(path, content)])
}

/// Write several files so that either all of them land or none do.
///
/// Every file is staged to a temporary sibling first; renames start only
/// after every stage succeeded. A failed rename removes the files already
/// moved into place.
pub fn write_all_atomic(files: &[(&Path, &str)]) -> Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());
    for &(path, content) in files {
        let tmp = temp_sibling(path);
        if let Err(e) = std::fs::write(&tmp, content) {
            let _ = std::fs::remove_file(&tmp);
            discard_staged(&staged);
            return Err(MapperError::io(path, e));
        }
        staged.push((tmp, path));
    }

    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(e) = std::fs::rename(tmp, path) {
            for (_, committed) in &staged[..i] {
                let _ = std::fs::remove_file(committed);
            }
            discard_staged(&staged[i..]);
            return Err(MapperError::io(*path, e));
        }
    }
    Ok(())
}

fn discard_staged(staged: &[(PathBuf, &Path)]) {
    for (tmp, _) in staged {
        let _ = std::fs::remove_file(tmp);
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map_or_else(|| "output".to_string(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()))
}
