//! CSV ingestion into [`Table`].
//!
//! The first record is the header. Rows shorter than the header are padded
//! with empty cells; an empty cell is the only representation of a missing
//! value, so literal text such as `NaN` is kept as data.

use crate::error::{MapperError, Result};
use crate::model::Table;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// Read the table `name` from a CSV file.
///
/// A file that cannot be opened is a `MissingInputTable` error.
pub fn read_table(path: &Path, name: &str) -> Result<Table> {
    let file = File::open(path).map_err(|e| MapperError::missing_table(name, path, e))?;
    let table = parse_table_reader(file, name)?;
    tracing::debug!(
        "Read {} rows x {} columns from {}",
        table.len(),
        table.headers().len(),
        path.display()
    );
    Ok(table)
}

/// Parse a table from CSV text.
pub fn parse_table_str(content: &str, name: &str) -> Result<Table> {
    parse_table_reader(content.as_bytes(), name)
}

fn parse_table_reader<R: Read>(reader: R, name: &str) -> Result<Table> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(name, &e))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches(UTF8_BOM).to_string()
            } else {
                h.to_string()
            }
        })
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(MapperError::parse(name, None, "no header row"));
    }

    let mut table = Table::new(name, headers)?;
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(name, &e))?;
        table.push_row(record.iter().map(str::to_string).collect())?;
    }
    Ok(table)
}

fn csv_error(name: &str, err: &::csv::Error) -> MapperError {
    // record 0 is the header, so the record index is the 1-based data row
    let row = err
        .position()
        .and_then(|p| usize::try_from(p.record()).ok())
        .filter(|&r| r > 0);
    MapperError::parse(name, row, err.to_string())
}
