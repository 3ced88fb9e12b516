//! CSV output.

use super::{ReportFormat, ReportGenerator};
use crate::error::{MapperError, Result};
use crate::mapping::{OutputRecord, OUTPUT_COLUMNS};
use crate::model::Table;

/// Renders mapping records as CSV with the fixed output header.
///
/// Confidence is always written with three decimals (`0.870`).
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReporter;

impl CsvReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportGenerator for CsvReporter {
    fn generate_mapping_report(&self, records: &[OutputRecord]) -> Result<String> {
        let mut writer = ::csv::Writer::from_writer(Vec::new());
        writer.write_record(OUTPUT_COLUMNS).map_err(csv_error)?;
        for record in records {
            let confidence = format!("{:.3}", record.confidence);
            writer
                .write_record([
                    record.namaste_code.as_str(),
                    record.namaste_display.as_str(),
                    record.icd_code.as_str(),
                    record.icd_title.as_str(),
                    record.module.as_str(),
                    confidence.as_str(),
                ])
                .map_err(csv_error)?;
        }
        finish(writer)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }
}

/// Render any table, header first, in its column order.
pub fn render_table(table: &Table) -> Result<String> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(table.headers()).map_err(csv_error)?;
    for row in table.rows() {
        writer.write_record(row).map_err(csv_error)?;
    }
    finish(writer)
}

fn finish(writer: ::csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| MapperError::Report(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| MapperError::Report(e.to_string()))
}

fn csv_error(err: ::csv::Error) -> MapperError {
    MapperError::Report(format!("CSV serialization failed: {err}"))
}
