//! JSON output.

use super::{ReportFormat, ReportGenerator};
use crate::error::Result;
use crate::mapping::OutputRecord;

/// Renders mapping records as a pretty-printed JSON array.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReporter;

impl JsonReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_mapping_report(&self, records: &[OutputRecord]) -> Result<String> {
        let mut out = serde_json::to_string_pretty(records)?;
        out.push('\n');
        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Module;

    #[test]
    fn test_empty_array() {
        let out = JsonReporter::new().generate_mapping_report(&[]).unwrap();
        assert_eq!(out.trim(), "[]");
    }

    #[test]
    fn test_records_round_trip_in_order() {
        let records = vec![
            OutputRecord {
                namaste_code: "N2".into(),
                namaste_display: "cough".into(),
                icd_code: "X2".into(),
                icd_title: "cough".into(),
                module: Module::Tm2,
                confidence: 0.5,
            },
            OutputRecord {
                namaste_code: "N1".into(),
                namaste_display: "fever".into(),
                icd_code: "X1".into(),
                icd_title: "fever".into(),
                module: Module::Mms,
                confidence: 0.987,
            },
        ];
        let out = JsonReporter::new().generate_mapping_report(&records).unwrap();
        let parsed: Vec<OutputRecord> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, records);
    }
}
