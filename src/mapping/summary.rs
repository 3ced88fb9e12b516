//! Confidence statistics for a finished run.

use super::OutputRecord;
use crate::model::Module;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Coarse confidence level of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    /// `>= 0.8`
    High,
    /// `>= 0.6`
    Moderate,
    Low,
}

impl ConfidenceBand {
    pub const HIGH_THRESHOLD: f64 = 0.8;
    pub const MODERATE_THRESHOLD: f64 = 0.6;

    #[must_use]
    pub fn classify(confidence: f64) -> Self {
        if confidence >= Self::HIGH_THRESHOLD {
            Self::High
        } else if confidence >= Self::MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::High, Self::Moderate, Self::Low]
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate view of a run's output records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSummary {
    pub total: usize,
    pub reference_entries: usize,
    pub by_band: IndexMap<ConfidenceBand, usize>,
    pub by_module: IndexMap<Module, usize>,
    /// `None` when there are no records
    pub mean_confidence: Option<f64>,
    pub min_confidence: Option<f64>,
    pub max_confidence: Option<f64>,
    pub provider: String,
    pub generated_at: DateTime<Utc>,
}

impl MappingSummary {
    #[must_use]
    pub fn from_records(
        records: &[OutputRecord],
        reference_entries: usize,
        provider: impl Into<String>,
    ) -> Self {
        let mut by_band: IndexMap<ConfidenceBand, usize> =
            ConfidenceBand::all().into_iter().map(|b| (b, 0)).collect();
        let mut by_module: IndexMap<Module, usize> =
            Module::all().into_iter().map(|m| (m, 0)).collect();

        for record in records {
            *by_band
                .entry(ConfidenceBand::classify(record.confidence))
                .or_default() += 1;
            *by_module.entry(record.module).or_default() += 1;
        }

        let scores = records.iter().map(|r| r.confidence);
        let (min, max) = scores.clone().fold((None, None), |(lo, hi), c| {
            (
                Some(lo.map_or(c, |l: f64| l.min(c))),
                Some(hi.map_or(c, |h: f64| h.max(c))),
            )
        });
        let mean = (!records.is_empty())
            .then(|| super::round_confidence(scores.sum::<f64>() / records.len() as f64));

        Self {
            total: records.len(),
            reference_entries,
            by_band,
            by_module,
            mean_confidence: mean,
            min_confidence: min,
            max_confidence: max,
            provider: provider.into(),
            generated_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn band_count(&self, band: ConfidenceBand) -> usize {
        self.by_band.get(&band).copied().unwrap_or(0)
    }

    /// Emit the summary through `tracing`.
    pub fn log(&self) {
        tracing::info!(
            "Mapped {} entries ({} high, {} moderate, {} low confidence)",
            self.total,
            self.band_count(ConfidenceBand::High),
            self.band_count(ConfidenceBand::Moderate),
            self.band_count(ConfidenceBand::Low)
        );
        if let (Some(mean), Some(min), Some(max)) =
            (self.mean_confidence, self.min_confidence, self.max_confidence)
        {
            tracing::info!("Confidence mean {:.3}, min {:.3}, max {:.3}", mean, min, max);
        }
        for (module, count) in &self.by_module {
            tracing::debug!("  {}: {} matches", module, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, module: Module, confidence: f64) -> OutputRecord {
        OutputRecord {
            namaste_code: code.into(),
            namaste_display: code.to_lowercase(),
            icd_code: format!("X{code}"),
            icd_title: String::new(),
            module,
            confidence,
        }
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(ConfidenceBand::classify(0.8), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::classify(0.799), ConfidenceBand::Moderate);
        assert_eq!(ConfidenceBand::classify(0.6), ConfidenceBand::Moderate);
        assert_eq!(ConfidenceBand::classify(0.599), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::classify(-0.2), ConfidenceBand::Low);
    }

    #[test]
    fn test_summary_counts() {
        let records = vec![
            record("N1", Module::Mms, 0.95),
            record("N2", Module::Tm2, 0.65),
            record("N3", Module::Tm2, 0.2),
            record("N4", Module::Tm2, 0.8),
        ];
        let summary = MappingSummary::from_records(&records, 10, "hashing");
        assert_eq!(summary.total, 4);
        assert_eq!(summary.reference_entries, 10);
        assert_eq!(summary.band_count(ConfidenceBand::High), 2);
        assert_eq!(summary.band_count(ConfidenceBand::Moderate), 1);
        assert_eq!(summary.band_count(ConfidenceBand::Low), 1);
        assert_eq!(summary.by_module[&Module::Mms], 1);
        assert_eq!(summary.by_module[&Module::Tm2], 3);
        assert_eq!(summary.min_confidence, Some(0.2));
        assert_eq!(summary.max_confidence, Some(0.95));
        assert_eq!(summary.mean_confidence, Some(0.65));
    }

    #[test]
    fn test_empty_summary() {
        let summary = MappingSummary::from_records(&[], 3, "hashing");
        assert_eq!(summary.total, 0);
        assert_eq!(summary.mean_confidence, None);
        assert_eq!(summary.band_count(ConfidenceBand::High), 0);
        assert_eq!(summary.by_module.len(), 2);
    }

    #[test]
    fn test_summary_json_uses_lowercase_bands() {
        let summary = MappingSummary::from_records(&[record("N1", Module::Mms, 0.9)], 1, "fixed");
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"high\":1"), "{json}");
        assert!(json.contains("\"MMS\":1"), "{json}");
    }
}
