//! Pipeline orchestration for mapping runs.
//!
//! A run reads every input table first, so a missing or malformed input
//! aborts before any embedding work, then embeds, matches, assembles and
//! finally writes the output. Nothing is written unless every stage
//! succeeded.
//!
//! The model is loaded once into a [`RunContext`] and borrowed read-only by
//! every stage.

use crate::config::{AppConfig, MapPaths, MergePaths, ReferenceInput};
use crate::embedding::{create_provider, encode_texts, EmbeddingMatrix, EmbeddingProvider};
use crate::error::{MapperError, Result};
use crate::mapping::{MappingAssembler, MappingSummary, OutputRecord};
use crate::matching::{ExhaustiveIndex, SimilarityMatcher, TextNormalizer};
use crate::model::{SourceEntry, Table};
use crate::parsers::read_table;
use crate::reference::{ReferenceTable, ReferenceTableBuilder};
use crate::reports::{create_reporter, render_table, write_all_atomic, write_atomic};
use anyhow::Context;
use std::path::Path;
use std::time::Instant;

/// Table name of the NAMASTE source terminology.
pub const SOURCE_TABLE: &str = "NAMASTE";
/// Table name of the ICD-11 MMS input.
pub const MMS_TABLE: &str = "MMS";
/// Table name of the ICD-11 TM2 input.
pub const TM2_TABLE: &str = "TM2";

/// Everything a run needs that outlives a single stage.
pub struct RunContext {
    config: AppConfig,
    provider: Box<dyn EmbeddingProvider>,
}

impl RunContext {
    /// Validate `config` and load the configured embedding provider.
    pub fn new(config: AppConfig) -> Result<Self> {
        config.ensure_valid()?;
        let provider = create_provider(&config.embedding)?;
        Ok(Self { config, provider })
    }

    /// Use an already constructed provider instead of the configured one.
    pub fn with_provider(config: AppConfig, provider: Box<dyn EmbeddingProvider>) -> Result<Self> {
        config.ensure_valid()?;
        if provider.dimension() == 0 {
            return Err(MapperError::config(format!(
                "embedding provider '{}' reports dimension 0",
                provider.name()
            )));
        }
        Ok(Self { config, provider })
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }
}

/// Records and statistics of a completed mapping.
#[derive(Debug, Clone)]
pub struct MappingOutcome {
    pub records: Vec<OutputRecord>,
    pub summary: MappingSummary,
}

/// Read the reference input, merging MMS and TM2 if given separately.
pub fn load_reference(config: &AppConfig, input: &ReferenceInput) -> Result<Table> {
    match input {
        ReferenceInput::Merged(path) => read_table(path, crate::reference::UNIFIED_TABLE_NAME),
        ReferenceInput::Split { mms, tm2 } => {
            let mms = read_table(mms, MMS_TABLE)?;
            let tm2 = read_table(tm2, TM2_TABLE)?;
            ReferenceTableBuilder::new(config.columns.reference.module.clone()).build(mms, tm2)
        }
    }
}

/// Map every source row onto its best reference row.
pub fn map_tables(ctx: &RunContext, source: &Table, reference: &Table) -> Result<MappingOutcome> {
    let config = ctx.config();
    let provider = ctx.provider();

    let reference = ReferenceTable::from_table(
        reference,
        &config.columns.reference,
        &TextNormalizer::new(config.text.reference_fields.iter().cloned()),
    )?;
    let sources = SourceEntry::collect(
        source,
        &config.columns.source,
        &TextNormalizer::new(config.text.source_fields.iter().cloned()),
    )?;

    if sources.is_empty() {
        if !config.matching.allow_empty_source {
            return Err(MapperError::EmptySourceTable {
                table: source.name().to_string(),
            });
        }
        tracing::warn!(
            "Source table {} has no rows; output will contain only the header",
            source.name()
        );
        return Ok(MappingOutcome {
            records: Vec::new(),
            summary: MappingSummary::from_records(&[], reference.len(), provider.name()),
        });
    }

    for (module, count) in reference.module_counts() {
        tracing::debug!("Reference entries from {}: {}", module, count);
    }

    let start = Instant::now();
    let entries = reference.entries();
    let label_reference = |i: usize| {
        entries
            .get(i)
            .map_or_else(|| format!("reference #{i}"), |e| format!("reference {}", e.code))
    };
    let reference_vectors = encode_texts(
        provider,
        reference.texts(),
        config.embedding.batch_size,
        label_reference,
    )?;
    let matrix = EmbeddingMatrix::new(provider.dimension(), reference_vectors, label_reference)?;
    tracing::info!(
        "Encoded {} reference entries with {} ({} dims) in {:.2?}",
        matrix.len(),
        provider.name(),
        matrix.dimension(),
        start.elapsed()
    );

    let texts: Vec<String> = sources.iter().map(|s| s.canonical_text.clone()).collect();
    let source_vectors = encode_texts(provider, &texts, config.embedding.batch_size, |i| {
        sources
            .get(i)
            .map_or_else(|| format!("source #{i}"), |s| format!("source {}", s.code))
    })?;

    let index = ExhaustiveIndex::new(reference.name(), matrix)?;
    let matcher =
        SimilarityMatcher::new(index, entries)?.with_parallel(config.matching.parallel);
    let results = matcher.match_all(&sources, &source_vectors)?;
    let records = MappingAssembler::new().assemble(&results);
    tracing::info!(
        "Matched {} source entries in {:.2?}",
        records.len(),
        start.elapsed()
    );

    let summary = MappingSummary::from_records(&records, reference.len(), provider.name());
    Ok(MappingOutcome { records, summary })
}

/// Full `map` workflow: read inputs, map, write output and optional summary.
///
/// The mapping and the summary are committed together: if either cannot be
/// written, neither exists afterwards.
pub fn run_mapping(ctx: &RunContext, paths: &MapPaths) -> anyhow::Result<MappingOutcome> {
    if paths.summary.as_deref() == Some(paths.output.as_path()) {
        return Err(MapperError::config(format!(
            "summary and mapping output are both {}",
            paths.output.display()
        ))
        .into());
    }
    tracing::info!("Reading source table: {}", paths.source.display());
    let source = read_table(&paths.source, SOURCE_TABLE)
        .with_context(|| format!("Failed to load source table {}", paths.source.display()))?;
    let reference = load_reference(ctx.config(), &paths.reference)
        .context("Failed to load reference table")?;
    tracing::info!(
        "Loaded {} source rows and {} reference rows",
        source.len(),
        reference.len()
    );

    let outcome = map_tables(ctx, &source, &reference).context("Mapping failed")?;

    let format = ctx.config().output.format;
    let content = create_reporter(format)
        .generate_mapping_report(&outcome.records)
        .context("Failed to render mapping output")?;
    let summary_json = match &paths.summary {
        Some(_) => Some(serde_json::to_string_pretty(&outcome.summary)?),
        None => None,
    };

    let mut files: Vec<(&Path, &str)> = vec![(paths.output.as_path(), content.as_str())];
    if let (Some(path), Some(json)) = (&paths.summary, &summary_json) {
        files.push((path.as_path(), json.as_str()));
    }
    write_all_atomic(&files).context("Failed to write mapping output")?;
    for (path, _) in &files {
        tracing::info!("Output written to {}", path.display());
    }

    outcome.summary.log();
    Ok(outcome)
}

/// Full `merge` workflow: build the unified reference table and write it as CSV.
pub fn run_merge(config: &AppConfig, paths: &MergePaths) -> anyhow::Result<Table> {
    config.ensure_valid()?;
    let input = ReferenceInput::Split {
        mms: paths.mms.clone(),
        tm2: paths.tm2.clone(),
    };
    let unified = load_reference(config, &input).context("Failed to build reference table")?;
    let content = render_table(&unified)?;
    write_output(&paths.output, &content)?;
    Ok(unified)
}

fn write_output(path: &Path, content: &str) -> anyhow::Result<()> {
    write_atomic(path, content)
        .with_context(|| format!("Failed to write output to {}", path.display()))?;
    tracing::info!("Output written to {}", path.display());
    Ok(())
}

/// Exit code for a failed run, from the first [`MapperError`] in the chain.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<MapperError>())
        .map_or(crate::error::exit_codes::FAILURE, MapperError::exit_code)
}
