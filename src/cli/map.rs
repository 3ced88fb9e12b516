//! Map command handler.
//!
//! Implements the `map` subcommand: NAMASTE source table against the
//! ICD-11 reference table.

use crate::config::{AppConfig, MapPaths};
use crate::pipeline::{run_mapping, RunContext};
use anyhow::Result;
use std::time::Instant;

/// Run the map command
#[allow(clippy::needless_pass_by_value)]
pub fn run_map(config: AppConfig, paths: MapPaths) -> Result<()> {
    let start = Instant::now();
    let ctx = RunContext::new(config)?;
    tracing::info!(
        "Embedding provider: {} ({} dims)",
        ctx.provider().name(),
        ctx.provider().dimension()
    );

    let outcome = run_mapping(&ctx, &paths)?;
    tracing::info!(
        "Wrote {} mappings to {} in {:.2?}",
        outcome.records.len(),
        paths.output.display(),
        start.elapsed()
    );
    Ok(())
}
