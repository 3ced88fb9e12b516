//! Merge command handler.
//!
//! Implements the `merge` subcommand, which writes the unified MMS + TM2
//! reference table consumed by `map --reference`.

use crate::config::{AppConfig, MergePaths};
use anyhow::Result;

/// Run the merge command
#[allow(clippy::needless_pass_by_value)]
pub fn run_merge(config: AppConfig, paths: MergePaths) -> Result<()> {
    let unified = crate::pipeline::run_merge(&config, &paths)?;
    tracing::info!(
        "Unified reference table: {} rows, {} columns",
        unified.len(),
        unified.headers().len()
    );
    Ok(())
}
