//! End-to-end orchestration: load, merge, write, report.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::ingest::read_source;
use crate::report::{write_reports, ReportPaths};
use chrono::NaiveDate;
use tempo_coalesce::{Merged, Merger};
use tempo_core::{SourceCorpus, Supergraph};

/// Load every configured source, normalizing joint-IE records.
///
/// The first failing source aborts the load.
pub fn load_corpora(config: &PipelineConfig) -> Result<Vec<SourceCorpus>> {
    config.validate()?;
    config
        .sources
        .iter()
        .map(|source| read_source(source, &config.data_dir))
        .collect()
}

/// Load and merge all sources.
pub fn build(config: &PipelineConfig) -> Result<Merged> {
    let corpora = load_corpora(config)?;
    Merger::with_config(config.merge_config()).merge(&corpora)
}

/// Build the supergraph and write it to `config.output`.
pub fn build_and_write(config: &PipelineConfig, pretty: bool) -> Result<Merged> {
    let merged = build(config)?;
    merged.supergraph.write_to(&config.output, pretty)?;
    let stats = merged.supergraph.stats();
    log::info!(
        "wrote supergraph to {} ({} documents, {} events, {} relations)",
        config.output.display(),
        stats.documents,
        stats.events,
        stats.relations
    );
    Ok(merged)
}

/// Write reports for a supergraph.
pub fn analyze(
    config: &PipelineConfig,
    supergraph: &Supergraph,
    date: NaiveDate,
) -> Result<ReportPaths> {
    config.validate()?;
    write_reports(supergraph, config, date)
}

/// Today's date in local time, as used to name reports.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
