//! Build command: load every source, merge, write the supergraph

use clap::{Args, Parser};
use std::path::PathBuf;

use super::super::output::log_info;
use super::super::utils::ConfigOpts;

use crate::config::{OnDangling, PipelineConfig};
use crate::pipeline;
use crate::Supergraph;

/// Overrides for the build stage
#[derive(Args, Debug, Clone, Default)]
pub struct BuildOpts {
    /// Directory holding one folder per source
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Where to write the supergraph JSON
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print the supergraph JSON
    #[arg(long)]
    pub pretty: bool,

    /// Relations whose source event is missing: abort or skip
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_dangling: Option<OnDangling>,
}

impl BuildOpts {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(policy) = self.on_dangling {
            config.on_dangling_relation = policy;
        }
    }
}

/// Merge all sources into a supergraph
#[derive(Parser, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub config: ConfigOpts,

    #[command(flatten)]
    pub build: BuildOpts,
}

/// Entry point for `tempo build`.
pub fn cmd_build(args: BuildArgs, quiet: bool) -> Result<(), String> {
    let mut config = args.config.load()?;
    args.build.apply(&mut config);
    build(&config, args.build.pretty, quiet)?;
    Ok(())
}

/// Build and write the supergraph, printing a one-line summary.
pub(super) fn build(
    config: &PipelineConfig,
    pretty: bool,
    quiet: bool,
) -> Result<Supergraph, String> {
    let merged = pipeline::build_and_write(config, pretty).map_err(|e| e.to_string())?;
    let totals = merged.supergraph.stats();
    let mut summary = format!(
        "wrote {} ({} documents, {} events, {} relations)",
        config.output.display(),
        totals.documents,
        totals.events,
        totals.relations
    );
    if merged.stats.relations_skipped > 0 {
        summary.push_str(&format!(
            "; skipped {} dangling relations",
            merged.stats.relations_skipped
        ));
    }
    log_info(&summary, quiet);
    Ok(merged.supergraph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_only_touch_given_fields() {
        let mut config = PipelineConfig::default();
        let before = config.data_dir.clone();
        BuildOpts {
            output: Some(PathBuf::from("graph.json")),
            on_dangling: Some(OnDangling::Skip),
            ..BuildOpts::default()
        }
        .apply(&mut config);

        assert_eq!(config.data_dir, before);
        assert_eq!(config.output, PathBuf::from("graph.json"));
        assert_eq!(config.on_dangling_relation, OnDangling::Skip);
    }
}
