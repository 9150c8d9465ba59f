//! Run command: build, then analyze the fresh supergraph

use clap::Parser;

use super::super::utils::ConfigOpts;
use super::analyze::{analyze, ReportOpts};
use super::build::{build, BuildOpts};

/// Build the supergraph and write all reports
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigOpts,

    #[command(flatten)]
    pub build: BuildOpts,

    #[command(flatten)]
    pub report: ReportOpts,
}

/// Entry point for `tempo run`.
pub fn cmd_run(args: RunArgs, quiet: bool) -> Result<(), String> {
    let mut config = args.config.load()?;
    args.build.apply(&mut config);
    args.report.apply(&mut config);
    // Catch a bad threshold list before spending time on the merge
    config.validate().map_err(|e| e.to_string())?;

    let supergraph = build(&config, args.build.pretty, quiet)?;
    analyze(&config, &supergraph, args.report.date(), quiet)
}
