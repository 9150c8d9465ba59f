//! Analyze command: reports over an existing supergraph

use chrono::NaiveDate;
use clap::{Args, Parser};
use std::path::PathBuf;

use super::super::output::log_info;
use super::super::utils::{parse_date, read_supergraph, ConfigOpts};

use crate::config::PipelineConfig;
use crate::pipeline;
use crate::Supergraph;

/// Overrides for the report stage
#[derive(Args, Debug, Clone, Default)]
pub struct ReportOpts {
    /// Directory the reports are written under
    #[arg(long, value_name = "DIR")]
    pub analysis_dir: Option<PathBuf>,

    /// Report date used in file names (YYYY-MM-DD, default today)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Print "n/a" for ratios over zero relations instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Skip the SVG figures
    #[arg(long)]
    pub no_figures: bool,
}

impl ReportOpts {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(dir) = &self.analysis_dir {
            config.analysis_dir = dir.clone();
        }
        if self.lenient {
            config.strict_ratios = false;
        }
        if self.no_figures {
            config.figures = false;
        }
    }

    /// The report date, defaulting to today.
    pub fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(pipeline::today)
    }
}

/// Write text, CSV, and figure reports for a supergraph
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub config: ConfigOpts,

    /// Supergraph JSON (default: the config's output path)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub report: ReportOpts,
}

/// Entry point for `tempo analyze`.
pub fn cmd_analyze(args: AnalyzeArgs, quiet: bool) -> Result<(), String> {
    let mut config = args.config.load()?;
    args.report.apply(&mut config);
    let input = args.input.unwrap_or_else(|| config.output.clone());
    let supergraph = read_supergraph(&input)?;
    analyze(&config, &supergraph, args.report.date(), quiet)
}

/// Write all reports, printing where they went.
pub(super) fn analyze(
    config: &PipelineConfig,
    supergraph: &Supergraph,
    date: NaiveDate,
    quiet: bool,
) -> Result<(), String> {
    let paths = pipeline::analyze(config, supergraph, date).map_err(|e| e.to_string())?;
    log_info(&format!("wrote {}", paths.text.display()), quiet);
    log_info(&format!("wrote {}", paths.csv.display()), quiet);
    if !paths.figures.is_empty() {
        log_info(
            &format!(
                "wrote {} figures under {}",
                paths.figures.len(),
                config.analysis_dir.join("figures").display()
            ),
            quiet,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_and_no_figures() {
        let mut config = PipelineConfig::default();
        ReportOpts {
            lenient: true,
            no_figures: true,
            ..ReportOpts::default()
        }
        .apply(&mut config);
        assert!(!config.strict_ratios);
        assert!(!config.figures);
    }

    #[test]
    fn test_explicit_date_wins() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let opts = ReportOpts {
            date: Some(date),
            ..ReportOpts::default()
        };
        assert_eq!(opts.date(), date);
    }
}
