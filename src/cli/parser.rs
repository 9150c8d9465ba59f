//! CLI argument parsing and structure definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use super::commands::{AnalyzeArgs, BuildArgs, ConfigArgs, ExportArgs, RunArgs};
use tempo_core::GraphExportFormat;

/// Event supergraph builder and reporter
#[derive(Parser)]
#[command(name = "tempo")]
#[command(
    author,
    version,
    about = "Merge event extractions from several NLP pipelines into one supergraph",
    long_about = r#"
tempo - reconcile event extractions across pipelines

PIPELINE:
  load     : read each source's JSON / JSON Lines files
  normalize: key joint-IE triggers by their token span
  merge    : one event per [start:end) key, relations attached per source
  report   : coverage, overlap, and confidence statistics

EXAMPLES:
  tempo config init tempo.toml
  tempo build -c tempo.toml --pretty
  tempo analyze -c tempo.toml --date 2024-03-01
  tempo run -c tempo.toml
  tempo export -i supergraph.json --doc nyt_0001 --format networkx
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Top-level subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Load all sources and write the merged supergraph
    #[command(visible_alias = "b")]
    Build(BuildArgs),

    /// Write text, CSV, and SVG reports for a supergraph
    #[command(visible_alias = "a")]
    Analyze(AnalyzeArgs),

    /// Build, then analyze the result
    Run(RunArgs),

    /// Export one document graph to Cypher or NetworkX JSON
    #[command(visible_alias = "x")]
    Export(ExportArgs),

    /// Show or create configuration files
    Config(ConfigArgs),
}

/// Graph export format
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ExportFormat {
    /// Neo4j Cypher CREATE statements
    #[default]
    Cypher,
    /// NetworkX node-link JSON
    #[value(alias = "json")]
    Networkx,
}

impl From<ExportFormat> for GraphExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Cypher => GraphExportFormat::Cypher,
            ExportFormat::Networkx => GraphExportFormat::NetworkXJson,
        }
    }
}

/// Default log filter for the given flags.
#[must_use]
pub fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_verbosity() {
        let cli = Cli::try_parse_from(["tempo", "build", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(log_level(cli.verbose, cli.quiet), "debug");
        assert!(Cli::try_parse_from(["tempo", "-q", "-v", "build"]).is_err());
    }

    #[test]
    fn test_build_flags() {
        let cli = Cli::try_parse_from([
            "tempo",
            "build",
            "--data-dir",
            "corpus",
            "-o",
            "out.json",
            "--on-dangling",
            "skip",
            "--pretty",
        ])
        .unwrap();
        match cli.command {
            Commands::Build(args) => {
                assert!(args.build.pretty);
                assert_eq!(args.build.output.unwrap().to_str(), Some("out.json"));
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(Cli::try_parse_from(["tempo", "analyze", "--date", "03/01/2024"]).is_err());
        assert!(Cli::try_parse_from(["tempo", "analyze", "--date", "2024-03-01"]).is_ok());
    }
}
