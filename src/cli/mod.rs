//! CLI library modules for the tempo binary.
//!
//! Command logic lives here rather than in the binary so it can be tested
//! without spawning a process.

pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;

pub use parser::{Cli, Commands, ExportFormat};

use commands::{cmd_analyze, cmd_build, cmd_config, cmd_export, cmd_run};

/// Run the parsed subcommand.
///
/// `-q` silences the per-command status lines as well as logging.
pub fn run(cli: Cli) -> Result<(), String> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Build(args) => cmd_build(args, quiet),
        Commands::Analyze(args) => cmd_analyze(args, quiet),
        Commands::Run(args) => cmd_run(args, quiet),
        Commands::Export(args) => cmd_export(args),
        Commands::Config(args) => cmd_config(args, quiet),
    }
}
