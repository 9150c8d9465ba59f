//! tempo: merge event extractions into a supergraph and report on it.
//!
//! ```bash
//! tempo config init tempo.toml
//! tempo run -c tempo.toml
//! tempo export -i ../data/output/supergraph.json --doc nyt_0001
//! ```

use clap::Parser;
use std::process::ExitCode;

use tempo::cli::output::{color, init_logging};
use tempo::cli::{self, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}
