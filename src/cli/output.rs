//! Output formatting utilities for CLI commands

use is_terminal::IsTerminal;
use std::io::{self, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use super::parser::log_level;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level comes from `-v` / `-q`.
/// Records from the `log` facade are bridged into the subscriber.
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(verbose, quiet)));
    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Wrap `text` in an ANSI color when stdout is a terminal.
pub fn color(code: &str, text: &str) -> String {
    if io::stdout().is_terminal() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), String> {
    if let Some(path) = path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }
        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write to {}: {}", path.display(), e))?;
    } else {
        print!("{}", content);
        io::stdout()
            .flush()
            .map_err(|e| format!("Failed to flush stdout: {}", e))?;
    }
    Ok(())
}

/// Print a one-line status message (respects quiet flag)
pub fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        println!("{} {}", color("32", "ok:"), msg);
    }
}
