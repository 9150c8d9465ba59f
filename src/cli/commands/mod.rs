//! Command implementations for the tempo CLI
//!
//! Each command has its own module; options shared between commands live
//! next to the first command that owns them.

pub mod analyze;
pub mod build;
pub mod config;
pub mod export;
pub mod run;

// Re-export argument types for parser
pub use analyze::{cmd_analyze, AnalyzeArgs, ReportOpts};
pub use build::{cmd_build, BuildArgs, BuildOpts};
pub use config::{cmd_config, ConfigAction, ConfigArgs};
pub use export::{cmd_export, ExportArgs};
pub use run::{cmd_run, RunArgs};
