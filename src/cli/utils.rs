//! Utility functions for CLI commands

use chrono::NaiveDate;
use clap::Args;
use std::path::{Path, PathBuf};

use crate::{PipelineConfig, Supergraph};

/// Config file read when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "tempo.toml";

/// `-c/--config` shared by every pipeline command
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOpts {
    /// Pipeline config (TOML); defaults to ./tempo.toml if present
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl ConfigOpts {
    /// Load the selected config, or the built-in defaults.
    pub fn load(&self) -> Result<PipelineConfig, String> {
        load_config(self.config.as_deref())
    }
}

/// Load a config file, falling back to `./tempo.toml`, then to defaults.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, String> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.is_file() {
                log::debug!("no {} found, using built-in config", DEFAULT_CONFIG_FILE);
                return Ok(PipelineConfig::default());
            }
            fallback
        }
    };
    log::debug!("loading config from {}", path.display());
    PipelineConfig::load(&path).map_err(|e| e.to_string())
}

/// Read a supergraph JSON file.
pub fn read_supergraph(path: &Path) -> Result<Supergraph, String> {
    Supergraph::read_from(path).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Parse a `YYYY-MM-DD` report date.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got {:?}: {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tempo.toml");
        std::fs::write(&path, "thresholds = [0.5]\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.thresholds, vec![0.5]);
    }
}
