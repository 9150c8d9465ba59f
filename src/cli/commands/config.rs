//! Config command: print or scaffold the pipeline configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::super::output::{log_info, write_output};
use super::super::utils::{load_config, DEFAULT_CONFIG_FILE};

use crate::config::PipelineConfig;

/// Show or create configuration files
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// `config` subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show {
        /// Config file to read (default: ./tempo.toml or built-in)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Write the built-in configuration to a file
    Init {
        /// Destination
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Entry point for `tempo config`.
pub fn cmd_config(args: ConfigArgs, quiet: bool) -> Result<(), String> {
    match args.action {
        ConfigAction::Show { config } => {
            let config = load_config(config.as_deref())?;
            let text = config.to_toml().map_err(|e| e.to_string())?;
            write_output(&text, None)
        }
        ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ));
            }
            let text = PipelineConfig::default()
                .to_toml()
                .map_err(|e| e.to_string())?;
            write_output(&text, Some(&path))?;
            log_info(&format!("wrote {}", path.display()), quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init(path: PathBuf, force: bool) -> Result<(), String> {
        cmd_config(
            ConfigArgs {
                action: ConfigAction::Init { path, force },
            },
            true,
        )
    }

    #[test]
    fn test_init_refuses_to_clobber() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tempo.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        let err = init(path.clone(), false).unwrap_err();
        assert!(err.contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        init(path.clone(), true).unwrap();
        assert!(PipelineConfig::load(&path).is_ok());
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tempo.toml");
        init(path.clone(), false).unwrap();
        let loaded = PipelineConfig::load(&path).unwrap();
        assert_eq!(loaded, PipelineConfig::default());
    }
}
