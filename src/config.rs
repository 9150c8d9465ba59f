//! Pipeline configuration.
//!
//! Every path, source name, and threshold the pipeline uses lives in one
//! [`PipelineConfig`], loaded from TOML or defaulted:
//!
//! ```toml
//! data_dir = "../data"
//! output = "../data/output/supergraph.json"
//! analysis_dir = "../analysis"
//! thresholds = [0.75, 0.85, 0.95]
//! on_dangling_relation = "abort"
//! strict_ratios = true
//! figures = true
//!
//! [[sources]]
//! name = "oneie"
//! label = "OneIE"
//! kind = "joint-ie"
//! path = "oneie"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempo_coalesce::{DanglingRelation, MergeConfig};
use tempo_core::SourceKind;

/// Default file pattern for source directories.
pub const DEFAULT_PATTERN: &str = "*.json";

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

/// One pipeline whose output is merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Name used in provenance and attribute keys (`<name>_args`)
    pub name: String,
    /// Display label for reports; defaults to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Record convention of the source's files
    pub kind: SourceKind,
    /// Directory under `data_dir` holding the source's files
    pub path: PathBuf,
    /// Glob pattern for files within `path`
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl SourceConfig {
    /// Create a source with the default file pattern.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SourceKind, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            path: path.into(),
            pattern: default_pattern(),
        }
    }

    /// Set the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Display label, falling back to the name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Policy for relations whose `event1_id` no source discovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OnDangling {
    /// Fail the build
    #[default]
    Abort,
    /// Drop the relation with a warning
    Skip,
}

impl From<OnDangling> for DanglingRelation {
    fn from(policy: OnDangling) -> Self {
        match policy {
            OnDangling::Abort => DanglingRelation::Abort,
            OnDangling::Skip => DanglingRelation::Skip,
        }
    }
}

/// Configuration for a build/analyze run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Root directory of the source outputs
    pub data_dir: PathBuf,
    /// Where the supergraph is written
    pub output: PathBuf,
    /// Where reports are written
    pub analysis_dir: PathBuf,
    /// Confidence thresholds, strictly ascending
    pub thresholds: Vec<f64>,
    /// Dangling relation policy
    pub on_dangling_relation: OnDangling,
    /// Fail on ratios over zero relations instead of rendering `n/a`
    pub strict_ratios: bool,
    /// Render SVG figures
    pub figures: bool,
    /// Sources, in report order
    pub sources: Vec<SourceConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("../data"),
            output: PathBuf::from("../data/output/supergraph.json"),
            analysis_dir: PathBuf::from("../analysis"),
            thresholds: vec![0.75, 0.85, 0.95],
            on_dangling_relation: OnDangling::Abort,
            strict_ratios: true,
            figures: true,
            sources: vec![
                SourceConfig::new("oneie", SourceKind::JointIe, "oneie").with_label("OneIE"),
                SourceConfig::new("tear-tbd", SourceKind::Temporal, "tear/tbd")
                    .with_label("TEAR-TBD"),
                SourceConfig::new("tear-matres", SourceKind::Temporal, "tear/matres")
                    .with_label("TEAR-MATRES"),
            ],
        }
    }
}

impl PipelineConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(Error::config("at least one source is required"));
        }

        let mut names = BTreeSet::new();
        for source in &self.sources {
            if source.name.is_empty() {
                return Err(Error::config("source names must not be empty"));
            }
            if !names.insert(source.name.as_str()) {
                return Err(Error::config(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
        }

        let joint = self
            .sources
            .iter()
            .filter(|s| s.kind == SourceKind::JointIe)
            .count();
        if joint > 1 {
            return Err(Error::config(format!(
                "at most one joint-ie source is allowed, found {}",
                joint
            )));
        }

        if self.thresholds.is_empty() {
            return Err(Error::config("at least one threshold is required"));
        }
        if let Some(t) = self.thresholds.iter().find(|t| !(0.0..=1.0).contains(*t)) {
            return Err(Error::config(format!("threshold {} is outside [0, 1]", t)));
        }
        if self.thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::config("thresholds must be strictly ascending"));
        }

        Ok(())
    }

    /// Merger settings derived from this config.
    #[must_use]
    pub fn merge_config(&self) -> MergeConfig {
        MergeConfig {
            on_dangling: self.on_dangling_relation.into(),
        }
    }

    /// Look up a source by name.
    #[must_use]
    pub fn source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Source names in report order.
    #[must_use]
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }

    /// Sources that report relations.
    pub fn relation_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.kind.has_relations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert_eq!(
            config.source_names(),
            vec!["oneie", "tear-tbd", "tear-matres"]
        );
        assert_eq!(config.relation_sources().count(), 2);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PipelineConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[[sources]]"));
        assert!(text.contains("kind = \"joint-ie\""));
        assert_eq!(PipelineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            data_dir = "corpus"
            on_dangling_relation = "skip"
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("corpus"));
        assert_eq!(config.on_dangling_relation, OnDangling::Skip);
        assert_eq!(config.merge_config().on_dangling, DanglingRelation::Skip);
        assert_eq!(config.thresholds, vec![0.75, 0.85, 0.95]);
        assert_eq!(config.sources.len(), 3);
    }

    #[test]
    fn test_source_pattern_and_label_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [[sources]]
            name = "tbd"
            kind = "temporal"
            path = "tear/tbd"
            "#,
        )
        .unwrap();
        let source = config.source("tbd").unwrap();
        assert_eq!(source.pattern, DEFAULT_PATTERN);
        assert_eq!(source.label(), "tbd");
    }

    #[test]
    fn test_rejects_bad_thresholds() {
        let descending = PipelineConfig {
            thresholds: vec![0.9, 0.8],
            ..PipelineConfig::default()
        };
        assert!(matches!(descending.validate(), Err(Error::Config(_))));

        let out_of_range = PipelineConfig {
            thresholds: vec![0.5, 1.5],
            ..PipelineConfig::default()
        };
        assert!(out_of_range.validate().is_err());

        let empty = PipelineConfig {
            thresholds: vec![],
            ..PipelineConfig::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_sources() {
        let mut config = PipelineConfig::default();
        config.sources.push(SourceConfig::new("oneie", SourceKind::Temporal, "x"));
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config
            .sources
            .push(SourceConfig::new("dygie", SourceKind::JointIe, "dygie"));
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            sources: vec![],
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(PipelineConfig::from_toml_str("treshold = 0.5").is_err());
    }
}
