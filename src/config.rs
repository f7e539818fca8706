//! Configuration schema for docvet.
//!
//! Settings live in a YAML file next to the project (`docvet.yaml` or
//! `.docvet.yaml`). Every key is optional; an absent file means defaults.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::detect::Check;

/// Config file names searched for in the working directory, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["docvet.yaml", ".docvet.yaml"];

/// Symbol kind tags accepted by `require_examples`.
pub const EXAMPLE_KIND_TAGS: &[&str] = &["class", "protocol", "dataclass", "enum"];

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unknown check {0:?} (expected enrichment or freshness)")]
    UnknownCheck(String),
    #[error("check {0:?} listed in both fail_on and warn_on")]
    ConflictingCheck(String),
    #[error("unknown require_examples tag {0:?} (expected one of: class, protocol, dataclass, enum)")]
    UnknownExampleTag(String),
    #[error("invalid exclude pattern {pattern:?}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

fn default_true() -> bool {
    true
}

fn default_example_tags() -> Vec<String> {
    EXAMPLE_KIND_TAGS.iter().map(|t| t.to_string()).collect()
}

/// Toggles for the enrichment rules.
///
/// Nine booleans each gate one rule. `require_examples` is a list of kind
/// tags: the examples rule only fires for symbols whose classified kind is
/// listed, and an empty list disables it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnrichmentConfig {
    #[serde(default = "default_true")]
    pub require_raises: bool,
    #[serde(default = "default_true")]
    pub require_yields: bool,
    #[serde(default = "default_true")]
    pub require_receives: bool,
    #[serde(default = "default_true")]
    pub require_warns: bool,
    #[serde(default = "default_true")]
    pub require_other_parameters: bool,
    #[serde(default = "default_true")]
    pub require_typed_attributes: bool,
    #[serde(default = "default_true")]
    pub require_cross_references: bool,
    #[serde(default = "default_true")]
    pub prefer_fenced_code_blocks: bool,
    #[serde(default = "default_true")]
    pub require_attributes: bool,
    #[serde(default = "default_example_tags")]
    pub require_examples: Vec<String>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            require_raises: true,
            require_yields: true,
            require_receives: true,
            require_warns: true,
            require_other_parameters: true,
            require_typed_attributes: true,
            require_cross_references: true,
            prefer_fenced_code_blocks: true,
            require_attributes: true,
            require_examples: default_example_tags(),
        }
    }
}

impl EnrichmentConfig {
    /// Every rule switched off.
    pub fn all_disabled() -> Self {
        Self {
            require_raises: false,
            require_yields: false,
            require_receives: false,
            require_warns: false,
            require_other_parameters: false,
            require_typed_attributes: false,
            require_cross_references: false,
            prefer_fenced_code_blocks: false,
            require_attributes: false,
            require_examples: Vec::new(),
        }
    }

    /// Every toggle by field name. The list toggle counts as on when
    /// non-empty.
    pub fn toggles(&self) -> [(&'static str, bool); 10] {
        [
            ("require_raises", self.require_raises),
            ("require_yields", self.require_yields),
            ("require_receives", self.require_receives),
            ("require_warns", self.require_warns),
            ("require_other_parameters", self.require_other_parameters),
            ("require_attributes", self.require_attributes),
            ("require_typed_attributes", self.require_typed_attributes),
            ("require_examples", !self.require_examples.is_empty()),
            ("require_cross_references", self.require_cross_references),
            ("prefer_fenced_code_blocks", self.prefer_fenced_code_blocks),
        ]
    }

    /// Look up one toggle by field name. Unknown names are off.
    pub fn toggle(&self, name: &str) -> bool {
        self.toggles()
            .iter()
            .find(|(field, _)| *field == name)
            .is_some_and(|(_, on)| *on)
    }

    /// Whether the examples rule covers symbols classified as `tag`.
    pub fn wants_examples_for(&self, tag: &str) -> bool {
        self.require_examples.iter().any(|t| t == tag)
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DocvetConfig {
    /// Root directory for discovery when no paths are given.
    #[serde(default)]
    pub src_root: Option<PathBuf>,
    /// Glob patterns for paths to skip.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Checks whose findings make the run fail.
    #[serde(default)]
    pub fail_on: Vec<String>,
    /// Checks reported without affecting the exit code.
    #[serde(default)]
    pub warn_on: Vec<String>,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

impl DocvetConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a config from YAML text. An empty document means defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Find a config file in `dir`, trying [`DEFAULT_CONFIG_NAMES`] in order.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Check names, example tags and glob patterns.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail_on = parse_checks(&self.fail_on)?;
        let warn_on = parse_checks(&self.warn_on)?;
        if let Some(check) = fail_on.iter().find(|c| warn_on.contains(c)) {
            return Err(ConfigError::ConflictingCheck(check.to_string()));
        }

        for tag in &self.enrichment.require_examples {
            if !EXAMPLE_KIND_TAGS.contains(&tag.as_str()) {
                return Err(ConfigError::UnknownExampleTag(tag.clone()));
            }
        }

        self.exclude_set()?;
        Ok(())
    }

    /// Checks whose findings fail the run.
    pub fn fail_on_checks(&self) -> Result<Vec<Check>, ConfigError> {
        parse_checks(&self.fail_on)
    }

    /// Compiled `exclude` patterns.
    pub fn exclude_set(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::Glob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| ConfigError::Glob {
            pattern: self.exclude.join(", "),
            source,
        })
    }
}

fn parse_checks(names: &[String]) -> Result<Vec<Check>, ConfigError> {
    names
        .iter()
        .map(|name| {
            name.parse::<Check>()
                .map_err(|_| ConfigError::UnknownCheck(name.clone()))
        })
        .collect()
}
