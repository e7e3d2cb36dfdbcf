//! Project configuration schema for modelgen.yaml
//!
//! ```yaml
//! default_namespace: SpayWise.Data
//! base_class_namespace: SpayWise.Data.Conventions
//! identity_type: int
//! entities: entities
//! output: Generated
//! ```
//!
//! Every key is optional. Relative directories are resolved against the
//! directory holding the configuration file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codegen::CodegenSettings;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "modelgen.yaml";

/// Error raised while loading or validating a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {CONFIG_FILE_NAME}: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level project configuration from modelgen.yaml
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default = "default_namespace")]
    pub default_namespace: String,
    #[serde(default)]
    pub base_class_namespace: Option<String>,
    #[serde(default = "default_identity_type")]
    pub identity_type: String,
    /// Directory holding the entity sources
    #[serde(default = "default_entities_dir")]
    pub entities: PathBuf,
    /// Directory receiving the generated files
    #[serde(default = "default_output_dir")]
    pub output: PathBuf,
}

fn default_namespace() -> String {
    CodegenSettings::default().default_namespace
}

fn default_identity_type() -> String {
    CodegenSettings::default().identity_type
}

fn default_entities_dir() -> PathBuf {
    PathBuf::from("entities")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            base_class_namespace: None,
            identity_type: default_identity_type(),
            entities: default_entities_dir(),
            output: default_output_dir(),
        }
    }
}

impl ProjectConfig {
    /// Parse configuration text; an empty document yields the defaults
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a modelgen.yaml file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config = Self::from_yaml(&contents)?;
        if let Some(base) = path.parent() {
            config.entities = base.join(&config.entities);
            config.output = base.join(&config.output);
        }

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check namespaces and the identity type
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_namespace(&self.default_namespace) {
            return Err(ConfigError::Invalid(format!(
                "default_namespace '{}' is not a dotted identifier",
                self.default_namespace
            )));
        }

        if let Some(ns) = &self.base_class_namespace {
            if !is_namespace(ns) {
                return Err(ConfigError::Invalid(format!(
                    "base_class_namespace '{}' is not a dotted identifier",
                    ns
                )));
            }
        }

        if self.identity_type.trim().is_empty() {
            return Err(ConfigError::Invalid("identity_type cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Settings handed to the code generator
    pub fn codegen_settings(&self) -> CodegenSettings {
        CodegenSettings {
            identity_type: self.identity_type.clone(),
            default_namespace: self.default_namespace.clone(),
            base_class_namespace: self.base_class_namespace.clone(),
        }
    }
}

fn is_namespace(ns: &str) -> bool {
    !ns.is_empty()
        && ns.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        })
}
