//! Pipeline configuration
//!
//! ```yaml
//! model_roots:
//!   - ./models
//!   - /opt/shared-models
//! command: "fetch-model --format turtle"
//! parallel_resolution: true
//! default_language: en
//! shapes_path: ./extra-shapes.ttl
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::resolve::{CommandStrategy, FileSystemStrategy, FirstSuccess};
use crate::validate::DEFAULT_LANGUAGE;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings of a [`Pipeline`](crate::pipeline::Pipeline)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directories laid out as `<root>/<namespace>/<version>/<Element>.ttl`,
    /// tried in order
    pub model_roots: Vec<PathBuf>,
    /// External resolver, tried after the model roots
    pub command: Option<String>,
    /// Fetch the elements of a resolution level concurrently
    pub parallel_resolution: bool,
    /// Language tag proposed by `langString` fixes
    pub default_language: String,
    /// Shapes added to the bundled ones
    pub shapes_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_roots: Vec::new(),
            command: None,
            parallel_resolution: false,
            default_language: DEFAULT_LANGUAGE.to_string(),
            shapes_path: None,
        }
    }
}

impl PipelineConfig {
    /// Load a YAML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse YAML text
    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check the settings for consistency
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_language.trim().is_empty() {
            return Err(ConfigError::Invalid("default_language must not be empty".to_string()));
        }
        if let Some(command) = &self.command {
            if command.trim().is_empty() {
                return Err(ConfigError::Invalid("command must not be empty".to_string()));
            }
        }
        Ok(())
    }

    /// The configured strategies, model roots first, then the command
    pub fn build_strategy(&self) -> ConfigResult<FirstSuccess> {
        let mut strategy = FirstSuccess::new();
        for root in &self.model_roots {
            strategy.push(FileSystemStrategy::new(root));
        }
        if let Some(command) = &self.command {
            let command = CommandStrategy::from_command_line(command)
                .ok_or_else(|| ConfigError::Invalid(format!("Unusable command: {}", command)))?;
            strategy.push(command);
        }
        Ok(strategy)
    }
}
