use crate::types::{MAX_NODE_SCORE, MAX_RAW_SCORE, MIN_NODE_SCORE};
use crate::{Result, SchedulerError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default annotation holding the allow-list
pub const DEFAULT_ANNOTATION_KEY: &str = "nodeNames";

/// Arguments of the NodeNames plugin
///
/// Every field has a default, so an empty document is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PluginArgs {
    /// Pod annotation holding the comma-separated allow-list
    pub annotation_key: String,
    /// Inclusive upper bound of raw scores
    pub max_raw_score: i64,
    /// Score every node gets when a batch has no spread to normalize
    pub uniform_score: i64,
    /// Seed for a shared generator; thread-local entropy when unset
    pub seed: Option<u64>,
}

impl Default for PluginArgs {
    fn default() -> Self {
        Self {
            annotation_key: DEFAULT_ANNOTATION_KEY.to_string(),
            max_raw_score: MAX_RAW_SCORE,
            uniform_score: MAX_NODE_SCORE,
            seed: None,
        }
    }
}

impl PluginArgs {
    /// Parse plugin arguments from YAML
    pub fn from_yaml(data: &str) -> Result<Self> {
        let args: Self = serde_yaml::from_str(data).map_err(|e| {
            SchedulerError::serialization_error(format!("Failed to parse plugin args: {}", e))
        })?;
        args.validate()?;
        Ok(args)
    }

    /// Parse plugin arguments from JSON
    pub fn from_json(data: &str) -> Result<Self> {
        let args: Self = serde_json::from_str(data).map_err(|e| {
            SchedulerError::serialization_error(format!("Failed to parse plugin args: {}", e))
        })?;
        args.validate()?;
        Ok(args)
    }

    /// Load plugin arguments from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|e| SchedulerError::io_error(path.display().to_string(), e))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&data),
            _ => Self::from_yaml(&data),
        }
    }

    /// Check the arguments are usable
    pub fn validate(&self) -> Result<()> {
        if self.annotation_key.is_empty() {
            return Err(SchedulerError::invalid_config(
                "annotationKey must not be empty",
                format!("Omit annotationKey to use the default '{}'", DEFAULT_ANNOTATION_KEY),
            ));
        }

        if self.max_raw_score < 1 {
            return Err(SchedulerError::invalid_config(
                format!("maxRawScore must be at least 1, got {}", self.max_raw_score),
                format!("Omit maxRawScore to use the default {}", MAX_RAW_SCORE),
            ));
        }

        if !(MIN_NODE_SCORE..=MAX_NODE_SCORE).contains(&self.uniform_score) {
            return Err(SchedulerError::invalid_config(
                format!("uniformScore must be within 0-100, got {}", self.uniform_score),
                "Pick a normalized score between 0 and 100",
            ));
        }

        Ok(())
    }
}

/// Configuration for the scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Arguments handed to the NodeNames plugin
    pub plugin_args: PluginArgs,
    /// Maximum number of nodes filtered or scored at once
    pub parallelism: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            plugin_args: PluginArgs::default(),
            parallelism: 16,
        }
    }
}

impl SchedulerConfig {
    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.parallelism == 0 {
            return Err(SchedulerError::invalid_config(
                "parallelism must be at least 1",
                "Set parallelism to the number of nodes to evaluate at once",
            ));
        }
        self.plugin_args.validate()
    }
}
