//! Splitter configuration.
//!
//! Defaults reproduce the stock behavior: markers start with `==>`, the
//! container name is the sixth path segment, output goes to `containers/`
//! and the first malformed payload line aborts the run. An optional TOML
//! file can change these and add classification rules:
//!
//! ```toml
//! output_dir = "split"
//! skip_malformed = true
//!
//! [[rules]]
//! pattern = "Starting kube-scheduler"
//! label = "scheduler"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classify::{Classifier, Rule};
use crate::error::{Result, SplitError};
use crate::marker::{MarkerParser, DEFAULT_MARKER_TOKEN, DEFAULT_NAME_SEGMENT};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "containers";

/// Configuration for a split run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    /// Directory receiving one file per container.
    pub output_dir: PathBuf,
    /// Prefix identifying boundary marker lines.
    pub marker_token: String,
    /// Index of the `/`-separated marker segment holding the container name.
    pub name_segment: usize,
    /// Warn about and skip malformed payload lines instead of aborting.
    pub skip_malformed: bool,
    /// Extra classification rules, checked after the built-in ones.
    pub rules: Vec<Rule>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            marker_token: DEFAULT_MARKER_TOKEN.to_string(),
            name_segment: DEFAULT_NAME_SEGMENT,
            skip_malformed: false,
            rules: Vec::new(),
        }
    }
}

impl SplitConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SplitError::io("failed to read config file", path, e))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| SplitError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(SplitError::Config("output_dir cannot be empty".to_string()));
        }

        if self.marker_token.is_empty() {
            return Err(SplitError::Config("marker_token cannot be empty".to_string()));
        }

        if self.marker_token.starts_with('{') {
            return Err(SplitError::Config(
                "marker_token cannot start with '{' (reserved for payload lines)".to_string(),
            ));
        }

        for rule in &self.rules {
            rule.validate()?;
        }

        Ok(())
    }

    /// Builds the marker parser described by this configuration.
    #[must_use]
    pub fn marker_parser(&self) -> MarkerParser {
        MarkerParser::new(self.marker_token.clone(), self.name_segment)
    }

    /// Builds the classifier: built-in rules followed by configured ones.
    #[must_use]
    pub fn classifier(&self) -> Classifier {
        Classifier::builtin().with_rules(self.rules.iter().cloned())
    }
}
