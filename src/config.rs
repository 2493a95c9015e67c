//! Scraper configuration
//!
//! Loaded from an optional TOML file. Every key is optional; anything left
//! out keeps its built-in value, including individual strategy chains.
//!
//! ```toml
//! include_transcript = true
//! diagnostics = false
//!
//! [navigation]
//! timeout_ms = 45000
//! settle_ms = 5000
//!
//! [[strategies.title]]
//! kind = "attribute_presence"
//! attribute = "data-title"
//! ```

use crate::browser::NavigationOptions;
use crate::error::{ConfigError, Result};
use crate::extraction::diagnostics::DEFAULT_SAMPLE_LIMIT;
use crate::extraction::{ExtractionTarget, SnapshotOptions, StrategyTable};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Everything the scrape job needs beyond the browser itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Also extract the transcript
    pub include_transcript: bool,
    /// Log a diagnostic snapshot before extraction
    pub diagnostics: bool,
    /// Class samples kept in a snapshot
    pub diagnostic_sample_limit: usize,
    /// Navigation behaviour
    pub navigation: NavigationOptions,
    /// Per-field strategy chains
    pub strategies: StrategyTable,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            include_transcript: false,
            diagnostics: false,
            diagnostic_sample_limit: DEFAULT_SAMPLE_LIMIT,
            navigation: NavigationOptions::default(),
            strategies: StrategyTable::default(),
        }
    }
}

impl ScraperConfig {
    /// Parse a config document
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Read and parse a config file
    #[instrument]
    pub async fn load<P: AsRef<Path> + std::fmt::Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let input = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ReadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        let config = Self::from_toml_str(&input)?;
        debug!(
            include_transcript = config.include_transcript,
            diagnostics = config.diagnostics,
            "Loaded config"
        );
        Ok(config)
    }

    /// Targets extracted for every page, in record order
    pub fn targets(&self) -> Vec<ExtractionTarget> {
        let mut targets = vec![ExtractionTarget::Title, ExtractionTarget::Summary];
        if self.include_transcript {
            targets.push(ExtractionTarget::Transcript);
        }
        targets.push(ExtractionTarget::CreatedDate);
        targets
    }

    /// Snapshot options when diagnostics are enabled
    pub fn snapshot_options(&self) -> Option<SnapshotOptions> {
        self.diagnostics
            .then(|| SnapshotOptions::for_table(&self.strategies, self.diagnostic_sample_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::Strategy;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(
            ScraperConfig::from_toml_str("").unwrap(),
            ScraperConfig::default()
        );
    }

    #[test]
    fn test_partial_overrides() {
        let config = ScraperConfig::from_toml_str(
            r#"
            include_transcript = true

            [navigation]
            settle_ms = 500

            [[strategies.title]]
            kind = "attribute_presence"
            attribute = "data-title"
            "#,
        )
        .unwrap();

        assert!(config.include_transcript);
        assert_eq!(config.navigation.settle_ms, 500);
        assert_eq!(config.navigation.retries, 3);
        assert_eq!(
            config.strategies.title,
            vec![Strategy::attribute("data-title")]
        );
        assert_eq!(config.strategies.summary, StrategyTable::default().summary);
    }

    #[test]
    fn test_targets() {
        let mut config = ScraperConfig::default();
        assert_eq!(
            config.targets(),
            vec![
                ExtractionTarget::Title,
                ExtractionTarget::Summary,
                ExtractionTarget::CreatedDate
            ]
        );
        config.include_transcript = true;
        assert_eq!(config.targets()[2], ExtractionTarget::Transcript);
    }

    #[test]
    fn test_snapshot_options_follow_diagnostics_flag() {
        let mut config = ScraperConfig::default();
        assert!(config.snapshot_options().is_none());
        config.diagnostics = true;
        let options = config.snapshot_options().unwrap();
        assert_eq!(options.sample_limit, DEFAULT_SAMPLE_LIMIT);
        assert!(options.attributes.contains(&"data-value".to_string()));
    }

    #[test]
    fn test_bad_toml() {
        let err = ScraperConfig::from_toml_str("include_transcript = \"maybe\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = ScraperConfig::load("/no/such/otter.toml").await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[tokio::test]
    async fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("otter.toml");
        std::fs::write(&path, "diagnostics = true\n").unwrap();
        let config = ScraperConfig::load(&path).await.unwrap();
        assert!(config.diagnostics);
    }
}
