//! Configuration management for the resume scorer

use crate::error::{Result, ResumeScorerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest fairness adjustment, in either direction, a config may ask for
pub const MAX_FAIRNESS_OFFSET: i32 = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub model: ModelConfig,
    pub output: OutputConfig,
}

/// Knobs for the single scoring strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub use_classifier: bool,
    pub include_bigrams: bool,
    pub min_token_len: usize,
    pub min_bigram_len: usize,
    pub min_frequency: usize,
    pub keyword_weight: f32,
    pub classifier_weight: f32,
    pub base_min: u8,
    pub base_max: u8,
    pub fairness_min: i32,
    pub fairness_max: i32,
    pub score_min: u8,
    pub score_max: u8,
    pub min_word_count: usize,
    pub not_resume_score: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// JSON classifier artifact loaded at startup, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            use_classifier: true,
            include_bigrams: false,
            min_token_len: 3,
            min_bigram_len: 8,
            min_frequency: 1,
            keyword_weight: 0.6,
            classifier_weight: 0.4,
            base_min: 60,
            base_max: 95,
            fairness_min: -3,
            fairness_max: 4,
            score_min: 50,
            score_max: 100,
            min_word_count: 40,
            not_resume_score: 10,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            pretty_json: true,
        }
    }
}

impl ScoringConfig {
    /// Reject ranges and weights the scorer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.base_min > self.base_max {
            return Err(ResumeScorerError::Configuration(format!(
                "base_min ({}) exceeds base_max ({})",
                self.base_min, self.base_max
            )));
        }
        if self.score_min > self.score_max || self.score_max > 100 {
            return Err(ResumeScorerError::Configuration(format!(
                "invalid score range {}..={}",
                self.score_min, self.score_max
            )));
        }
        let fairness_bounds = -MAX_FAIRNESS_OFFSET..=MAX_FAIRNESS_OFFSET;
        if !fairness_bounds.contains(&self.fairness_min) || !fairness_bounds.contains(&self.fairness_max) {
            return Err(ResumeScorerError::Configuration(format!(
                "fairness bounds must lie within -{max}..={max}",
                max = MAX_FAIRNESS_OFFSET
            )));
        }
        if self.fairness_min > self.fairness_max {
            return Err(ResumeScorerError::Configuration(format!(
                "fairness_min ({}) exceeds fairness_max ({})",
                self.fairness_min, self.fairness_max
            )));
        }
        if self.keyword_weight < 0.0 || self.classifier_weight < 0.0 {
            return Err(ResumeScorerError::Configuration(
                "scoring weights must not be negative".to_string(),
            ));
        }
        if self.keyword_weight == 0.0 && self.classifier_weight == 0.0 {
            return Err(ResumeScorerError::Configuration(
                "at least one scoring weight must be positive".to_string(),
            ));
        }
        if self.min_token_len == 0 {
            return Err(ResumeScorerError::Configuration(
                "min_token_len must be at least 1".to_string(),
            ));
        }
        if self.not_resume_score > 100 {
            return Err(ResumeScorerError::Configuration(format!(
                "not_resume_score ({}) is above 100",
                self.not_resume_score
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load an explicit configuration file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ResumeScorerError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.scoring.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeScorerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-scorer")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config_is_valid() {
        let config = Config::default();
        assert!(config.scoring.validate().is_ok());
        assert_eq!(config.scoring.fairness_min, -3);
        assert_eq!(config.scoring.fairness_max, 4);
        assert!(config.model.artifact_path.is_none());
    }

    #[test]
    fn test_inverted_ranges_rejected() {
        let mut scoring = ScoringConfig::default();
        scoring.fairness_min = 5;
        scoring.fairness_max = 1;
        assert!(scoring.validate().is_err());

        let mut scoring = ScoringConfig::default();
        scoring.base_min = 96;
        assert!(scoring.validate().is_err());

        let mut scoring = ScoringConfig::default();
        scoring.keyword_weight = 0.0;
        scoring.classifier_weight = 0.0;
        assert!(scoring.validate().is_err());
    }

    #[test]
    fn test_fairness_bounds_limited() {
        let mut scoring = ScoringConfig::default();
        scoring.fairness_min = i32::MAX;
        scoring.fairness_max = i32::MAX;
        assert!(scoring.validate().is_err());

        let mut scoring = ScoringConfig::default();
        scoring.fairness_min = i32::MIN;
        assert!(scoring.validate().is_err());

        let mut scoring = ScoringConfig::default();
        scoring.fairness_min = -MAX_FAIRNESS_OFFSET;
        scoring.fairness_max = MAX_FAIRNESS_OFFSET;
        assert!(scoring.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [scoring]
            include_bigrams = true
            fairness_min = 0
            fairness_max = 0
            "#,
        )
        .unwrap();

        assert!(config.scoring.include_bigrams);
        assert_eq!(config.scoring.fairness_max, 0);
        assert_eq!(config.scoring.base_max, 95);
        assert_eq!(config.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.scoring.min_word_count = 25;
        config.model.artifact_path = Some(PathBuf::from("/tmp/model.json"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.scoring, config.scoring);
        assert_eq!(loaded.model.artifact_path, config.model.artifact_path);
    }
}
