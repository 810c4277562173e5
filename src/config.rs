//! Configuration management for the resume ATS toolkit

use crate::error::{Result, ResumeAtsError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub default_industry: String,
    pub weights: ScoreWeights,
    /// Extra terms appended to an industry's keyword table, keyed by industry name
    #[serde(default)]
    pub custom_keywords: HashMap<String, Vec<String>>,
}

/// Weights of the six sub-scores in the composite ATS score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub contact: f64,
    pub experience: f64,
    pub skills: f64,
    pub education: f64,
    pub keywords: f64,
    pub metrics: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum characters that must survive sanitization before analysis
    pub min_content_chars: usize,
    pub enable_caching: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            contact: 0.15,
            experience: 0.25,
            skills: 0.15,
            education: 0.10,
            keywords: 0.20,
            metrics: 0.15,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.contact + self.experience + self.skills + self.education + self.keywords + self.metrics
    }

    pub fn validate(&self) -> Result<()> {
        let all = [
            ("contact", self.contact),
            ("experience", self.experience),
            ("skills", self.skills),
            ("education", self.education),
            ("keywords", self.keywords),
            ("metrics", self.metrics),
        ];

        if let Some((name, value)) = all.iter().find(|(_, w)| *w < 0.0 || !w.is_finite()) {
            return Err(ResumeAtsError::Configuration(format!(
                "Weight '{}' must be a non-negative number, got {}",
                name, value
            )));
        }

        let total = self.total();
        if (total - 1.0).abs() > 0.001 {
            return Err(ResumeAtsError::Configuration(format!(
                "Scoring weights must sum to 1.0, got {:.3}",
                total
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig {
                default_industry: "Technology".to_string(),
                weights: ScoreWeights::default(),
                custom_keywords: HashMap::new(),
            },
            extraction: ExtractionConfig {
                min_content_chars: 50,
                enable_caching: true,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from `config_path`, writing defaults there on first use
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeAtsError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeAtsError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.weights.validate()?;
        if self.extraction.min_content_chars == 0 {
            return Err(ResumeAtsError::Configuration(
                "extraction.min_content_chars must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ats")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = ScoreWeights::default();
        assert!((weights.total() - 1.0).abs() < 1e-9);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let mut weights = ScoreWeights::default();
        weights.keywords = 0.5;
        assert!(matches!(weights.validate(), Err(ResumeAtsError::Configuration(_))));

        weights = ScoreWeights::default();
        weights.contact = -0.15;
        weights.experience = 0.55;
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.scoring.default_industry, "Technology");
        assert_eq!(config.extraction.min_content_chars, 50);
    }

    #[test]
    fn test_save_and_reload_custom_keywords() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config
            .scoring
            .custom_keywords
            .insert("Technology".to_string(), vec!["rust".to_string()]);
        config.output.format = OutputFormat::Markdown;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.output.format, OutputFormat::Markdown);
        assert_eq!(loaded.scoring.custom_keywords["Technology"], vec!["rust".to_string()]);
    }

    #[test]
    fn test_load_rejects_bad_weights() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.scoring.weights.metrics = 0.9;
        config.save_to(&path).unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
