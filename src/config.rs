//! Configuration management for the skill matcher

use crate::error::{Result, SkillMatchError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub tables: TablesConfig,
    pub scoring: ScoringConfig,
    pub recommendations: RecommendationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablesConfig {
    /// External reference tables; the embedded tables are used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub exact_weight: f64,
    pub partial_weight: f64,
    pub category_weight: f64,
    /// Partial matches must score strictly above this
    pub partial_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    pub max_gaps: usize,
    pub courses_per_skill: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
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
            exact_weight: 0.6,
            partial_weight: 0.3,
            category_weight: 0.1,
            partial_threshold: 0.5,
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_gaps: 6,
            courses_per_skill: 2,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tables: TablesConfig::default(),
            scoring: ScoringConfig::default(),
            recommendations: RecommendationConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load from `config_path`, writing defaults there on first use
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| SkillMatchError::Configuration(format!("Failed to parse config: {}", e)))?;
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
            .map_err(|e| SkillMatchError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-match")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("scoring.exact_weight", self.scoring.exact_weight),
            ("scoring.partial_weight", self.scoring.partial_weight),
            ("scoring.category_weight", self.scoring.category_weight),
            ("scoring.partial_threshold", self.scoring.partial_threshold),
        ];
        for (key, value) in weights {
            if !(0.0..=1.0).contains(&value) {
                return Err(SkillMatchError::Configuration(format!(
                    "{} must be within [0, 1], got {}",
                    key, value
                )));
            }
        }
        Ok(())
    }

    /// Update a single dotted key, e.g. `scoring.exact_weight`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
        where
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            value
                .parse::<T>()
                .with_context(|| format!("Invalid value '{}' for {}", value, key))
                .map_err(|e| SkillMatchError::Configuration(format!("{:#}", e)))
        }

        match key {
            "tables.path" => {
                self.tables.path = if value.is_empty() { None } else { Some(PathBuf::from(value)) };
            }
            "scoring.exact_weight" => self.scoring.exact_weight = parse(key, value)?,
            "scoring.partial_weight" => self.scoring.partial_weight = parse(key, value)?,
            "scoring.category_weight" => self.scoring.category_weight = parse(key, value)?,
            "scoring.partial_threshold" => self.scoring.partial_threshold = parse(key, value)?,
            "recommendations.max_gaps" => self.recommendations.max_gaps = parse(key, value)?,
            "recommendations.courses_per_skill" => {
                self.recommendations.courses_per_skill = parse(key, value)?
            }
            "output.format" => {
                self.output.format = crate::cli::parse_output_format(value)
                    .map_err(SkillMatchError::Configuration)?
            }
            "output.detailed" => self.output.detailed = parse(key, value)?,
            "output.color_output" => self.output.color_output = parse(key, value)?,
            _ => {
                return Err(SkillMatchError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scoring_rules() {
        let config = Config::default();
        assert_eq!(config.scoring.exact_weight, 0.6);
        assert_eq!(config.scoring.partial_weight, 0.3);
        assert_eq!(config.scoring.category_weight, 0.1);
        assert_eq!(config.scoring.partial_threshold, 0.5);
        assert_eq!(config.recommendations.max_gaps, 6);
        assert_eq!(config.recommendations.courses_per_skill, 2);
        assert!(config.tables.path.is_none());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_save_and_reload_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set_value("scoring.partial_threshold", "0.6").unwrap();
        config.set_value("tables.path", "/etc/skill-match/tables.toml").unwrap();
        config.set_value("output.format", "json").unwrap();
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.scoring.partial_threshold, 0.6);
        assert_eq!(reloaded.tables.path, Some(PathBuf::from("/etc/skill-match/tables.toml")));
        assert_eq!(reloaded.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = Config::default();
        let bad_number = config.set_value("scoring.exact_weight", "heavy");
        assert!(matches!(bad_number, Err(SkillMatchError::Configuration(ref msg)) if msg.contains("scoring.exact_weight")));
        assert!(config.set_value("scoring.exact_weight", "1.5").is_err());
        assert!(config.set_value("models.default", "x").is_err());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "scoring = 3").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(SkillMatchError::Configuration(_))));
    }
}
