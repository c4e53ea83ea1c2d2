//! Rule configuration loaded from TOML.
//!
//! ```toml
//! repetition_limit = 3
//! fifty_move_limit = 100
//! insufficient_material = true
//! ```
//!
//! Every field is optional and falls back to the standard rules.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The values parsed but make no sense together.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Thresholds for the draw rules that depend on game history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RulesConfig {
    /// Occurrences of one position signature that end the game.
    #[serde(default = "default_repetition_limit")]
    pub repetition_limit: usize,
    /// Half-move clock value that ends the game.
    #[serde(default = "default_fifty_move_limit")]
    pub fifty_move_limit: u32,
    /// Whether dead positions are detected at all.
    #[serde(default = "default_insufficient_material")]
    pub insufficient_material: bool,
}

fn default_repetition_limit() -> usize {
    3
}

fn default_fifty_move_limit() -> u32 {
    100
}

fn default_insufficient_material() -> bool {
    true
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            repetition_limit: default_repetition_limit(),
            fifty_move_limit: default_fifty_move_limit(),
            insufficient_material: default_insufficient_material(),
        }
    }
}

impl RulesConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RulesConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read,
    /// [`ConfigError::Parse`] for invalid TOML and [`ConfigError::Invalid`]
    /// for limits [`RulesConfig::validate`] rejects.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Rejects limits that would end every game immediately.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The starting position already counts once.
        if self.repetition_limit < 2 {
            return Err(ConfigError::Invalid(
                "repetition_limit must be at least 2".to_string(),
            ));
        }
        if self.fifty_move_limit == 0 {
            return Err(ConfigError::Invalid(
                "fifty_move_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_standard_rules() {
        let config = RulesConfig::default();
        assert_eq!(config.repetition_limit, 3);
        assert_eq!(config.fifty_move_limit, 100);
        assert!(config.insufficient_material);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(
            RulesConfig::from_toml_str("").unwrap(),
            RulesConfig::default()
        );
    }

    #[test]
    fn parse_partial_toml() {
        let config = RulesConfig::from_toml_str(
            r#"
repetition_limit = 5
insufficient_material = false
"#,
        )
        .unwrap();
        assert_eq!(config.repetition_limit, 5);
        assert_eq!(config.fifty_move_limit, 100);
        assert!(!config.insufficient_material);
    }

    #[test]
    fn parse_error() {
        let err = RulesConfig::from_toml_str("repetition_limit = \"three\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn degenerate_limits_rejected() {
        let err = RulesConfig::from_toml_str("fifty_move_limit = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("fifty_move_limit"));

        let err = RulesConfig::from_toml_str("repetition_limit = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = RulesConfig::from_toml_str("repetition_limit = 1").unwrap_err();
        assert!(err.to_string().contains("repetition_limit"));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join("teal_engine_rules_test.toml");
        std::fs::write(&path, "fifty_move_limit = 150\n").unwrap();

        let config = RulesConfig::load(&path).unwrap();
        assert_eq!(config.fifty_move_limit, 150);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn load_missing_file() {
        let err = RulesConfig::load("/nonexistent/teal/rules.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }

    #[test]
    fn serialize_roundtrip() {
        let config = RulesConfig {
            repetition_limit: 2,
            fifty_move_limit: 150,
            insufficient_material: false,
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(RulesConfig::from_toml_str(&text).unwrap(), config);
    }
}
