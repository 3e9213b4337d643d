use std::path::{Path, PathBuf};

use crate::engine::Rules;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("target_tile must be a power of two >= 4, got {0}")]
    InvalidTargetTile(u32),
    #[error("four_probability must be within [0, 1], got {0}")]
    InvalidFourProbability(f64),
}

#[derive(Clone, Debug, PartialEq, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rules: Rules,
    #[serde(default)]
    pub storage: Storage,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Storage {
    /// JSON file holding the saved game. None disables persistence.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
    #[serde(default = "defaults::key")]
    pub key: String,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            state_file: None,
            key: defaults::key(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let target = self.rules.target_tile;
        if target < 4 || !target.is_power_of_two() {
            return Err(ConfigError::InvalidTargetTile(target));
        }
        let p = self.rules.four_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::InvalidFourProbability(p));
        }
        Ok(())
    }
}

mod defaults {
    pub fn key() -> String {
        "twenty48".to_string()
    }
}
