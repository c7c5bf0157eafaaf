//! Layered configuration loading using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CSV_SURVEY_*` prefix, `__` as separator)
//! 2. The `--config` file, or `./csv-survey.toml` when present
//! 3. Built-in defaults
//!
//! Figment maps `CSV_SURVEY_OUTPUT__FORMAT` -> `output.format`,
//! `CSV_SURVEY_SURVEY__OPTION_DELIMITER` -> `survey.option_delimiter`, etc.
//! `CSV_SURVEY_LOG` is the log filter and is not part of the config tree.

use std::path::{Path, PathBuf};

use csv_survey::{StoreFormat, SurveySettings};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "csv-survey.toml";
pub const ENV_PREFIX: &str = "CSV_SURVEY_";

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// An explicitly requested config file is not there.
    #[error("Configuration file '{}' does not exist", .0.display())]
    MissingFile(PathBuf),

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_level() -> String {
    "warn".to_string()
}

/// Where and how responses are saved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory for timestamped response files.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    #[serde(default)]
    pub format: StoreFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            format: StoreFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogConfig {
    /// Filter directive used when neither `CSV_SURVEY_LOG` nor -v/-q is given.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub survey: SurveySettings,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl CliConfig {
    /// Load and check configuration from all sources.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(explicit)?.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::MissingFile(path.into())),
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    figment = figment.merge(Toml::file(local));
                }
            }
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__").ignore(&["log"])))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = self.survey.rating_range;
        if min > max {
            return Err(ConfigError::InvalidValue {
                field: "survey.rating_range".into(),
                reason: format!("minimum {min} is greater than maximum {max}"),
            });
        }
        if self.survey.option_delimiter.is_whitespace() {
            return Err(ConfigError::InvalidValue {
                field: "survey.option_delimiter".into(),
                reason: "must not be whitespace".into(),
            });
        }
        Ok(())
    }
}
