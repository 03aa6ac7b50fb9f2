//! Optional TOML configuration layered over the built-in defaults.

use std::{
    fs,
    path::{Path, PathBuf},
};

use bomber_core::{Rules, RulesError};
use bomber_system_ai::Config as AiConfig;
use serde::Deserialize;
use thiserror::Error;

/// Settings read from a config file; every section is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) seed: Option<u64>,
    pub(crate) rules: Rules,
    pub(crate) ai: AiConfig,
}

/// Errors raised while loading a config file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("config file {} contains invalid rules", path.display())]
    InvalidRules {
        path: PathBuf,
        #[source]
        source: RulesError,
    },
}

/// Loads the config file at `path`, or the defaults when no path is given.
pub(crate) fn load(path: Option<&Path>) -> Result<GameConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, path)
}

fn parse(contents: &str, path: &Path) -> Result<GameConfig, ConfigError> {
    let config: GameConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config
        .rules
        .validate()
        .map_err(|source| ConfigError::InvalidRules {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(config)
}
