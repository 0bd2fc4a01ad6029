// Copyright (C) 2024 - 2025 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Read from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "linscan.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read \"{}\": {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("invalid configuration in \"{}\": {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigRoot {
    pub allocator: ConfigSectionAllocator,
    pub log: ConfigSectionLog,
    pub output: ConfigSectionOutput,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigSectionAllocator {
    /// Validated into an `AllocatorConfig` later, so a negative count is
    /// reported as a configuration error instead of a parse error.
    pub registers: i64,
}

impl Default for ConfigSectionAllocator {
    fn default() -> Self {
        Self { registers: 3 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigSectionLog {
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigSectionOutput {
    pub color: bool,
}

impl Default for ConfigSectionOutput {
    fn default() -> Self {
        Self { color: true }
    }
}

impl ConfigRoot {
    /// Loads `path`, or the default file if it exists, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.is_file() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let contents = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Io { path: path.clone(), source })?;

        let config = Self::parse(&contents)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;

        debug!("Loaded configuration from {}: {config:?}", path.display());
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}
