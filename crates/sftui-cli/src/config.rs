// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "sftui";
pub const CONFIG_PATH_ENV: &str = "SFTUI_CONFIG_PATH";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            paths: Paths::default(),
            logging: Logging::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paths {
    pub templates_root: Option<String>,
    pub silverfin_config: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned; add `version = 1` and put values under [paths] and [logging]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    /// Falls back to defaults when the file cannot be located or loaded; the
    /// note is shown in the status line.
    pub fn load_or_default(path: Result<PathBuf>) -> (Self, Option<String>) {
        let path = match path {
            Ok(path) => path,
            Err(error) => {
                return (
                    Self::default(),
                    Some(format!("Error locating config: {error:#}")),
                );
            }
        };
        match Self::load(&path) {
            Ok(config) => (config, None),
            Err(error) => (
                Self::default(),
                Some(format!("Error loading config: {error:#}")),
            ),
        }
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(level) = &self.logging.level
            && !LOG_LEVELS.contains(&level.as_str())
        {
            bail!(
                "logging.level in {} must be one of {}, got {:?}",
                path.display(),
                LOG_LEVELS.join(", "),
                level
            );
        }

        for (name, value) in [
            ("paths.templates_root", &self.paths.templates_root),
            ("paths.silverfin_config", &self.paths.silverfin_config),
            ("logging.file", &self.logging.file),
        ] {
            if value.as_deref().is_some_and(|value| value.trim().is_empty()) {
                bail!("{name} in {} must not be empty", path.display());
            }
        }
        Ok(())
    }

    pub fn templates_root(&self) -> PathBuf {
        self.paths
            .templates_root
            .as_deref()
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
    }

    /// The configured credentials file wins over `SFTUI_SILVERFIN_CONFIG`.
    pub fn silverfin_config_path(&self) -> Result<PathBuf> {
        match &self.paths.silverfin_config {
            Some(path) => Ok(PathBuf::from(path)),
            None => sftui_store::default_silverfin_config_path(),
        }
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.logging.file {
            return Ok(PathBuf::from(path));
        }

        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [logging].file to a writable log path")
        })?;
        Ok(data_root.join(APP_NAME).join("sftui.log"))
    }
}
