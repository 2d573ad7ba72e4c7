// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod silverfin;
mod templates;

pub use silverfin::{SILVERFIN_CONFIG_ENV, SilverfinConfig, default_silverfin_config_path};
pub use templates::{CONFIG_FILE_NAME, TemplateDirectory};

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};
use sftui_app::{ConfigKey, ConfigStore, ConfigValue, FirmOption, SessionInfo};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// [`ConfigStore`] over template `config.json` files and the Silverfin
/// credentials document.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    silverfin: SilverfinConfig,
}

impl FileConfigStore {
    pub fn new(silverfin: SilverfinConfig) -> Self {
        Self { silverfin }
    }

    pub fn silverfin(&self) -> &SilverfinConfig {
        &self.silverfin
    }

    /// Session for the header, plus a note when the credentials could not be read.
    pub fn load_session_or_default(&self) -> (SessionInfo, Option<String>) {
        let path = self.silverfin.path();
        match self.silverfin.load_session() {
            Ok(session) => (session, None),
            Err(error) if is_not_found(&error) => {
                info!(path = %path.display(), "no Silverfin config");
                (
                    SessionInfo::default(),
                    Some("No Silverfin config found".to_owned()),
                )
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %format!("{error:#}"),
                    "cannot load Silverfin config"
                );
                (
                    SessionInfo::default(),
                    Some(format!("Error parsing Silverfin config: {error:#}")),
                )
            }
        }
    }
}

impl ConfigStore for FileConfigStore {
    fn update_field(
        &mut self,
        template_path: &Path,
        key: ConfigKey,
        value: &ConfigValue,
    ) -> Result<()> {
        templates::update_field(template_path, key, value)
    }

    fn update_text_part(
        &mut self,
        template_path: &Path,
        old_name: &str,
        new_name: &str,
        new_path: &str,
    ) -> Result<()> {
        templates::update_text_part(template_path, old_name, new_name, new_path)
    }

    fn set_host(&mut self, host: &str) -> Result<()> {
        self.silverfin.set_host(host)
    }

    fn set_default_firm(&mut self, firm_id: &str) -> Result<()> {
        self.silverfin.set_default_firm(firm_id)
    }

    fn load_firm_options(&mut self) -> Result<Vec<FirmOption>> {
        self.silverfin.firm_options()
    }
}

/// Name under which `defaultFirmIDs` records this checkout's firm.
pub fn repo_name(templates_root: &Path) -> Result<String> {
    let resolved = templates_root
        .canonicalize()
        .with_context(|| format!("resolve {}", templates_root.display()))?;
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} has no directory name", resolved.display()))
}

pub(crate) fn read_object(path: &Path) -> Result<Map<String, Value>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    match value {
        Value::Object(document) => Ok(document),
        _ => Err(anyhow!("{} does not hold a JSON object", path.display())),
    }
}

/// Stages the document next to `path` and renames it into place, so a failed
/// write leaves the previous file intact.
pub(crate) fn write_object(path: &Path, document: &Map<String, Value>) -> Result<()> {
    let encoded = serde_json::to_string_pretty(document)
        .with_context(|| format!("encode {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("stage write in {}", dir.display()))?;
    staged
        .write_all(encoded.as_bytes())
        .with_context(|| format!("write {}", path.display()))?;
    staged
        .persist(path)
        .map_err(|error| error.error)
        .with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

fn is_not_found(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == ErrorKind::NotFound)
}
