// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Reads and edits the Silverfin CLI credentials document.
//!
//! The document is a JSON object. `host` is the API host, `defaultFirmIDs`
//! maps a repository directory name to a firm id, every top-level object
//! carrying a `firmName` is a firm, and `partnerCredentials.<id>.name`
//! names a partner. Everything else is preserved on write.

use crate::{read_object, write_object};
use anyhow::{Result, anyhow, bail};
use serde_json::{Map, Value};
use sftui_app::{FirmKind, FirmOption, SessionInfo};
use std::env;
use std::path::{Path, PathBuf};

pub const SILVERFIN_CONFIG_ENV: &str = "SFTUI_SILVERFIN_CONFIG";

const HOST_KEY: &str = "host";
const DEFAULT_FIRMS_KEY: &str = "defaultFirmIDs";
const FIRM_NAME_KEY: &str = "firmName";
const PARTNERS_KEY: &str = "partnerCredentials";

pub fn default_silverfin_config_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os(SILVERFIN_CONFIG_ENV) {
        return Ok(PathBuf::from(override_path));
    }
    let home = dirs::home_dir().ok_or_else(|| {
        anyhow!("cannot resolve home directory; set {SILVERFIN_CONFIG_ENV} to the Silverfin config path")
    })?;
    Ok(home.join(".silverfin").join("config.json"))
}

#[derive(Debug, Clone)]
pub struct SilverfinConfig {
    path: PathBuf,
    repo_name: String,
}

impl SilverfinConfig {
    pub fn new(path: impl Into<PathBuf>, repo_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            repo_name: repo_name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_session(&self) -> Result<SessionInfo> {
        let document = read_object(&self.path)?;
        let host = document
            .get(HOST_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let firm = default_firm_id(&document, &self.repo_name).and_then(|id| {
            let name = document.get(&id)?.get(FIRM_NAME_KEY)?.as_str()?;
            Some(format!("{name} ({id})"))
        });
        Ok(SessionInfo { firm, host })
    }

    /// Firms first, then partners; each group ordered by id.
    pub fn firm_options(&self) -> Result<Vec<FirmOption>> {
        let document = read_object(&self.path)?;
        let mut options: Vec<FirmOption> = document
            .iter()
            .filter_map(|(id, entry)| {
                let name = entry.get(FIRM_NAME_KEY)?.as_str()?;
                Some(FirmOption {
                    id: id.clone(),
                    name: name.to_owned(),
                    kind: FirmKind::Firm,
                })
            })
            .collect();
        options.sort_by(|left, right| left.id.cmp(&right.id));

        let mut partners: Vec<FirmOption> = document
            .get(PARTNERS_KEY)
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
            .filter_map(|(id, entry)| {
                let name = entry.get("name")?.as_str()?;
                Some(FirmOption {
                    id: id.clone(),
                    name: name.to_owned(),
                    kind: FirmKind::Partner,
                })
            })
            .collect();
        partners.sort_by(|left, right| left.id.cmp(&right.id));
        options.extend(partners);
        Ok(options)
    }

    pub fn set_host(&self, host: &str) -> Result<()> {
        let mut document = read_object(&self.path)?;
        document.insert(HOST_KEY.to_owned(), Value::String(host.to_owned()));
        write_object(&self.path, &document)
    }

    pub fn set_default_firm(&self, firm_id: &str) -> Result<()> {
        let mut document = read_object(&self.path)?;
        let defaults = document
            .entry(DEFAULT_FIRMS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(defaults) = defaults.as_object_mut() else {
            bail!("{DEFAULT_FIRMS_KEY} in {} is not an object", self.path.display());
        };
        defaults.insert(self.repo_name.clone(), Value::String(firm_id.to_owned()));
        write_object(&self.path, &document)
    }
}

/// Ids may be written as strings or bare numbers.
fn default_firm_id(document: &Map<String, Value>, repo_name: &str) -> Option<String> {
    match document.get(DEFAULT_FIRMS_KEY)?.get(repo_name)? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
