// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{read_object, write_object};
use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Map, Value};
use sftui_app::{Category, ConfigKey, ConfigValue, Template, TemplateConfig, TemplateRepository};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Template tree rooted at a market repository checkout.
#[derive(Debug, Clone)]
pub struct TemplateDirectory {
    root: PathBuf,
}

impl TemplateDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn scan_category(&self, category: Category, templates: &mut Vec<Template>) {
        let category_dir = self.root.join(category.as_str());
        if !category_dir.is_dir() {
            return;
        }

        for entry in WalkDir::new(&category_dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(%error, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || entry.file_name() != CONFIG_FILE_NAME {
                continue;
            }
            let Some(template_dir) = entry.path().parent() else {
                continue;
            };
            let Some(name) = template_dir.file_name() else {
                continue;
            };
            templates.push(Template {
                name: name.to_string_lossy().into_owned(),
                path: template_dir.to_path_buf(),
                category,
                config: load_config(entry.path()),
            });
        }
    }
}

impl TemplateRepository for TemplateDirectory {
    fn load_templates(&self) -> Result<Vec<Template>> {
        if !self.root.is_dir() {
            bail!("template root {} is not a directory", self.root.display());
        }
        let mut templates = Vec::new();
        for category in Category::ALL {
            self.scan_category(category, &mut templates);
        }
        debug!(count = templates.len(), root = %self.root.display(), "templates loaded");
        Ok(templates)
    }
}

/// Empty or undecodable documents load as an empty config.
fn load_config(path: &Path) -> TemplateConfig {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            warn!(path = %path.display(), %error, "cannot read template config");
            return TemplateConfig::default();
        }
    };
    if raw.trim().is_empty() {
        return TemplateConfig::default();
    }
    match serde_json::from_str::<Map<String, Value>>(&raw) {
        Ok(document) => TemplateConfig::from(document),
        Err(error) => {
            warn!(path = %path.display(), %error, "cannot parse template config");
            TemplateConfig::default()
        }
    }
}

fn config_path(template_dir: &Path) -> PathBuf {
    template_dir.join(CONFIG_FILE_NAME)
}

pub(crate) fn update_field(template_dir: &Path, key: ConfigKey, value: &ConfigValue) -> Result<()> {
    let path = config_path(template_dir);
    let mut document = read_object(&path)?;
    document.insert(key.as_str().to_owned(), value.to_json());
    write_object(&path, &document)
}

pub(crate) fn update_text_part(
    template_dir: &Path,
    old_name: &str,
    new_name: &str,
    new_path: &str,
) -> Result<()> {
    let path = config_path(template_dir);
    let mut document = read_object(&path)?;
    let parts = document
        .get_mut("text_parts")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| anyhow!("{} has no text_parts object", path.display()))?;
    if parts.remove(old_name).is_none() {
        bail!("text part {old_name:?} not found in {}", path.display());
    }
    parts.insert(new_name.to_owned(), Value::String(new_path.to_owned()));
    write_object(&path, &document)
        .with_context(|| format!("rename text part {old_name:?} to {new_name:?}"))
}
