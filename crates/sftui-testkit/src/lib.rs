// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use sftui_app::{
    Category, ConfigKey, ConfigStore, ConfigValue, FirmKind, FirmOption, StoreWrite, Template,
    TemplateConfig,
};
use std::fs;
use std::path::{Path, PathBuf};

pub fn template(category: Category, name: &str, config: Value) -> Template {
    let config = match config {
        Value::Object(document) => TemplateConfig::from(document),
        _ => TemplateConfig::default(),
    };
    Template {
        name: name.to_owned(),
        path: PathBuf::from(category.as_str()).join(name),
        category,
        config,
    }
}

/// Three templates per category in discovery order.
pub fn sample_templates() -> Vec<Template> {
    let mut templates = Vec::with_capacity(12);
    for index in 1..=3 {
        templates.push(template(
            Category::AccountTemplates,
            &format!("account_{index}"),
            json!({
                "public": index % 2 == 0,
                "virtual_account_number": format!("{index}00"),
                "text_parts": {"main": format!("text_parts/main_{index}.liquid")}
            }),
        ));
    }
    for index in 1..=3 {
        templates.push(template(
            Category::ReconciliationTexts,
            &format!("reconciliation_{index}"),
            json!({
                "reconciliation_type": "can_be_reconciled_without_data",
                "is_active": true,
                "text_parts": {"part_1": "text_parts/part_1.liquid"}
            }),
        ));
    }
    for index in 1..=3 {
        templates.push(template(
            Category::ExportFiles,
            &format!("export_{index}"),
            json!({"encoding": "UTF-8", "published": false}),
        ));
    }
    for index in 1..=3 {
        templates.push(template(
            Category::SharedParts,
            &format!("shared_{index}"),
            json!({
                "hide_code": false,
                "used_in": [
                    {"type": "reconciliation_text", "handle": "reconciliation_1"},
                    {"type": "export_file", "handle": format!("export_{index}")}
                ]
            }),
        ));
    }
    templates
}

pub fn sample_firm_options() -> Vec<FirmOption> {
    vec![
        FirmOption {
            id: "1001".to_owned(),
            name: "Acme Accounting".to_owned(),
            kind: FirmKind::Firm,
        },
        FirmOption {
            id: "2002".to_owned(),
            name: "Northwind Partners".to_owned(),
            kind: FirmKind::Partner,
        },
    ]
}

/// ConfigStore double that records every accepted write.
///
/// With `fail_with` set, every call fails with that message and nothing is
/// recorded.
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    pub writes: Vec<StoreWrite>,
    pub firm_options: Vec<FirmOption>,
    pub firm_loads: usize,
    pub fail_with: Option<String>,
}

impl RecordingStore {
    pub fn with_firms(firm_options: Vec<FirmOption>) -> Self {
        Self {
            firm_options,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_owned()),
            ..Self::default()
        }
    }

    fn accept(&mut self, write: StoreWrite) -> Result<()> {
        if let Some(message) = &self.fail_with {
            bail!("{message}");
        }
        self.writes.push(write);
        Ok(())
    }
}

impl ConfigStore for RecordingStore {
    fn update_field(
        &mut self,
        template_path: &Path,
        key: ConfigKey,
        value: &ConfigValue,
    ) -> Result<()> {
        self.accept(StoreWrite::Field {
            template: template_path.to_path_buf(),
            key,
            value: value.clone(),
        })
    }

    fn update_text_part(
        &mut self,
        template_path: &Path,
        old_name: &str,
        new_name: &str,
        new_path: &str,
    ) -> Result<()> {
        self.accept(StoreWrite::TextPart {
            template: template_path.to_path_buf(),
            old_name: old_name.to_owned(),
            new_name: new_name.to_owned(),
            new_path: new_path.to_owned(),
        })
    }

    fn set_host(&mut self, host: &str) -> Result<()> {
        self.accept(StoreWrite::Host(host.to_owned()))
    }

    fn set_default_firm(&mut self, firm_id: &str) -> Result<()> {
        self.accept(StoreWrite::DefaultFirm(firm_id.to_owned()))
    }

    fn load_firm_options(&mut self) -> Result<Vec<FirmOption>> {
        self.firm_loads += 1;
        if let Some(message) = &self.fail_with {
            bail!("{message}");
        }
        Ok(self.firm_options.clone())
    }
}

/// A template tree laid out on disk inside a temporary directory.
pub struct TemplateTree {
    dir: tempfile::TempDir,
}

impl TemplateTree {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `<root>/<category>/<name>/config.json` and returns the template dir.
    pub fn add(&self, category: Category, name: &str, config: &Value) -> Result<PathBuf> {
        let contents = serde_json::to_string_pretty(config).context("encode template config")?;
        self.add_raw(category, name, &contents)
    }

    pub fn add_raw(&self, category: Category, name: &str, contents: &str) -> Result<PathBuf> {
        let template_dir = self.root().join(category.as_str()).join(name);
        fs::create_dir_all(&template_dir)
            .with_context(|| format!("create {}", template_dir.display()))?;
        let config_path = template_dir.join("config.json");
        fs::write(&config_path, contents)
            .with_context(|| format!("write {}", config_path.display()))?;
        Ok(template_dir)
    }

    pub fn read_config(&self, template_dir: &Path) -> Result<Value> {
        let config_path = template_dir.join("config.json");
        let raw = fs::read_to_string(&config_path)
            .with_context(|| format!("read {}", config_path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse {}", config_path.display()))
    }
}

/// A credentials document with two firms, one partner and a default firm for `repo`.
pub fn silverfin_config_document(repo: &str) -> Value {
    json!({
        "host": "https://live.getsilverfin.com",
        "defaultFirmIDs": {repo: "2001"},
        "2001": {"firmName": "Beta Books", "accessToken": "token-b"},
        "1001": {"firmName": "Acme Accounting", "accessToken": "token-a"},
        "partnerCredentials": {
            "77": {"name": "Partner Seven", "token": "p-token"}
        }
    })
}
