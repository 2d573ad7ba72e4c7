// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

pub const NO_FIRM_LABEL: &str = "No firm set";
pub const NO_HOST_LABEL: &str = "No host set";

pub const BOOL_OPTIONS: [&str; 2] = ["true", "false"];
pub const RECONCILIATION_TYPES: [&str; 3] = [
    "can_be_reconciled_without_data",
    "reconciliation_not_necessary",
    "only_reconciled_with_data",
];
pub const ENCODINGS: [&str; 3] = ["UTF-8", "ISO-8859-1", "Windows-1252"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    AccountTemplates,
    ReconciliationTexts,
    ExportFiles,
    SharedParts,
}

impl Category {
    /// Discovery order used when scanning a template tree.
    pub const ALL: [Self; 4] = [
        Self::AccountTemplates,
        Self::ReconciliationTexts,
        Self::ExportFiles,
        Self::SharedParts,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccountTemplates => "account_templates",
            Self::ReconciliationTexts => "reconciliation_texts",
            Self::ExportFiles => "export_files",
            Self::SharedParts => "shared_parts",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "account_templates" => Some(Self::AccountTemplates),
            "reconciliation_texts" => Some(Self::ReconciliationTexts),
            "export_files" => Some(Self::ExportFiles),
            "shared_parts" => Some(Self::SharedParts),
            _ => None,
        }
    }

    /// Maps the singular `type` used inside a shared part's `used_in` list.
    pub fn from_usage_type(value: &str) -> Option<Self> {
        match value {
            "account_template" => Some(Self::AccountTemplates),
            "reconciliation_text" => Some(Self::ReconciliationTexts),
            "export_file" => Some(Self::ExportFiles),
            _ => None,
        }
    }

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::AccountTemplates => "AT",
            Self::ReconciliationTexts => "RT",
            Self::ExportFiles => "EF",
            Self::SharedParts => "SP",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::AccountTemplates => "Account Template",
            Self::ReconciliationTexts => "Reconciliation Text",
            Self::ExportFiles => "Export File",
            Self::SharedParts => "Shared Part",
        }
    }
}

/// Declared type of a whitelisted config key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    ReconciliationType,
    Encoding,
    Text,
}

impl ValueKind {
    /// Finite option set for in-place editing, `None` when the kind is free-form.
    pub const fn options(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Bool => Some(&BOOL_OPTIONS),
            Self::ReconciliationType => Some(&RECONCILIATION_TYPES),
            Self::Encoding => Some(&ENCODINGS),
            Self::Text => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigKey {
    Public,
    ReconciliationType,
    VirtualAccountNumber,
    AllowDuplicateReconciliation,
    IsActive,
    UseFullWidth,
    DownloadableAsDocx,
    Encoding,
    Published,
    HideCode,
    ExternallyManaged,
}

impl ConfigKey {
    /// Display order of the config group in the details pane.
    pub const ALL: [Self; 11] = [
        Self::Public,
        Self::ReconciliationType,
        Self::VirtualAccountNumber,
        Self::AllowDuplicateReconciliation,
        Self::IsActive,
        Self::UseFullWidth,
        Self::DownloadableAsDocx,
        Self::Encoding,
        Self::Published,
        Self::HideCode,
        Self::ExternallyManaged,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::ReconciliationType => "reconciliation_type",
            Self::VirtualAccountNumber => "virtual_account_number",
            Self::AllowDuplicateReconciliation => "allow_duplicate_reconciliation",
            Self::IsActive => "is_active",
            Self::UseFullWidth => "use_full_width",
            Self::DownloadableAsDocx => "downloadable_as_docx",
            Self::Encoding => "encoding",
            Self::Published => "published",
            Self::HideCode => "hide_code",
            Self::ExternallyManaged => "externally_managed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }

    pub const fn kind(self) -> ValueKind {
        match self {
            Self::Public
            | Self::AllowDuplicateReconciliation
            | Self::IsActive
            | Self::UseFullWidth
            | Self::DownloadableAsDocx
            | Self::Published
            | Self::HideCode
            | Self::ExternallyManaged => ValueKind::Bool,
            Self::ReconciliationType => ValueKind::ReconciliationType,
            Self::Encoding => ValueKind::Encoding,
            Self::VirtualAccountNumber => ValueKind::Text,
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Text(String),
    /// Anything else decoded from the document, kept verbatim.
    Other(Value),
}

impl ConfigValue {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Bool(flag) => Self::Bool(flag),
            Value::String(text) => Self::Text(text),
            other => Self::Other(other),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Text(text) => Value::String(text.clone()),
            Self::Other(value) => value.clone(),
        }
    }

    /// Typed value for an option picked from `kind`'s option set.
    pub fn for_kind(kind: ValueKind, option: &str) -> Self {
        match kind {
            ValueKind::Bool => Self::Bool(option == "true"),
            ValueKind::ReconciliationType | ValueKind::Encoding | ValueKind::Text => {
                Self::Text(option.to_owned())
            }
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Text(text) => f.write_str(text),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedPartUsage {
    pub kind: String,
    pub handle: String,
}

/// Decoded per-template `config.json`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct TemplateConfig {
    fields: BTreeMap<ConfigKey, ConfigValue>,
    text_parts: BTreeMap<String, String>,
    used_in: Vec<SharedPartUsage>,
    extra: BTreeMap<String, Value>,
}

impl From<Map<String, Value>> for TemplateConfig {
    fn from(document: Map<String, Value>) -> Self {
        let mut config = Self::default();
        for (key, value) in document {
            if let Some(config_key) = ConfigKey::parse(&key) {
                config.fields.insert(config_key, ConfigValue::from_json(value));
                continue;
            }
            match (key.as_str(), value) {
                ("text_parts", Value::Object(parts)) => {
                    config.text_parts = parts
                        .into_iter()
                        .filter_map(|(name, path)| match path {
                            Value::String(path) => Some((name, path)),
                            _ => None,
                        })
                        .collect();
                }
                ("used_in", Value::Array(entries)) => {
                    config.used_in = entries.iter().filter_map(parse_usage).collect();
                }
                (_, value) => {
                    config.extra.insert(key, value);
                }
            }
        }
        config
    }
}

fn parse_usage(entry: &Value) -> Option<SharedPartUsage> {
    let kind = entry.get("type")?.as_str()?;
    let handle = entry.get("handle")?.as_str()?;
    Some(SharedPartUsage {
        kind: kind.to_owned(),
        handle: handle.to_owned(),
    })
}

impl TemplateConfig {
    pub fn get(&self, key: ConfigKey) -> Option<&ConfigValue> {
        self.fields.get(&key)
    }

    pub fn set(&mut self, key: ConfigKey, value: ConfigValue) {
        self.fields.insert(key, value);
    }

    pub fn text_parts(&self) -> &BTreeMap<String, String> {
        &self.text_parts
    }

    pub fn has_text_part(&self, name: &str) -> bool {
        self.text_parts.contains_key(name)
    }

    pub fn rename_text_part(&mut self, old_name: &str, new_name: &str, new_path: &str) {
        self.text_parts.remove(old_name);
        self.text_parts.insert(new_name.to_owned(), new_path.to_owned());
    }

    pub fn used_in(&self) -> &[SharedPartUsage] {
        &self.used_in
    }

    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub path: PathBuf,
    pub category: Category,
    pub config: TemplateConfig,
}

impl Template {
    /// `<category>/<name>`, the key shared parts use to reference a template.
    pub fn handle(&self) -> String {
        format!("{}/{}", self.category.as_str(), self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirmKind {
    Firm,
    Partner,
}

impl FirmKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Firm => "firm",
            Self::Partner => "partner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmOption {
    pub id: String,
    pub name: String,
    pub kind: FirmKind,
}

impl FirmOption {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}

/// Firm and host read from the persisted credentials file at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionInfo {
    pub firm: Option<String>,
    pub host: String,
}
