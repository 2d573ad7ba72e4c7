// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Flattens a template's config keys, text parts and shared-part usages into
//! the single navigable list shown in the details pane.
//!
//! Rendering, cursor movement and edit activation all go through
//! [`DetailsFieldComposer`]; nothing else computes field counts or maps an
//! index back to a field.

use crate::{Category, ConfigKey, SharedPartUsageIndex, Template, wrap_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    ConfigField,
    TextPart,
    SharedPart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailField {
    Config(ConfigKey),
    TextPart { name: String, path: String },
    SharedPart(String),
}

impl DetailField {
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Config(_) => FieldKind::ConfigField,
            Self::TextPart { .. } => FieldKind::TextPart,
            Self::SharedPart(_) => FieldKind::SharedPart,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Config(key) => key.as_str(),
            Self::TextPart { name, .. } => name,
            Self::SharedPart(name) => name,
        }
    }

    /// Options offered by the in-place editor; `None` means not editable in place.
    pub const fn edit_options(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Config(key) => key.kind().options(),
            Self::TextPart { .. } | Self::SharedPart(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field: DetailField,
    pub value: String,
    pub editable: bool,
}

impl FieldDescriptor {
    fn new(field: DetailField, value: String) -> Self {
        let editable = field.edit_options().is_some();
        Self {
            field,
            value,
            editable,
        }
    }

    pub const fn kind(&self) -> FieldKind {
        self.field.kind()
    }

    pub fn label(&self) -> &str {
        self.field.label()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DetailsFieldComposer<'a> {
    usage: &'a SharedPartUsageIndex,
}

impl<'a> DetailsFieldComposer<'a> {
    pub const fn new(usage: &'a SharedPartUsageIndex) -> Self {
        Self { usage }
    }

    pub fn compose(&self, template: &Template) -> Vec<FieldDescriptor> {
        let mut fields: Vec<FieldDescriptor> = ConfigKey::ALL
            .into_iter()
            .filter_map(|key| {
                let value = template.config.get(key)?;
                Some(FieldDescriptor::new(
                    DetailField::Config(key),
                    value.to_string(),
                ))
            })
            .collect();

        if template.category == Category::SharedParts {
            return fields;
        }

        let mut text_parts: Vec<(&String, &String)> =
            template.config.text_parts().iter().collect();
        text_parts.sort_by(|left, right| left.0.cmp(right.0));
        fields.extend(text_parts.into_iter().map(|(name, path)| {
            FieldDescriptor::new(
                DetailField::TextPart {
                    name: name.clone(),
                    path: path.clone(),
                },
                path.clone(),
            )
        }));

        let mut shared_parts = self.usage.usages(template).to_vec();
        shared_parts.sort();
        fields.extend(shared_parts.into_iter().map(|name| {
            FieldDescriptor::new(DetailField::SharedPart(name), String::new())
        }));

        fields
    }

    pub fn count(&self, template: &Template) -> usize {
        self.compose(template).len()
    }

    pub fn field_at(&self, template: &Template, index: usize) -> Option<FieldDescriptor> {
        self.compose(template).into_iter().nth(index)
    }

    /// Index reachable from `current`, or 0 once the list has emptied out.
    pub fn clamp(&self, template: &Template, current: usize) -> usize {
        current.min(self.count(template).saturating_sub(1))
    }
}

pub fn navigate(current: usize, delta: isize, count: usize) -> usize {
    wrap_index(current, delta, count)
}

#[cfg(test)]
mod tests {
    use super::{DetailField, DetailsFieldComposer, FieldKind, navigate};
    use crate::{Category, ConfigKey, SharedPartUsageIndex, Template, TemplateConfig};
    use serde_json::json;
    use std::path::PathBuf;

    fn template(category: Category, name: &str, config: serde_json::Value) -> Template {
        Template {
            name: name.to_owned(),
            path: PathBuf::from(category.as_str()).join(name),
            category,
            config: serde_json::from_value::<TemplateConfig>(config).unwrap_or_default(),
        }
    }

    #[test]
    fn reconciliation_text_with_one_text_part_has_two_fields() {
        let usage = SharedPartUsageIndex::default();
        let composer = DetailsFieldComposer::new(&usage);
        let rt = template(
            Category::ReconciliationTexts,
            "rt_1",
            json!({
                "reconciliation_type": "can_be_reconciled_without_data",
                "text_parts": {"part_1": "text_parts/part_1.liquid"}
            }),
        );

        assert_eq!(composer.count(&rt), 2);
        let first = composer.field_at(&rt, 0).map(|field| field.field);
        assert_eq!(first, Some(DetailField::Config(ConfigKey::ReconciliationType)));
        let second = composer.field_at(&rt, 1);
        assert_eq!(second.as_ref().map(|field| field.label()), Some("part_1"));
        assert_eq!(second.map(|field| field.kind()), Some(FieldKind::TextPart));
        assert!(composer.field_at(&rt, 2).is_none());

        assert_eq!(navigate(0, 1, 2), 1);
        assert_eq!(navigate(1, 1, 2), 0);
        assert_eq!(navigate(0, -1, 2), 1);
        assert_eq!(navigate(1, -1, 2), 0);
    }

    #[test]
    fn groups_follow_whitelist_then_sorted_parts_then_sorted_usages() {
        let templates = vec![
            template(
                Category::AccountTemplates,
                "at_1",
                json!({
                    "encoding": "UTF-8",
                    "public": true,
                    "virtual_account_number": "123",
                    "text_parts": {"b": "b.liquid", "B": "B.liquid", "a": "a.liquid"},
                    "unknown_key": 3
                }),
            ),
            template(
                Category::SharedParts,
                "zeta",
                json!({"used_in": [{"type": "account_template", "handle": "at_1"}]}),
            ),
            template(
                Category::SharedParts,
                "alpha",
                json!({"used_in": [{"type": "account_template", "handle": "at_1"}]}),
            ),
        ];
        let usage = SharedPartUsageIndex::build(&templates);
        let composer = DetailsFieldComposer::new(&usage);

        let labels: Vec<String> = composer
            .compose(&templates[0])
            .iter()
            .map(|field| field.label().to_owned())
            .collect();
        assert_eq!(
            labels,
            vec![
                "public",
                "virtual_account_number",
                "encoding",
                "B",
                "a",
                "b",
                "alpha",
                "zeta"
            ]
        );
    }

    #[test]
    fn editability_follows_option_sets() {
        let usage = SharedPartUsageIndex::default();
        let composer = DetailsFieldComposer::new(&usage);
        let at = template(
            Category::AccountTemplates,
            "at_1",
            json!({"public": false, "virtual_account_number": "1", "text_parts": {"p": "p"}}),
        );
        let editable: Vec<bool> = composer
            .compose(&at)
            .iter()
            .map(|field| field.editable)
            .collect();
        assert_eq!(editable, vec![true, false, false]);
    }

    #[test]
    fn shared_parts_only_show_config_fields() {
        let templates = vec![
            template(
                Category::SharedParts,
                "sp_1",
                json!({
                    "hide_code": true,
                    "text_parts": {"ignored": "x"},
                    "used_in": [{"type": "shared_part", "handle": "sp_1"}]
                }),
            ),
            template(
                Category::SharedParts,
                "sp_2",
                json!({"used_in": [{"type": "export_file", "handle": "sp_1"}]}),
            ),
        ];
        let usage = SharedPartUsageIndex::build(&templates);
        let composer = DetailsFieldComposer::new(&usage);
        assert_eq!(composer.count(&templates[0]), 1);
        assert_eq!(composer.count(&templates[1]), 0);
    }

    #[test]
    fn count_equals_sum_of_groups_and_navigation_cycles() {
        let templates = vec![
            template(
                Category::ExportFiles,
                "ef_1",
                json!({
                    "published": false,
                    "encoding": "ISO-8859-1",
                    "downloadable_as_docx": true,
                    "text_parts": {"one": "1", "two": "2"}
                }),
            ),
            template(
                Category::SharedParts,
                "sp_1",
                json!({"used_in": [{"type": "export_file", "handle": "ef_1"}]}),
            ),
        ];
        let usage = SharedPartUsageIndex::build(&templates);
        let composer = DetailsFieldComposer::new(&usage);
        let count = composer.count(&templates[0]);
        assert_eq!(count, 3 + 2 + 1);

        for start in 0..count {
            let mut index = start;
            for _ in 0..count {
                index = navigate(index, 1, count);
            }
            assert_eq!(index, start);
        }
    }

    #[test]
    fn empty_template_has_no_fields_and_navigation_is_noop() {
        let usage = SharedPartUsageIndex::default();
        let composer = DetailsFieldComposer::new(&usage);
        let empty = template(Category::ExportFiles, "ef_empty", json!({}));
        assert_eq!(composer.count(&empty), 0);
        assert_eq!(composer.clamp(&empty, 4), 0);
        assert_eq!(navigate(0, 1, 0), 0);
        assert_eq!(navigate(0, -5, 0), 0);
    }
}
