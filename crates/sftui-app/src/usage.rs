// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Category, Template};
use std::collections::HashMap;

/// Which shared parts reference each template, keyed by `<category>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SharedPartUsageIndex {
    by_handle: HashMap<String, Vec<String>>,
}

impl SharedPartUsageIndex {
    pub fn build(templates: &[Template]) -> Self {
        let mut by_handle: HashMap<String, Vec<String>> = HashMap::new();
        for shared_part in templates
            .iter()
            .filter(|template| template.category == Category::SharedParts)
        {
            for usage in shared_part.config.used_in() {
                let Some(category) = Category::from_usage_type(&usage.kind) else {
                    continue;
                };
                by_handle
                    .entry(format!("{}/{}", category.as_str(), usage.handle))
                    .or_default()
                    .push(shared_part.name.clone());
            }
        }
        Self { by_handle }
    }

    pub fn usages(&self, template: &Template) -> &[String] {
        self.by_handle
            .get(&template.handle())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::SharedPartUsageIndex;
    use crate::{Category, Template, TemplateConfig};
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
    fn build_maps_usage_types_to_template_handles() {
        let templates = vec![
            template(Category::ReconciliationTexts, "rt_1", json!({})),
            template(
                Category::SharedParts,
                "sp_header",
                json!({"used_in": [
                    {"type": "reconciliation_text", "handle": "rt_1"},
                    {"type": "export_file", "handle": "ef_1"},
                    {"type": "unknown", "handle": "rt_1"}
                ]}),
            ),
            template(
                Category::SharedParts,
                "sp_footer",
                json!({"used_in": [{"type": "reconciliation_text", "handle": "rt_1"}]}),
            ),
        ];

        let index = SharedPartUsageIndex::build(&templates);
        assert_eq!(index.len(), 2);
        assert_eq!(index.usages(&templates[0]), ["sp_header", "sp_footer"]);
        assert!(index.usages(&templates[1]).is_empty());
    }

    #[test]
    fn non_shared_templates_do_not_contribute_usages() {
        let templates = vec![template(
            Category::AccountTemplates,
            "at_1",
            json!({"used_in": [{"type": "account_template", "handle": "at_1"}]}),
        )];
        assert!(SharedPartUsageIndex::build(&templates).is_empty());
    }
}
