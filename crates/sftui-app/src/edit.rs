// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ConfigKey, ConfigStore, ConfigValue, Template, wrap_index};
use anyhow::Result;

/// Transient state of an enumerated-option edit on one config key.
///
/// Navigation only moves `selected`; the template is written on confirm
/// (after the store accepts the value) and restored on cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct InPlaceEditSession {
    pub template: usize,
    pub key: ConfigKey,
    pub options: &'static [&'static str],
    pub selected: usize,
    pub original: ConfigValue,
}

impl InPlaceEditSession {
    /// `None` when the key is absent or has no finite option set.
    pub fn open(template_index: usize, template: &Template, key: ConfigKey) -> Option<Self> {
        let options = key.kind().options()?;
        let original = template.config.get(key)?.clone();
        let current = original.to_string();
        let selected = options
            .iter()
            .position(|option| *option == current)
            .unwrap_or(0);
        Some(Self {
            template: template_index,
            key,
            options,
            selected,
            original,
        })
    }

    pub fn navigate(&mut self, delta: isize) {
        self.selected = wrap_index(self.selected, delta, self.options.len());
    }

    pub fn selected_value(&self) -> &'static str {
        self.options.get(self.selected).copied().unwrap_or_default()
    }

    pub fn pending_value(&self) -> ConfigValue {
        ConfigValue::for_kind(self.key.kind(), self.selected_value())
    }

    pub fn prompt(&self) -> String {
        format!(
            "{}: {} (↑/↓ to change, Enter to save, Esc to cancel)",
            self.key,
            self.selected_value()
        )
    }

    pub fn confirm<S: ConfigStore + ?Sized>(
        self,
        template: &mut Template,
        store: &mut S,
    ) -> Result<ConfigValue> {
        let value = self.pending_value();
        persist_field(template, self.key, &value, store)?;
        Ok(value)
    }

    pub fn cancel(self, template: &mut Template) {
        template.config.set(self.key, self.original);
    }
}

/// Writes through the store first; memory changes only when that succeeds.
pub fn persist_field<S: ConfigStore + ?Sized>(
    template: &mut Template,
    key: ConfigKey,
    value: &ConfigValue,
    store: &mut S,
) -> Result<()> {
    store.update_field(&template.path, key, value)?;
    template.config.set(key, value.clone());
    Ok(())
}
