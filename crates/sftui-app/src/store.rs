// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ConfigKey, ConfigValue, FirmOption, Template};
use anyhow::Result;
use std::path::Path;

/// Source of the template list, read once at startup.
pub trait TemplateRepository {
    fn load_templates(&self) -> Result<Vec<Template>>;
}

/// Persistence for every value the dashboard can change.
///
/// Implementations must leave the backing file untouched when they return an
/// error. Callers turn errors into status text and never retry.
pub trait ConfigStore {
    fn update_field(
        &mut self,
        template_path: &Path,
        key: ConfigKey,
        value: &ConfigValue,
    ) -> Result<()>;

    fn update_text_part(
        &mut self,
        template_path: &Path,
        old_name: &str,
        new_name: &str,
        new_path: &str,
    ) -> Result<()>;

    fn set_host(&mut self, host: &str) -> Result<()>;

    fn set_default_firm(&mut self, firm_id: &str) -> Result<()>;

    fn load_firm_options(&mut self) -> Result<Vec<FirmOption>>;
}
