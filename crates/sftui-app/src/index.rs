// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Template, Viewport, filter_templates, wrap_index};
use std::ops::Range;

/// Loaded templates plus the filtered view the list pane walks over.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateIndex {
    templates: Vec<Template>,
    filtered: Vec<usize>,
    selected_row: usize,
    viewport: Viewport,
}

impl TemplateIndex {
    pub fn new(templates: Vec<Template>) -> Self {
        let filtered = (0..templates.len()).collect();
        Self {
            templates,
            filtered,
            selected_row: 0,
            viewport: Viewport::default(),
        }
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    pub fn apply_filter(&mut self, query: &str) -> usize {
        self.filtered = filter_templates(&self.templates, query);
        self.selected_row = 0;
        self.viewport.reset();
        self.filtered.len()
    }

    pub const fn selected_row(&self) -> usize {
        self.selected_row
    }

    /// Unfiltered index of the highlighted row.
    pub fn selected_index(&self) -> Option<usize> {
        self.filtered.get(self.selected_row).copied()
    }

    pub fn selected_template(&self) -> Option<&Template> {
        self.selected_index()
            .and_then(|index| self.templates.get(index))
    }

    pub fn template(&self, index: usize) -> Option<&Template> {
        self.templates.get(index)
    }

    pub fn template_mut(&mut self, index: usize) -> Option<&mut Template> {
        self.templates.get_mut(index)
    }

    pub fn move_selection(&mut self, delta: isize, height: usize) {
        self.selected_row = wrap_index(self.selected_row, delta, self.filtered.len());
        self.scroll_to_selection(height);
    }

    pub fn scroll_to_selection(&mut self, height: usize) {
        self.viewport
            .follow(self.selected_row, height, self.filtered.len());
    }

    pub const fn viewport_offset(&self) -> usize {
        self.viewport.offset()
    }

    pub fn visible_rows(&self, height: usize) -> Range<usize> {
        self.viewport.visible_range(height, self.filtered.len())
    }
}
