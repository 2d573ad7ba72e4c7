// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

/// Templates marked for a bulk action, by position in the unfiltered list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSet {
    indices: BTreeSet<usize>,
}

impl SelectionSet {
    /// Returns whether `index` is selected after the toggle.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.indices.remove(&index) {
            false
        } else {
            self.indices.insert(index);
            true
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }
}

/// `"1 template"` / `"N templates"`.
pub fn template_count_label(count: usize) -> String {
    if count == 1 {
        "1 template".to_owned()
    } else {
        format!("{count} templates")
    }
}
