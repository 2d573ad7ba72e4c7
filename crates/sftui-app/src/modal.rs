// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{FirmOption, InPlaceEditSession, RECONCILIATION_TYPES, wrap_index};

/// Bulk actions offered for the selected templates.
pub const ACTIONS: [&str; 4] = ["create", "import", "update", "cancel"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    ActionMenu,
    FirmPicker,
    HostEditor,
    ReconciliationTypePicker,
    TextPartEditor,
    InPlaceEditor,
    Help,
}

impl ModalKind {
    pub const fn title(self) -> &'static str {
        match self {
            Self::ActionMenu => "Actions",
            Self::FirmPicker => "Select Firm",
            Self::HostEditor => "Edit Host",
            Self::ReconciliationTypePicker => "Reconciliation Type",
            Self::TextPartEditor => "Edit Text Part",
            Self::InPlaceEditor => "Edit Field",
            Self::Help => "Help",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPartField {
    Name,
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPartForm {
    pub template: usize,
    pub original_name: String,
    pub original_path: String,
    pub name: String,
    pub path: String,
    pub mode: TextPartField,
}

impl TextPartForm {
    pub fn new(template: usize, name: &str, path: &str) -> Self {
        Self {
            template,
            original_name: name.to_owned(),
            original_path: path.to_owned(),
            name: name.to_owned(),
            path: path.to_owned(),
            mode: TextPartField::Name,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.name == self.original_name && self.path == self.original_path
    }

    fn buffer_mut(&mut self) -> &mut String {
        match self.mode {
            TextPartField::Name => &mut self.name,
            TextPartField::Path => &mut self.path,
        }
    }
}

/// The single overlay that owns input while active.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Modal {
    #[default]
    None,
    ActionMenu {
        selected: usize,
    },
    FirmPicker {
        selected: usize,
        options: Vec<FirmOption>,
    },
    HostEditor {
        buffer: String,
    },
    ReconciliationTypePicker {
        template: usize,
        selected: usize,
    },
    TextPartEditor(TextPartForm),
    InPlaceEditor(InPlaceEditSession),
    Help,
}

impl Modal {
    pub const fn kind(&self) -> Option<ModalKind> {
        match self {
            Self::None => None,
            Self::ActionMenu { .. } => Some(ModalKind::ActionMenu),
            Self::FirmPicker { .. } => Some(ModalKind::FirmPicker),
            Self::HostEditor { .. } => Some(ModalKind::HostEditor),
            Self::ReconciliationTypePicker { .. } => Some(ModalKind::ReconciliationTypePicker),
            Self::TextPartEditor(_) => Some(ModalKind::TextPartEditor),
            Self::InPlaceEditor(_) => Some(ModalKind::InPlaceEditor),
            Self::Help => Some(ModalKind::Help),
        }
    }

    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub const fn is_list(&self) -> bool {
        matches!(
            self,
            Self::ActionMenu { .. }
                | Self::FirmPicker { .. }
                | Self::ReconciliationTypePicker { .. }
                | Self::InPlaceEditor(_)
        )
    }

    /// Rows offered by list modals; 0 for text modals and when nothing is open.
    pub fn option_count(&self) -> usize {
        match self {
            Self::ActionMenu { .. } => ACTIONS.len(),
            Self::FirmPicker { options, .. } => options.len(),
            Self::ReconciliationTypePicker { .. } => RECONCILIATION_TYPES.len(),
            Self::InPlaceEditor(session) => session.options.len(),
            Self::None | Self::HostEditor { .. } | Self::TextPartEditor(_) | Self::Help => 0,
        }
    }

    pub fn navigate(&mut self, delta: isize) {
        let count = self.option_count();
        match self {
            Self::ActionMenu { selected }
            | Self::FirmPicker { selected, .. }
            | Self::ReconciliationTypePicker { selected, .. } => {
                *selected = wrap_index(*selected, delta, count);
            }
            Self::InPlaceEditor(session) => session.navigate(delta),
            Self::None | Self::HostEditor { .. } | Self::TextPartEditor(_) | Self::Help => {}
        }
    }

    pub fn push_char(&mut self, ch: char) {
        match self {
            Self::HostEditor { buffer } => buffer.push(ch),
            Self::TextPartEditor(form) => form.buffer_mut().push(ch),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self {
            Self::HostEditor { buffer } => {
                buffer.pop();
            }
            Self::TextPartEditor(form) => {
                form.buffer_mut().pop();
            }
            _ => {}
        }
    }

    pub fn toggle_field(&mut self) {
        if let Self::TextPartEditor(form) = self {
            form.mode = match form.mode {
                TextPartField::Name => TextPartField::Path,
                TextPartField::Path => TextPartField::Name,
            };
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
