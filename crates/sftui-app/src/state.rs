// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    ACTIONS, Category, ConfigKey, ConfigStore, ConfigValue, DetailField, DetailsFieldComposer,
    FieldDescriptor, FocusSection, InPlaceEditSession, Modal, ModalKind, NO_FIRM_LABEL,
    NO_HOST_LABEL, RECONCILIATION_TYPES, SelectionSet, SessionInfo, SharedPartUsageIndex,
    Template, TemplateIndex, TextPartForm, details, persist_field, template_count_label,
};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Rows taken by everything except the template list body.
pub const CHROME_ROWS: u16 = 9;
pub const SEARCH_BAR_ROWS: u16 = 3;
pub const DEFAULT_TERMINAL_ROWS: u16 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub focus: FocusSection,
    pub index: TemplateIndex,
    pub selection: SelectionSet,
    pub usage: SharedPartUsageIndex,
    pub modal: Modal,
    pub search: SearchState,
    pub selected_detail_field: usize,
    pub firm: Option<String>,
    pub host: String,
    pub status_line: String,
    pub terminal_rows: u16,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Vec::new(), SessionInfo::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Quit,
    OpenHelp,
    FocusNext,
    FocusPrev,
    FocusUp,
    FocusDown,
    MoveUp,
    MoveDown,
    ToggleSelection,
    DeselectAll,
    StartSearch,
    Activate,
    EditReconciliationType,
    Input(char),
    Backspace,
    ToggleField,
    Confirm,
    Cancel,
    Resize { rows: u16 },
}

/// A write sent to the [`ConfigStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreWrite {
    Field {
        template: PathBuf,
        key: ConfigKey,
        value: ConfigValue,
    },
    TextPart {
        template: PathBuf,
        old_name: String,
        new_name: String,
        new_path: String,
    },
    Host(String),
    DefaultFirm(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    FocusChanged(FocusSection),
    ModalOpened(ModalKind),
    ModalClosed(ModalKind),
    FilterChanged { query: String, matches: usize },
    TemplateChanged(Option<usize>),
    SelectionChanged { count: usize },
    DetailFieldChanged(usize),
    Persisted(StoreWrite),
    PersistFailed { write: StoreWrite, error: String },
    StatusUpdated(String),
    QuitRequested,
}

impl AppState {
    pub fn new(templates: Vec<Template>, session: SessionInfo) -> Self {
        let usage = SharedPartUsageIndex::build(&templates);
        Self {
            focus: FocusSection::Templates,
            index: TemplateIndex::new(templates),
            selection: SelectionSet::default(),
            usage,
            modal: Modal::None,
            search: SearchState::default(),
            selected_detail_field: 0,
            firm: session.firm,
            host: session.host,
            status_line: "Ready".to_owned(),
            terminal_rows: DEFAULT_TERMINAL_ROWS,
        }
    }

    pub fn dispatch<S: ConfigStore + ?Sized>(
        &mut self,
        command: AppCommand,
        store: &mut S,
    ) -> Vec<AppEvent> {
        debug!(?command, modal = ?self.modal.kind(), "dispatch");

        if let AppCommand::Resize { rows } = command {
            self.terminal_rows = rows;
            self.index.scroll_to_selection(self.list_height());
            return Vec::new();
        }
        if matches!(self.modal, Modal::Help) {
            self.modal = Modal::None;
            return vec![AppEvent::ModalClosed(ModalKind::Help)];
        }
        if self.modal.is_active() {
            return self.dispatch_modal(command, store);
        }
        if self.search.active {
            return self.dispatch_search(command);
        }
        self.dispatch_main(command, store)
    }

    /// Visible rows of the template list for the current terminal height.
    pub fn list_height(&self) -> usize {
        let search_rows = if self.search.active {
            SEARCH_BAR_ROWS
        } else {
            0
        };
        let rows = self
            .terminal_rows
            .saturating_sub(CHROME_ROWS)
            .saturating_sub(search_rows);
        usize::from(rows).max(1)
    }

    pub fn composer(&self) -> DetailsFieldComposer<'_> {
        DetailsFieldComposer::new(&self.usage)
    }

    pub fn selected_template(&self) -> Option<&Template> {
        self.index.selected_template()
    }

    pub fn detail_fields(&self) -> Vec<FieldDescriptor> {
        self.selected_template()
            .map(|template| self.composer().compose(template))
            .unwrap_or_default()
    }

    pub fn firm_label(&self) -> &str {
        self.firm.as_deref().unwrap_or(NO_FIRM_LABEL)
    }

    pub fn host_label(&self) -> &str {
        if self.host.is_empty() {
            NO_HOST_LABEL
        } else {
            &self.host
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) -> AppEvent {
        let message = message.into();
        self.status_line.clone_from(&message);
        AppEvent::StatusUpdated(message)
    }

    fn dispatch_main<S: ConfigStore + ?Sized>(
        &mut self,
        command: AppCommand,
        store: &mut S,
    ) -> Vec<AppEvent> {
        match command {
            AppCommand::Quit => vec![AppEvent::QuitRequested],
            AppCommand::OpenHelp => self.open_modal(Modal::Help, None),
            AppCommand::FocusNext => self.set_focus(self.focus.next()),
            AppCommand::FocusPrev => self.set_focus(self.focus.prev()),
            AppCommand::FocusUp => self.set_focus(self.focus.up()),
            AppCommand::FocusDown => self.set_focus(self.focus.down()),
            AppCommand::MoveUp => self.move_cursor(-1),
            AppCommand::MoveDown => self.move_cursor(1),
            AppCommand::ToggleSelection => self.toggle_selection(),
            AppCommand::DeselectAll | AppCommand::Backspace => self.deselect_all(),
            AppCommand::StartSearch => self.start_search(),
            AppCommand::Activate => self.activate(store),
            AppCommand::EditReconciliationType => self.open_reconciliation_picker(),
            AppCommand::Input(_)
            | AppCommand::ToggleField
            | AppCommand::Confirm
            | AppCommand::Cancel
            | AppCommand::Resize { .. } => Vec::new(),
        }
    }

    fn dispatch_search(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Input(ch) if (' '..='~').contains(&ch) => {
                self.search.query.push(ch);
                self.refilter()
            }
            AppCommand::Backspace => {
                if self.search.query.pop().is_some() {
                    self.refilter()
                } else {
                    Vec::new()
                }
            }
            AppCommand::Confirm => {
                self.search.active = false;
                self.index.scroll_to_selection(self.list_height());
                let matches = self.index.filtered().len();
                let message = if matches == 0 {
                    "No templates found".to_owned()
                } else {
                    format!("Found {matches} templates")
                };
                vec![self.set_status(message)]
            }
            AppCommand::Cancel => {
                self.search.active = false;
                self.search.query.clear();
                let mut events = self.refilter();
                events.push(self.set_status("Search cancelled"));
                events
            }
            AppCommand::Quit => vec![AppEvent::QuitRequested],
            _ => Vec::new(),
        }
    }

    fn dispatch_modal<S: ConfigStore + ?Sized>(
        &mut self,
        command: AppCommand,
        store: &mut S,
    ) -> Vec<AppEvent> {
        match command {
            AppCommand::MoveUp => self.navigate_modal(-1),
            AppCommand::MoveDown => self.navigate_modal(1),
            AppCommand::Input(ch) => {
                self.modal.push_char(ch);
                Vec::new()
            }
            AppCommand::Backspace => {
                self.modal.backspace();
                Vec::new()
            }
            AppCommand::ToggleField => {
                self.modal.toggle_field();
                Vec::new()
            }
            AppCommand::Confirm => self.confirm_modal(store),
            AppCommand::Cancel => self.cancel_modal(),
            _ => Vec::new(),
        }
    }

    fn set_focus(&mut self, section: FocusSection) -> Vec<AppEvent> {
        if section == self.focus {
            return Vec::new();
        }
        self.focus = section;
        vec![AppEvent::FocusChanged(section)]
    }

    fn open_modal(&mut self, modal: Modal, status: Option<String>) -> Vec<AppEvent> {
        let Some(kind) = modal.kind() else {
            return Vec::new();
        };
        self.modal = modal;
        let mut events = vec![AppEvent::ModalOpened(kind)];
        if let Some(message) = status {
            events.push(self.set_status(message));
        }
        events
    }

    fn move_cursor(&mut self, delta: isize) -> Vec<AppEvent> {
        match self.focus {
            FocusSection::Templates => {
                let before = self.index.selected_index();
                self.index.move_selection(delta, self.list_height());
                self.template_changed(before).into_iter().collect()
            }
            FocusSection::Details => {
                let count = self
                    .selected_template()
                    .map_or(0, |template| self.composer().count(template));
                if count == 0 {
                    return Vec::new();
                }
                self.selected_detail_field =
                    details::navigate(self.selected_detail_field, delta, count);
                vec![AppEvent::DetailFieldChanged(self.selected_detail_field)]
            }
            FocusSection::Firm | FocusSection::Host | FocusSection::Output => Vec::new(),
        }
    }

    fn template_changed(&mut self, before: Option<usize>) -> Option<AppEvent> {
        let after = self.index.selected_index();
        if after == before {
            return None;
        }
        self.selected_detail_field = 0;
        Some(AppEvent::TemplateChanged(after))
    }

    fn refilter(&mut self) -> Vec<AppEvent> {
        let before = self.index.selected_index();
        let matches = self.index.apply_filter(&self.search.query);
        self.index.scroll_to_selection(self.list_height());
        let mut events = vec![AppEvent::FilterChanged {
            query: self.search.query.clone(),
            matches,
        }];
        events.extend(self.template_changed(before));
        events
    }

    fn toggle_selection(&mut self) -> Vec<AppEvent> {
        if self.focus != FocusSection::Templates {
            return Vec::new();
        }
        let Some(index) = self.index.selected_index() else {
            return Vec::new();
        };
        self.selection.toggle(index);
        let count = self.selection.len();
        let message = if count == 0 {
            "No templates selected".to_owned()
        } else {
            format!("{} selected", template_count_label(count))
        };
        vec![
            AppEvent::SelectionChanged { count },
            self.set_status(message),
        ]
    }

    fn deselect_all(&mut self) -> Vec<AppEvent> {
        if self.focus != FocusSection::Templates || self.selection.is_empty() {
            return Vec::new();
        }
        self.selection.clear();
        vec![
            AppEvent::SelectionChanged { count: 0 },
            self.set_status("All templates deselected"),
        ]
    }

    fn start_search(&mut self) -> Vec<AppEvent> {
        if self.focus != FocusSection::Templates {
            return Vec::new();
        }
        self.search.active = true;
        // A kept filter stays visible until the first keystroke.
        self.search.query.clear();
        self.index.scroll_to_selection(self.list_height());
        vec![self.set_status("Search mode - type to filter templates")]
    }

    fn activate<S: ConfigStore + ?Sized>(&mut self, store: &mut S) -> Vec<AppEvent> {
        match self.focus {
            FocusSection::Firm => {
                let (options, message) = match store.load_firm_options() {
                    Ok(options) => (options, "Select a firm or partner".to_owned()),
                    Err(error) => {
                        warn!(error = %format!("{error:#}"), "failed to load firm options");
                        (Vec::new(), format!("Error loading firm options: {error:#}"))
                    }
                };
                self.open_modal(
                    Modal::FirmPicker {
                        selected: 0,
                        options,
                    },
                    Some(message),
                )
            }
            FocusSection::Host => self.open_modal(
                Modal::HostEditor {
                    buffer: self.host.clone(),
                },
                Some("Edit host URL".to_owned()),
            ),
            FocusSection::Templates => {
                let count = self.selection.len();
                if count == 0 {
                    return vec![self.set_status("No templates selected")];
                }
                self.open_modal(
                    Modal::ActionMenu { selected: 0 },
                    Some(format!(
                        "{} selected - choose action",
                        template_count_label(count)
                    )),
                )
            }
            FocusSection::Details => self.activate_detail_field(),
            FocusSection::Output => Vec::new(),
        }
    }

    fn activate_detail_field(&mut self) -> Vec<AppEvent> {
        let Some(index) = self.index.selected_index() else {
            return Vec::new();
        };
        let Some(template) = self.index.template(index) else {
            return Vec::new();
        };
        let Some(descriptor) = self
            .composer()
            .field_at(template, self.selected_detail_field)
        else {
            return Vec::new();
        };

        match descriptor.field {
            DetailField::Config(key) => match InPlaceEditSession::open(index, template, key) {
                Some(session) => self.open_modal(
                    Modal::InPlaceEditor(session),
                    Some(format!(
                        "Select {key} value (↑/↓ to change, Enter to save, Esc to cancel)"
                    )),
                ),
                None => Vec::new(),
            },
            DetailField::TextPart { name, path } => self.open_modal(
                Modal::TextPartEditor(TextPartForm::new(index, &name, &path)),
                Some("Edit text part name and path".to_owned()),
            ),
            DetailField::SharedPart(_) => Vec::new(),
        }
    }

    fn open_reconciliation_picker(&mut self) -> Vec<AppEvent> {
        if self.focus != FocusSection::Details {
            return Vec::new();
        }
        let Some(index) = self.index.selected_index() else {
            return Vec::new();
        };
        let Some(current) = self
            .index
            .template(index)
            .filter(|template| template.category == Category::ReconciliationTexts)
            .and_then(|template| template.config.get(ConfigKey::ReconciliationType))
            .map(ConfigValue::to_string)
        else {
            return Vec::new();
        };
        let selected = RECONCILIATION_TYPES
            .iter()
            .position(|option| *option == current)
            .unwrap_or(0);
        self.open_modal(
            Modal::ReconciliationTypePicker {
                template: index,
                selected,
            },
            Some("Select reconciliation type".to_owned()),
        )
    }

    fn navigate_modal(&mut self, delta: isize) -> Vec<AppEvent> {
        self.modal.navigate(delta);
        match &self.modal {
            Modal::InPlaceEditor(session) => {
                let prompt = session.prompt();
                vec![self.set_status(prompt)]
            }
            _ => Vec::new(),
        }
    }

    fn confirm_modal<S: ConfigStore + ?Sized>(&mut self, store: &mut S) -> Vec<AppEvent> {
        let Some(kind) = self.modal.kind() else {
            return Vec::new();
        };
        if self.modal.is_list() && self.modal.option_count() == 0 {
            return Vec::new();
        }

        let mut events = vec![AppEvent::ModalClosed(kind)];
        match self.modal.take() {
            Modal::ActionMenu { selected } => {
                let action = ACTIONS.get(selected).copied().unwrap_or("cancel");
                let message = if action == "cancel" {
                    "Action cancelled".to_owned()
                } else {
                    format!(
                        "Action '{action}' selected for {} templates (not implemented yet)",
                        self.selection.len()
                    )
                };
                events.push(self.set_status(message));
            }
            Modal::FirmPicker { selected, options } => {
                let Some(option) = options.get(selected) else {
                    return events;
                };
                let outcome = store.set_default_firm(&option.id);
                if outcome.is_ok() {
                    self.firm = Some(option.label());
                }
                events.extend(self.record_write(
                    StoreWrite::DefaultFirm(option.id.clone()),
                    outcome,
                    format!("Default firm set to {}", option.name),
                    "Error setting default firm",
                ));
            }
            Modal::HostEditor { buffer } => {
                let outcome = store.set_host(&buffer);
                if outcome.is_ok() {
                    self.host.clone_from(&buffer);
                }
                events.extend(self.record_write(
                    StoreWrite::Host(buffer),
                    outcome,
                    "Host updated successfully".to_owned(),
                    "Error setting host",
                ));
            }
            Modal::ReconciliationTypePicker { template, selected } => {
                let option = RECONCILIATION_TYPES
                    .get(selected)
                    .copied()
                    .unwrap_or_default();
                let value = ConfigValue::Text(option.to_owned());
                let Some(target) = self.index.template_mut(template) else {
                    return events;
                };
                let write = StoreWrite::Field {
                    template: target.path.clone(),
                    key: ConfigKey::ReconciliationType,
                    value: value.clone(),
                };
                let outcome = persist_field(target, ConfigKey::ReconciliationType, &value, store);
                events.extend(self.record_write(
                    write,
                    outcome,
                    format!("Reconciliation type set to: {option}"),
                    "Error updating reconciliation type",
                ));
            }
            Modal::TextPartEditor(form) => return self.confirm_text_part(form, store),
            Modal::InPlaceEditor(session) => {
                let key = session.key;
                let option = session.selected_value();
                let value = session.pending_value();
                let Some(target) = self.index.template_mut(session.template) else {
                    return events;
                };
                let write = StoreWrite::Field {
                    template: target.path.clone(),
                    key,
                    value,
                };
                let outcome = session.confirm(target, store).map(|_| ());
                events.extend(self.record_write(
                    write,
                    outcome,
                    format!("{key} updated to: {option}"),
                    &format!("Error updating {key}"),
                ));
            }
            Modal::Help | Modal::None => {}
        }
        events
    }

    fn confirm_text_part<S: ConfigStore + ?Sized>(
        &mut self,
        form: TextPartForm,
        store: &mut S,
    ) -> Vec<AppEvent> {
        let closed = AppEvent::ModalClosed(ModalKind::TextPartEditor);
        if form.name.is_empty() {
            self.modal = Modal::TextPartEditor(form);
            return vec![self.set_status("Text part name cannot be empty")];
        }
        if form.is_unchanged() {
            return vec![closed, self.set_status("Text part unchanged")];
        }
        let Some(template) = self.index.template(form.template) else {
            return vec![closed];
        };
        if form.name != form.original_name && template.config.has_text_part(&form.name) {
            let message = format!("Text part '{}' already exists", form.name);
            self.modal = Modal::TextPartEditor(form);
            return vec![self.set_status(message)];
        }

        let template_path = template.path.clone();
        let outcome =
            store.update_text_part(&template_path, &form.original_name, &form.name, &form.path);
        if outcome.is_ok() {
            if let Some(target) = self.index.template_mut(form.template) {
                target
                    .config
                    .rename_text_part(&form.original_name, &form.name, &form.path);
            }
            self.follow_text_part(&form.name);
        }

        let mut events = vec![closed];
        events.extend(self.record_write(
            StoreWrite::TextPart {
                template: template_path,
                old_name: form.original_name,
                new_name: form.name.clone(),
                new_path: form.path.clone(),
            },
            outcome,
            format!("Text part updated: {} -> {}", form.name, form.path),
            "Error updating text part",
        ));
        events
    }

    /// Keeps the cursor on a renamed text part, which may have moved in sort order.
    fn follow_text_part(&mut self, name: &str) {
        let fields = self.detail_fields();
        let position = fields.iter().position(|descriptor| {
            matches!(&descriptor.field, DetailField::TextPart { name: part, .. } if part == name)
        });
        self.selected_detail_field = match position {
            Some(position) => position,
            None => self
                .selected_detail_field
                .min(fields.len().saturating_sub(1)),
        };
    }

    fn cancel_modal(&mut self) -> Vec<AppEvent> {
        let Some(kind) = self.modal.kind() else {
            return Vec::new();
        };
        let message = match self.modal.take() {
            Modal::ActionMenu { .. } => "Action cancelled",
            Modal::FirmPicker { .. } => "Firm selection cancelled",
            Modal::HostEditor { .. } => "Host edit cancelled",
            Modal::ReconciliationTypePicker { .. } => "Reconciliation type edit cancelled",
            Modal::TextPartEditor(_) => "Text part edit cancelled",
            Modal::InPlaceEditor(session) => {
                if let Some(template) = self.index.template_mut(session.template) {
                    session.cancel(template);
                }
                "Edit cancelled"
            }
            Modal::Help | Modal::None => return vec![AppEvent::ModalClosed(kind)],
        };
        vec![AppEvent::ModalClosed(kind), self.set_status(message)]
    }

    fn record_write(
        &mut self,
        write: StoreWrite,
        outcome: Result<()>,
        success: String,
        failure: &str,
    ) -> Vec<AppEvent> {
        match outcome {
            Ok(()) => {
                info!(?write, "persisted");
                vec![AppEvent::Persisted(write), self.set_status(success)]
            }
            Err(error) => {
                let error = format!("{error:#}");
                warn!(?write, %error, "write rejected");
                let status = self.set_status(format!("{failure}: {error}"));
                vec![AppEvent::PersistFailed { write, error }, status]
            }
        }
    }
}
