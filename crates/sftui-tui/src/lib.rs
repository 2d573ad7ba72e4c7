// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use sftui_app::{
    ACTIONS, AppCommand, AppEvent, AppState, ConfigStore, DetailField, FieldKind, FocusSection,
    Modal, ModalKind, RECONCILIATION_TYPES, SEARCH_BAR_ROWS, TextPartField, template_count_label,
};
use std::io;
use tracing::{debug, info};

const SECTION_ROWS: u16 = 3;
const STATUS_BAR_ROWS: u16 = 1;
const LIST_BORDER_ROWS: u16 = 2;
const CURSOR_MARK: &str = "> ";
const INPUT_CARET: &str = "_";

pub fn run_app<S: ConfigStore>(state: &mut AppState, store: &mut S) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let (_, rows) = terminal::size().context("read terminal size")?;
    state.dispatch(AppCommand::Resize { rows }, store);
    info!(
        templates = state.index.templates().len(),
        rows, "dashboard started"
    );

    let mut result = Ok(());
    loop {
        if let Err(error) = terminal.draw(|frame| render(frame, state)) {
            result = Err(error).context("draw frame");
            break;
        }

        let command = match event::read().context("read event") {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                command_for_key(state, key)
            }
            Ok(Event::Resize(_, rows)) => Some(AppCommand::Resize { rows }),
            Ok(_) => None,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        let Some(command) = command else {
            continue;
        };

        let events = state.dispatch(command, store);
        for event in &events {
            debug!(?event, "app event");
        }
        if events.contains(&AppEvent::QuitRequested) {
            break;
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// Translates a key press into a command for whichever layer owns input.
pub fn command_for_key(state: &AppState, key: KeyEvent) -> Option<AppCommand> {
    if matches!(state.modal, Modal::Help) {
        return Some(AppCommand::Cancel);
    }
    if state.modal.is_active() {
        return modal_command_for_key(&state.modal, key);
    }
    if state.search.active {
        return search_command_for_key(key);
    }
    main_command_for_key(key)
}

fn main_command_for_key(key: KeyEvent) -> Option<AppCommand> {
    if key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(AppCommand::Quit)
        }
        (_, modifiers) if modifiers.contains(KeyModifiers::CONTROL) => None,
        (KeyCode::Char('q'), _) => Some(AppCommand::Quit),
        (KeyCode::Char('?'), _) => Some(AppCommand::OpenHelp),
        (KeyCode::Tab, _) => Some(AppCommand::FocusNext),
        (KeyCode::BackTab, _) => Some(AppCommand::FocusPrev),
        (KeyCode::Up, modifiers) if modifiers.contains(KeyModifiers::SHIFT) => {
            Some(AppCommand::FocusUp)
        }
        (KeyCode::Down, modifiers) if modifiers.contains(KeyModifiers::SHIFT) => {
            Some(AppCommand::FocusDown)
        }
        (KeyCode::Left, modifiers) if modifiers.contains(KeyModifiers::SHIFT) => {
            Some(AppCommand::FocusPrev)
        }
        (KeyCode::Right, modifiers) if modifiers.contains(KeyModifiers::SHIFT) => {
            Some(AppCommand::FocusNext)
        }
        (KeyCode::Char('K'), _) => Some(AppCommand::FocusUp),
        (KeyCode::Char('J'), _) => Some(AppCommand::FocusDown),
        (KeyCode::Char('H'), _) => Some(AppCommand::FocusPrev),
        (KeyCode::Char('L'), _) => Some(AppCommand::FocusNext),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppCommand::MoveUp),
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppCommand::MoveDown),
        (KeyCode::Char(' '), _) => Some(AppCommand::ToggleSelection),
        (KeyCode::Char('/'), _) => Some(AppCommand::StartSearch),
        (KeyCode::Backspace, _) => Some(AppCommand::DeselectAll),
        (KeyCode::Enter, _) => Some(AppCommand::Activate),
        (KeyCode::Char('r'), _) => Some(AppCommand::EditReconciliationType),
        _ => None,
    }
}

fn search_command_for_key(key: KeyEvent) -> Option<AppCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(AppCommand::Quit)
        }
        (KeyCode::Esc, _) => Some(AppCommand::Cancel),
        (KeyCode::Enter, _) => Some(AppCommand::Confirm),
        (KeyCode::Backspace, _) => Some(AppCommand::Backspace),
        (KeyCode::Char(ch), modifiers) if is_plain(modifiers) => Some(AppCommand::Input(ch)),
        _ => None,
    }
}

fn modal_command_for_key(modal: &Modal, key: KeyEvent) -> Option<AppCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Some(AppCommand::Cancel),
        (KeyCode::Enter, _) => Some(AppCommand::Confirm),
        _ if modal.is_list() => list_command_for_key(modal, key),
        (KeyCode::Tab, _) => Some(AppCommand::ToggleField),
        (KeyCode::Backspace, _) => Some(AppCommand::Backspace),
        (KeyCode::Char(ch), modifiers) if is_plain(modifiers) => Some(AppCommand::Input(ch)),
        _ => None,
    }
}

fn list_command_for_key(modal: &Modal, key: KeyEvent) -> Option<AppCommand> {
    let horizontal = matches!(modal, Modal::InPlaceEditor(_));
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(AppCommand::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(AppCommand::MoveDown),
        KeyCode::Left | KeyCode::Char('h') if horizontal => Some(AppCommand::MoveUp),
        KeyCode::Right | KeyCode::Char('l') if horizontal => Some(AppCommand::MoveDown),
        _ => None,
    }
}

fn is_plain(modifiers: KeyModifiers) -> bool {
    !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState) {
    let mut constraints = Vec::with_capacity(5);
    if state.search.active {
        constraints.push(Constraint::Length(SEARCH_BAR_ROWS));
    }
    constraints.extend([
        Constraint::Length(SECTION_ROWS),
        Constraint::Min(1),
        Constraint::Length(SECTION_ROWS),
        Constraint::Length(STATUS_BAR_ROWS),
    ]);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let base = usize::from(state.search.active);
    if state.search.active {
        let search = Paragraph::new(search_bar_text(state))
            .block(Block::default().title("Search").borders(Borders::ALL));
        frame.render_widget(search, layout[0]);
    }

    let top = split_columns(layout[base]);
    frame.render_widget(
        Paragraph::new(state.firm_label().to_owned())
            .block(section_block(FocusSection::Firm, state.focus)),
        top[0],
    );
    frame.render_widget(
        Paragraph::new(state.host_label().to_owned())
            .block(section_block(FocusSection::Host, state.focus)),
        top[1],
    );

    let main = split_columns(layout[base + 1]);
    frame.render_widget(
        Paragraph::new(highlighted_lines(template_list_rows(state)))
            .block(section_block(FocusSection::Templates, state.focus)),
        main[0],
    );
    frame.render_widget(
        Paragraph::new(highlighted_lines(details_rows(state)))
            .block(section_block(FocusSection::Details, state.focus)),
        main[1],
    );

    frame.render_widget(
        Paragraph::new(state.status_line.clone())
            .block(section_block(FocusSection::Output, state.focus)),
        layout[base + 2],
    );
    frame.render_widget(
        Paragraph::new(status_bar_text(state)).style(Style::default().fg(Color::DarkGray)),
        layout[base + 3],
    );

    if let Some(kind) = state.modal.kind()
        && let Some(text) = modal_overlay_text(state)
    {
        let (percent_x, percent_y) = overlay_size(kind);
        let area = centered_rect(percent_x, percent_y, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(text).block(
            Block::default()
                .title(kind.title())
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(overlay, area);
    }
}

fn split_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area)
}

fn section_block(section: FocusSection, focus: FocusSection) -> Block<'static> {
    let block = Block::default()
        .title(section.label())
        .borders(Borders::ALL);
    if section == focus {
        block.border_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        block
    }
}

fn highlighted_lines(rows: Vec<(String, bool)>) -> Vec<Line<'static>> {
    let highlight = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    rows.into_iter()
        .map(|(text, selected)| {
            if selected {
                Line::styled(text, highlight)
            } else {
                Line::from(text)
            }
        })
        .collect()
}

fn overlay_size(kind: ModalKind) -> (u16, u16) {
    match kind {
        ModalKind::Help => (70, 70),
        ModalKind::FirmPicker => (60, 50),
        ModalKind::TextPartEditor => (70, 30),
        ModalKind::HostEditor => (60, 25),
        ModalKind::ActionMenu | ModalKind::ReconciliationTypePicker | ModalKind::InPlaceEditor => {
            (50, 35)
        }
    }
}

fn search_bar_text(state: &AppState) -> String {
    format!("/{}{INPUT_CARET}", state.search.query)
}

/// Visible template rows; the flag marks the cursor row.
fn template_list_rows(state: &AppState) -> Vec<(String, bool)> {
    if state.index.filtered().is_empty() {
        let message = if state.search.query.is_empty() {
            "No templates found"
        } else {
            "No templates match search"
        };
        return vec![(message.to_owned(), false)];
    }

    let filtered = state.index.filtered();
    state
        .index
        .visible_rows(state.list_height())
        .filter_map(|row| {
            let index = *filtered.get(row)?;
            let template = state.index.template(index)?;
            let mark = if state.selection.contains(index) {
                "[x]"
            } else {
                "[ ]"
            };
            Some((
                format!("{mark} {} {}", template.category.prefix(), template.name),
                row == state.index.selected_row(),
            ))
        })
        .collect()
}

/// Details pane lines; the flag marks the selected field while Details has focus.
fn details_rows(state: &AppState) -> Vec<(String, bool)> {
    let Some(template) = state.selected_template() else {
        return vec![("No template selected".to_owned(), false)];
    };

    let mut rows = vec![
        (format!("Name: {}", template.name), false),
        (format!("Type: {}", template.category.display_name()), false),
        (format!("Path: {}", template.path.display()), false),
        (String::new(), false),
        ("Configuration:".to_owned(), false),
    ];

    let fields = state.detail_fields();
    if fields.is_empty() {
        rows.push(("  (empty)".to_owned(), false));
        return rows;
    }

    let editing = match &state.modal {
        Modal::InPlaceEditor(session) if state.index.selected_index() == Some(session.template) => {
            Some(session)
        }
        _ => None,
    };
    let mut group = FieldKind::ConfigField;
    for (position, descriptor) in fields.iter().enumerate() {
        let kind = descriptor.kind();
        if kind != group {
            if let Some(heading) = group_heading(kind) {
                rows.push((heading.to_owned(), false));
            }
            group = kind;
        }
        let line = match &descriptor.field {
            DetailField::Config(key) => {
                let value = match editing {
                    Some(session) if session.key == *key => session.selected_value().to_owned(),
                    _ => descriptor.value.clone(),
                };
                if descriptor.editable {
                    format!("  {key}: {value}")
                } else {
                    format!("  {key}: {value} (read-only)")
                }
            }
            DetailField::TextPart { name, path } => format!("  {name}: {path}"),
            DetailField::SharedPart(name) => format!("  {name}"),
        };
        let selected =
            state.focus == FocusSection::Details && position == state.selected_detail_field;
        rows.push((line, selected));
    }
    rows
}

fn group_heading(kind: FieldKind) -> Option<&'static str> {
    match kind {
        FieldKind::ConfigField => None,
        FieldKind::TextPart => Some("Text parts:"),
        FieldKind::SharedPart => Some("Used in:"),
    }
}

fn option_lines<'a>(options: impl IntoIterator<Item = &'a str>, selected: usize) -> Vec<String> {
    options
        .into_iter()
        .enumerate()
        .map(|(position, option)| {
            if position == selected {
                format!("{CURSOR_MARK}{option}")
            } else {
                format!("  {option}")
            }
        })
        .collect()
}

/// Overlay body for the active modal. The in-place editor draws inside the
/// details pane instead, so it has no overlay.
fn modal_overlay_text(state: &AppState) -> Option<String> {
    let lines = match &state.modal {
        Modal::None | Modal::InPlaceEditor(_) => return None,
        Modal::Help => return Some(help_overlay_text().to_owned()),
        Modal::ActionMenu { selected } => {
            let mut lines = vec![
                format!("{} selected", template_count_label(state.selection.len())),
                String::new(),
            ];
            lines.extend(option_lines(ACTIONS, *selected));
            lines
        }
        Modal::FirmPicker { selected, options } => {
            if options.is_empty() {
                vec!["No firms or partners found".to_owned()]
            } else {
                let labels: Vec<String> = options
                    .iter()
                    .map(|option| format!("{} [{}]", option.label(), option.kind.as_str()))
                    .collect();
                option_lines(labels.iter().map(String::as_str), *selected)
            }
        }
        Modal::HostEditor { buffer } => vec![
            "Host URL:".to_owned(),
            format!("{buffer}{INPUT_CARET}"),
            String::new(),
            "enter save | esc cancel".to_owned(),
        ],
        Modal::ReconciliationTypePicker { selected, .. } => {
            option_lines(RECONCILIATION_TYPES, *selected)
        }
        Modal::TextPartEditor(form) => {
            let (name_mark, path_mark, name_caret, path_caret) = match form.mode {
                TextPartField::Name => (CURSOR_MARK, "  ", INPUT_CARET, ""),
                TextPartField::Path => ("  ", CURSOR_MARK, "", INPUT_CARET),
            };
            vec![
                format!("{name_mark}Name: {}{name_caret}", form.name),
                format!("{path_mark}Path: {}{path_caret}", form.path),
                String::new(),
                "tab switch field | enter save | esc cancel".to_owned(),
            ]
        }
    };
    Some(lines.join("\n"))
}

fn help_overlay_text() -> &'static str {
    "navigation:\n\
  tab / shift+tab          next / previous section\n\
  shift+up/down, K/J       section above / below\n\
  shift+left/right, H/L    previous / next section\n\
  up/k, down/j             move within templates or details\n\
\n\
templates:\n\
  space                    select / deselect template\n\
  backspace                deselect all\n\
  /                        search (enter keeps filter, esc clears)\n\
  enter                    actions for selected templates\n\
\n\
details:\n\
  enter                    edit field or text part\n\
  r                        reconciliation type picker\n\
\n\
firm / host:\n\
  enter                    pick default firm / edit host\n\
\n\
global:\n\
  ?                        help\n\
  q / ctrl+c               quit\n\
\n\
press any key to close"
}

fn status_bar_text(state: &AppState) -> String {
    match &state.modal {
        Modal::Help => return "any key: close".to_owned(),
        Modal::InPlaceEditor(_) => {
            return "up/down left/right: change | enter: save | esc: cancel".to_owned();
        }
        Modal::TextPartEditor(_) => {
            return "type to edit | tab: switch field | enter: save | esc: cancel".to_owned();
        }
        Modal::HostEditor { .. } => return "type to edit | enter: save | esc: cancel".to_owned(),
        Modal::ActionMenu { .. }
        | Modal::FirmPicker { .. }
        | Modal::ReconciliationTypePicker { .. } => {
            return "up/k down/j: choose | enter: confirm | esc: cancel".to_owned();
        }
        Modal::None => {}
    }
    if state.search.active {
        return "type to filter | backspace: delete | enter: keep filter | esc: clear".to_owned();
    }

    let contextual = match state.focus {
        FocusSection::Templates => "space: select | backspace: clear | /: search | enter: actions",
        FocusSection::Details => "enter: edit | r: reconciliation type",
        FocusSection::Firm => "enter: pick firm",
        FocusSection::Host => "enter: edit host",
        FocusSection::Output => "",
    };
    let mut text = format!(
        "{} | tab/shift+tab: section | up/k down/j: move",
        state.focus.label()
    );
    if !contextual.is_empty() {
        text.push_str(" | ");
        text.push_str(contextual);
    }
    text.push_str(" | ?: help | q: quit");
    text
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        LIST_BORDER_ROWS, SECTION_ROWS, STATUS_BAR_ROWS, centered_rect, command_for_key,
        details_rows, help_overlay_text, modal_overlay_text, status_bar_text, template_list_rows,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::layout::Rect;
    use sftui_app::{AppCommand, AppState, CHROME_ROWS, FocusSection, Modal, SessionInfo};
    use sftui_testkit::{RecordingStore, sample_firm_options, sample_templates};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn chord(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn sample_state() -> AppState {
        AppState::new(sample_templates(), SessionInfo::default())
    }

    fn run(state: &mut AppState, store: &mut RecordingStore, commands: &[AppCommand]) {
        for command in commands {
            state.dispatch(*command, store);
        }
    }

    #[test]
    fn layout_rows_match_list_height_chrome() {
        assert_eq!(
            SECTION_ROWS * 2 + STATUS_BAR_ROWS + LIST_BORDER_ROWS,
            CHROME_ROWS
        );
    }

    #[test]
    fn main_keymap_covers_focus_and_quit_keys() {
        let state = sample_state();
        let cases = [
            (key(KeyCode::Char('q')), Some(AppCommand::Quit)),
            (
                chord(KeyCode::Char('c'), KeyModifiers::CONTROL),
                Some(AppCommand::Quit),
            ),
            (key(KeyCode::Char('?')), Some(AppCommand::OpenHelp)),
            (key(KeyCode::Tab), Some(AppCommand::FocusNext)),
            (
                chord(KeyCode::BackTab, KeyModifiers::SHIFT),
                Some(AppCommand::FocusPrev),
            ),
            (
                chord(KeyCode::Up, KeyModifiers::SHIFT),
                Some(AppCommand::FocusUp),
            ),
            (
                chord(KeyCode::Char('J'), KeyModifiers::SHIFT),
                Some(AppCommand::FocusDown),
            ),
            (
                chord(KeyCode::Char('L'), KeyModifiers::SHIFT),
                Some(AppCommand::FocusNext),
            ),
            (key(KeyCode::Up), Some(AppCommand::MoveUp)),
            (key(KeyCode::Char('j')), Some(AppCommand::MoveDown)),
            (key(KeyCode::Char(' ')), Some(AppCommand::ToggleSelection)),
            (key(KeyCode::Char('/')), Some(AppCommand::StartSearch)),
            (key(KeyCode::Backspace), Some(AppCommand::DeselectAll)),
            (key(KeyCode::Enter), Some(AppCommand::Activate)),
            (
                key(KeyCode::Char('r')),
                Some(AppCommand::EditReconciliationType),
            ),
            (chord(KeyCode::Char('q'), KeyModifiers::ALT), None),
            (chord(KeyCode::Char('x'), KeyModifiers::CONTROL), None),
            (key(KeyCode::Char('z')), None),
        ];
        for (event, expected) in cases {
            assert_eq!(command_for_key(&state, event), expected, "{event:?}");
        }
    }

    #[test]
    fn search_keymap_types_letters_that_are_commands_elsewhere() {
        let mut state = sample_state();
        let mut store = RecordingStore::default();
        run(&mut state, &mut store, &[AppCommand::StartSearch]);

        assert_eq!(
            command_for_key(&state, key(KeyCode::Char('q'))),
            Some(AppCommand::Input('q'))
        );
        assert_eq!(
            command_for_key(&state, key(KeyCode::Char('?'))),
            Some(AppCommand::Input('?'))
        );
        assert_eq!(
            command_for_key(&state, key(KeyCode::Esc)),
            Some(AppCommand::Cancel)
        );
        assert_eq!(
            command_for_key(&state, key(KeyCode::Enter)),
            Some(AppCommand::Confirm)
        );
        assert_eq!(
            command_for_key(&state, chord(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(AppCommand::Quit)
        );
        assert_eq!(command_for_key(&state, key(KeyCode::Tab)), None);
    }

    #[test]
    fn modal_keymap_blocks_global_keys() {
        let mut state = sample_state();
        state.modal = Modal::HostEditor {
            buffer: String::new(),
        };
        assert_eq!(
            command_for_key(&state, key(KeyCode::Char('q'))),
            Some(AppCommand::Input('q'))
        );
        assert_eq!(
            command_for_key(&state, chord(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(
            command_for_key(&state, key(KeyCode::Backspace)),
            Some(AppCommand::Backspace)
        );

        state.modal = Modal::ActionMenu { selected: 0 };
        assert_eq!(
            command_for_key(&state, key(KeyCode::Char('k'))),
            Some(AppCommand::MoveUp)
        );
        assert_eq!(command_for_key(&state, key(KeyCode::Char('q'))), None);
        assert_eq!(command_for_key(&state, key(KeyCode::Left)), None);
        assert_eq!(
            command_for_key(&state, key(KeyCode::Esc)),
            Some(AppCommand::Cancel)
        );
    }

    #[test]
    fn in_place_editor_also_moves_horizontally() {
        let mut state = sample_state();
        let mut store = RecordingStore::default();
        run(
            &mut state,
            &mut store,
            &[
                AppCommand::MoveDown,
                AppCommand::MoveDown,
                AppCommand::MoveDown,
                AppCommand::FocusNext,
                AppCommand::Activate,
            ],
        );
        assert!(matches!(state.modal, Modal::InPlaceEditor(_)));
        assert_eq!(
            command_for_key(&state, key(KeyCode::Char('h'))),
            Some(AppCommand::MoveUp)
        );
        assert_eq!(
            command_for_key(&state, key(KeyCode::Right)),
            Some(AppCommand::MoveDown)
        );
    }

    #[test]
    fn help_closes_on_any_key() {
        let mut state = sample_state();
        state.modal = Modal::Help;
        for event in [
            key(KeyCode::Char('q')),
            key(KeyCode::Enter),
            chord(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(command_for_key(&state, event), Some(AppCommand::Cancel));
        }
    }

    #[test]
    fn template_rows_show_prefix_selection_and_cursor() {
        let mut state = sample_state();
        let mut store = RecordingStore::default();
        run(
            &mut state,
            &mut store,
            &[AppCommand::MoveDown, AppCommand::ToggleSelection],
        );

        let rows = template_list_rows(&state);
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0], ("[ ] AT account_1".to_owned(), false));
        assert_eq!(rows[1], ("[x] AT account_2".to_owned(), true));
        assert_eq!(rows[3].0, "[ ] RT reconciliation_1");
        assert_eq!(rows[11].0, "[ ] SP shared_3");
    }

    #[test]
    fn template_rows_follow_viewport_on_short_terminal() {
        let mut state = sample_state();
        let mut store = RecordingStore::default();
        run(&mut state, &mut store, &[AppCommand::Resize { rows: 13 }]);
        for _ in 0..6 {
            state.dispatch(AppCommand::MoveDown, &mut store);
        }

        let rows = template_list_rows(&state);
        assert_eq!(rows.len(), state.list_height());
        assert_eq!(rows.last(), Some(&("[ ] EF export_1".to_owned(), true)));
    }

    #[test]
    fn empty_list_messages_depend_on_query() {
        let state = AppState::default();
        assert_eq!(
            template_list_rows(&state),
            vec![("No templates found".to_owned(), false)]
        );
        assert_eq!(
            details_rows(&state),
            vec![("No template selected".to_owned(), false)]
        );

        let mut state = sample_state();
        let mut store = RecordingStore::default();
        run(
            &mut state,
            &mut store,
            &[
                AppCommand::StartSearch,
                AppCommand::Input('z'),
                AppCommand::Input('z'),
            ],
        );
        assert_eq!(
            template_list_rows(&state),
            vec![("No templates match search".to_owned(), false)]
        );
    }

    #[test]
    fn details_group_fields_and_highlight_cursor() {
        let mut state = sample_state();
        let mut store = RecordingStore::default();
        run(
            &mut state,
            &mut store,
            &[
                AppCommand::MoveDown,
                AppCommand::MoveDown,
                AppCommand::MoveDown,
                AppCommand::FocusNext,
                AppCommand::MoveDown,
                AppCommand::MoveDown,
            ],
        );
        assert_eq!(state.focus, FocusSection::Details);

        let rows = details_rows(&state);
        let text: Vec<&str> = rows.iter().map(|(line, _)| line.as_str()).collect();
        assert_eq!(
            text,
            vec![
                "Name: reconciliation_1",
                "Type: Reconciliation Text",
                "Path: reconciliation_texts/reconciliation_1",
                "",
                "Configuration:",
                "  reconciliation_type: can_be_reconciled_without_data",
                "  is_active: true",
                "Text parts:",
                "  part_1: text_parts/part_1.liquid",
                "Used in:",
                "  shared_1",
                "  shared_2",
                "  shared_3",
            ]
        );
        let highlighted: Vec<&str> = rows
            .iter()
            .filter(|(_, selected)| *selected)
            .map(|(line, _)| line.as_str())
            .collect();
        assert_eq!(highlighted, vec!["  part_1: text_parts/part_1.liquid"]);
    }

    #[test]
    fn details_mark_read_only_fields_and_show_pending_edit() {
        let mut state = sample_state();
        let mut store = RecordingStore::default();
        run(
            &mut state,
            &mut store,
            &[AppCommand::FocusNext, AppCommand::Activate, AppCommand::MoveDown],
        );
        assert!(matches!(state.modal, Modal::InPlaceEditor(_)));
        assert_eq!(modal_overlay_text(&state), None);

        let rows = details_rows(&state);
        assert!(rows.contains(&("  public: true".to_owned(), true)), "{rows:?}");
        assert!(rows.contains(&(
            "  virtual_account_number: 100 (read-only)".to_owned(),
            false
        )));
        assert!(store.writes.is_empty());
    }

    #[test]
    fn action_menu_overlay_names_selection_and_cursor() {
        let mut state = sample_state();
        let mut store = RecordingStore::default();
        run(
            &mut state,
            &mut store,
            &[
                AppCommand::ToggleSelection,
                AppCommand::Activate,
                AppCommand::MoveDown,
            ],
        );

        let text = modal_overlay_text(&state).unwrap_or_default();
        assert_eq!(
            text,
            "1 template selected\n\n  create\n> import\n  update\n  cancel"
        );
    }

    #[test]
    fn firm_picker_overlay_lists_options_or_empty_notice() {
        let mut state = sample_state();
        let mut store = RecordingStore::with_firms(sample_firm_options());
        run(
            &mut state,
            &mut store,
            &[AppCommand::FocusUp, AppCommand::Activate],
        );
        assert_eq!(
            modal_overlay_text(&state).as_deref(),
            Some("> Acme Accounting (1001) [firm]\n  Northwind Partners (2002) [partner]")
        );

        state.modal = Modal::FirmPicker {
            selected: 0,
            options: Vec::new(),
        };
        assert_eq!(
            modal_overlay_text(&state).as_deref(),
            Some("No firms or partners found")
        );
    }

    #[test]
    fn text_part_overlay_marks_active_buffer() {
        let mut state = sample_state();
        let mut store = RecordingStore::default();
        run(
            &mut state,
            &mut store,
            &[
                AppCommand::MoveDown,
                AppCommand::MoveDown,
                AppCommand::MoveDown,
                AppCommand::FocusNext,
                AppCommand::MoveDown,
                AppCommand::MoveDown,
                AppCommand::Activate,
                AppCommand::ToggleField,
            ],
        );

        let text = modal_overlay_text(&state).unwrap_or_default();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  Name: part_1");
        assert_eq!(lines[1], "> Path: text_parts/part_1.liquid_");
    }

    #[test]
    fn status_bar_hints_follow_input_owner() {
        let mut state = sample_state();
        let mut store = RecordingStore::default();
        let main = status_bar_text(&state);
        assert!(main.starts_with("Templates | "));
        assert!(main.contains("/: search"));

        run(&mut state, &mut store, &[AppCommand::StartSearch]);
        assert!(status_bar_text(&state).contains("esc: clear"));

        run(&mut state, &mut store, &[AppCommand::Cancel, AppCommand::OpenHelp]);
        assert_eq!(status_bar_text(&state), "any key: close");
    }

    #[test]
    fn help_overlay_text_lists_every_section() {
        let help = help_overlay_text();
        for heading in ["navigation:", "templates:", "details:", "firm / host:", "global:"] {
            assert!(help.contains(heading), "{heading}");
        }
        assert!(help.contains("q / ctrl+c"));
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup.width, 50);
        assert_eq!(popup.height, 20);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
    }
}
