use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::api::worker::ApiEvent;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, FormMode, InputMode, ModalState};
use crate::ui;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
    events: &Receiver<ApiEvent>,
) -> Result<()> {
    loop {
        for ev in events.try_iter() {
            app.apply_event(ev);
        }

        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Normal => {
                            if !handle_normal_key(app, &key) {
                                break;
                            }
                        }
                        InputMode::Form => handle_form_key(app, key.code),
                        InputMode::Modal => handle_modal_key(app, key.code),
                    }
                }
            }
        }
    }

    Ok(())
}

/// Handle a key press while the table has focus. Returns false to quit.
pub fn handle_normal_key(app: &mut AppState, key: &KeyEvent) -> bool {
    match app.keymap.resolve(key) {
        Some(KeyAction::Quit) => return false,
        Some(KeyAction::Refresh) => app.request_refresh(),
        Some(KeyAction::NewEntry) => app.open_create_form(),
        Some(KeyAction::EditSelection) => app.begin_edit(),
        Some(KeyAction::DeleteSelection) => app.confirm_delete(),
        Some(KeyAction::OpenHelp) => app.show_help(),
        Some(KeyAction::MoveUp) => {
            if app.selected_index > 0 {
                app.selected_index -= 1;
            }
        }
        Some(KeyAction::MoveDown) => {
            if app.selected_index + 1 < app.records.len() {
                app.selected_index += 1;
            }
        }
        Some(KeyAction::MoveLeftPage) | Some(KeyAction::PageUp) => {
            let rpp = app.rows_per_page.max(1);
            app.selected_index = app.selected_index.saturating_sub(rpp);
        }
        Some(KeyAction::MoveRightPage) | Some(KeyAction::PageDown) => {
            let rpp = app.rows_per_page.max(1);
            let new_idx = app.selected_index.saturating_add(rpp);
            app.selected_index = new_idx.min(app.records.len().saturating_sub(1));
        }
        Some(KeyAction::Ignore) | None => {}
    }
    true
}

/// Handle a key press while the form has focus. Esc leaves the form without
/// discarding the buffer; Enter submits it.
pub fn handle_form_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab => {
            app.form_focus = app.form_focus.next();
        }
        KeyCode::BackTab => {
            app.form_focus = app.form_focus.prev();
        }
        KeyCode::Enter => app.submit_form(),
        KeyCode::Backspace => {
            app.form.field_mut(app.form_focus).pop();
        }
        KeyCode::Char(c) => {
            app.form.field_mut(app.form_focus).push(c);
        }
        _ => {}
    }
}

/// Handle a key press while a modal dialog is open.
pub fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::ConfirmDelete { id, selected, .. }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Left | KeyCode::Right => {
                *selected = if *selected == 0 { 1 } else { 0 };
            }
            KeyCode::Enter => {
                if *selected == 0 {
                    let id = id.clone();
                    close_modal(app);
                    app.request_delete(id);
                } else {
                    close_modal(app);
                }
            }
            _ => {}
        },
        Some(ModalState::Info { .. }) => match code {
            KeyCode::Esc | KeyCode::Enter => close_modal(app),
            _ => {}
        },
        None => {}
    }
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    // A dismissed notice returns to wherever the work was: back to the form
    // if an edit is in progress or the buffer holds text, else to the table.
    app.input_mode = if matches!(app.mode, FormMode::Editing(_)) || !app.form.is_empty() {
        InputMode::Form
    } else {
        InputMode::Normal
    };
}
