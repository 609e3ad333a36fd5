//! Shared UI components (status bar, modal helpers).
//!
//! Contains small building blocks reused by the form and table screens.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, FormMode, InputMode, ModalState};

/// Render the bottom status bar with mode, counts and the last outcome.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Form => match app.mode {
            FormMode::Creating => "FORM(new)",
            FormMode::Editing(_) => "FORM(edit)",
        },
        InputMode::Modal => "MODAL",
    };
    let status = app.status.as_deref().unwrap_or("");
    let msg = format!(
        "mode: {mode}  users:{}  rows/page:{}  {}",
        app.records.len(),
        app.rows_per_page,
        status
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let line_count = message.lines().count().max(1) as u16;
        let max_w = area.width.saturating_sub(6).max(30);
        let width = 56u16.min(max_w);
        let max_h = area.height.saturating_sub(4).max(5);
        let height = (line_count + 4).min(max_h).max(5);
        let rect = centered_rect(width, height, area);
        let p = Paragraph::new(message.clone())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Info")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the delete confirmation modal.
pub fn render_confirm_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::ConfirmDelete { id, name, selected } = state {
        let rect = centered_rect(50, 7, area);
        let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
        let no = if *selected == 1 { "[No]" } else { " No  " };
        let body = format!("Delete user '{}' (id {})?\n\n  {}    {}", name, id, yes, no);
        let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
            Block::default()
                .title("Confirm delete")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}
