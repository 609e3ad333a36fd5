use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::app::{AppState, InputMode};

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }
    let rpp = app.rows_per_page.max(1);
    if !app.records.is_empty() && app.selected_index >= app.records.len() {
        app.selected_index = app.records.len() - 1;
    }

    let start = (app.selected_index / rpp) * rpp;
    let end = (start + rpp).min(app.records.len());
    let slice = &app.records[start..end];

    let active = matches!(app.input_mode, InputMode::Normal);
    let rows = slice.iter().enumerate().map(|(i, u)| {
        let absolute_index = start + i;
        let style = if active && absolute_index == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.age.to_string()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(12),
        Constraint::Percentage(30),
        Constraint::Percentage(50),
        Constraint::Length(6),
    ];

    let header = Row::new(vec!["ID", "NAME", "EMAIL", "AGE"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title("Users")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}
