use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, FormField, FormMode, InputMode};

pub fn render_form(f: &mut Frame, area: Rect, app: &AppState) {
    let title = match &app.mode {
        FormMode::Creating => "Add user".to_string(),
        FormMode::Editing(id) => format!("Edit user ({id})"),
    };
    let active = matches!(app.input_mode, InputMode::Form);

    let field_line = |field: FormField, label: &str| {
        let marker = if active && app.form_focus == field {
            "▶"
        } else {
            " "
        };
        let cursor = if active && app.form_focus == field {
            "_"
        } else {
            ""
        };
        format!("{} {} {}{}", marker, label, app.form.field(field), cursor)
    };

    let mut lines = vec![
        field_line(FormField::Name, "Name: "),
        field_line(FormField::Email, "Email:"),
        format!("{}  (0-200)", field_line(FormField::Age, "Age:  ")),
        String::new(),
    ];
    lines.push(if active {
        "Enter: save  Tab: next field  Esc: back to list".to_string()
    } else {
        "n: new entry  Enter/e: edit selection".to_string()
    });

    let p = Paragraph::new(lines.join("\n"))
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if active {
                    app.theme.title
                } else {
                    app.theme.border
                })),
        );
    f.render_widget(p, area);
}
