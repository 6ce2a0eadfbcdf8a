use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::app::{App, FormField};
use crate::ui::theme;

const LABEL_WIDTH: u16 = 14;

/// Quick-add popup drawn over the current screen.
pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let width = 60.min(area.width.saturating_sub(4));
    let height = 11.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let popup = Rect::new(x, y, width, height);

    let field_line = |label: &str, value: &str, field: FormField| {
        let focused = form.field == field;
        let label_style = if focused {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        };
        Line::from(vec![
            Span::styled(
                format!(" {label:<width$}", width = LABEL_WIDTH as usize - 1),
                label_style,
            ),
            Span::styled(value.to_string(), theme::normal_style()),
        ])
    };

    let checkbox = if form.recurring { "[x]" } else { "[ ]" };
    let hint = if form.field == FormField::Category && !app.categories.is_empty() {
        " Up/Down pick a known category"
    } else {
        " Tab next field | Space toggle | Enter save | Esc cancel"
    };

    let lines = vec![
        Line::from(""),
        field_line("Amount", &form.amount, FormField::Amount),
        field_line("Category", &form.category, FormField::Category),
        field_line("Description", &form.description, FormField::Description),
        field_line("Recurring", checkbox, FormField::Recurring),
        Line::from(""),
        Line::from(Span::styled(hint, theme::dim_style())),
    ];

    f.render_widget(Clear, popup);
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .title(Span::styled(
                " Quick Add ",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(widget, popup);

    // Rows inside the border: blank line, then one row per field.
    let (row, text_len) = match form.field {
        FormField::Amount => (2, form.amount.chars().count()),
        FormField::Category => (3, form.category.chars().count()),
        FormField::Description => (4, form.description.chars().count()),
        FormField::Recurring => (5, 1),
    };
    let cursor_x = popup.x + 1 + LABEL_WIDTH + text_len as u16;
    let cursor_y = popup.y + row;
    if cursor_x < popup.x + popup.width.saturating_sub(1) && cursor_y < popup.y + popup.height {
        f.set_cursor_position((cursor_x, cursor_y));
    }
}
