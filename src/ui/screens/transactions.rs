use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_date, recurring_label, truncate};

fn title(app: &App) -> String {
    if app.filter.is_empty() {
        format!(" Transactions ({}) ", app.transactions.len())
    } else {
        format!(" Transactions ({}) {} ", app.transactions.len(), app.filter)
    }
}

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title(app), theme::title_style()));

    if app.transactions.is_empty() {
        let msg = if app.filter.is_empty() {
            vec![
                Line::from(""),
                Line::from(Span::styled("No transactions yet", theme::dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Press a or use :add 12.50 Food Lunch",
                    theme::dim_style(),
                )),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No transactions match the current filters",
                    theme::dim_style(),
                )),
                Line::from(""),
                Line::from(Span::styled("Use :clear to reset", theme::dim_style())),
            ]
        };
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Date", "Category", "Amount", "Description", "Recurring"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .transactions
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let style = if i == app.transaction_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(format_date(&txn.timestamp)),
                Cell::from(truncate(&txn.category, 18)),
                Cell::from(Span::styled(
                    format_amount(txn.amount),
                    theme::expense_style(),
                )),
                Cell::from(truncate(&txn.description, 40)),
                Cell::from(recurring_label(txn.recurring)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(20),
        Constraint::Length(16),
        Constraint::Min(20),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
