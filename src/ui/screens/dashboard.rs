use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(10),   // Category distribution
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_distribution(f, chunks[1], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    render_card(
        f,
        cards[0],
        "Total Spent",
        app.summary.total,
        theme::RED,
        format!("{} txns", app.summary.count),
    );
    // Budgeting is not tracked yet; these two stay at zero.
    render_card(
        f,
        cards[1],
        "Available Balance",
        Decimal::ZERO,
        theme::GREEN,
        "not tracked".into(),
    );
    render_card(
        f,
        cards[2],
        "Remaining Budget",
        Decimal::ZERO,
        theme::YELLOW,
        "not tracked".into(),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    amount: Decimal,
    color: ratatui::style::Color,
    subtitle: String,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn chart_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Distribution by Category ",
            theme::title_style(),
        ))
}

fn render_distribution(f: &mut Frame, area: Rect, app: &App) {
    if app.summary.shares.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses yet. Press a to add one",
            theme::dim_style(),
        )))
        .centered()
        .block(chart_block());
        f.render_widget(msg, area);
        return;
    }

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let bars: Vec<Bar> = app
        .summary
        .shares
        .iter()
        .take(12)
        .enumerate()
        .map(|(i, share)| {
            let color = theme::CHART_PALETTE[i % theme::CHART_PALETTE.len()];
            Bar::default()
                .value(share.amount.round().to_u64().unwrap_or(0))
                .text_value(format!("{:.1}%", share.percent))
                .label(Line::from(truncate(&share.category, 10)))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(theme::HEADER_BG).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block())
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1);
    f.render_widget(chart, halves[0]);

    let legend: Vec<Line> = app
        .summary
        .shares
        .iter()
        .enumerate()
        .map(|(i, share)| {
            let color = theme::CHART_PALETTE[i % theme::CHART_PALETTE.len()];
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(color)),
                Span::styled(
                    format!("{:<16}", truncate(&share.category, 16)),
                    theme::normal_style(),
                ),
                Span::styled(
                    format!("{:>16}", format_amount(share.amount)),
                    theme::expense_style(),
                ),
                Span::styled(format!(" {:>5.1}%", share.percent), theme::dim_style()),
            ])
        })
        .collect();

    let legend = Paragraph::new(legend).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" Totals ", theme::title_style())),
    );
    f.render_widget(legend, halves[1]);
}
