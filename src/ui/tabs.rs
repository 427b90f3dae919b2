//! Tab bar and stats cards

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs as RataTabs};
use ratatui::Frame;

use super::{themed, widgets::StatusBar};
use crate::app::App;
use crate::core::ActiveTab;
use crate::domain::{status, AppointmentStatus};

/// Draw the filter tabs; each shows its current count
pub fn draw_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.view_model.stats();
    let titles: Vec<Line> = ActiveTab::ALL
        .iter()
        .map(|tab| {
            let count = match tab.status() {
                Some(status) => stats.count(status),
                None => stats.total,
            };
            Line::from(vec![
                Span::styled(
                    format!("{}:", tab.shortcut()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!("{} ({count})", tab.title())),
            ])
        })
        .collect();

    let active = app.view_model.active_tab();
    let selected = ActiveTab::ALL.iter().position(|t| *t == active).unwrap_or(0);

    let tabs = RataTabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(themed(app.theme.accent))
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");

    f.render_widget(tabs, area);
}

/// One card per status with its count
pub fn draw_stats_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);
    let stats = app.view_model.stats();

    for (status, card) in AppointmentStatus::ALL.iter().zip(cards.iter()) {
        let color = themed(status::color_for(*status, &app.theme));
        let value = if app.view_model.is_ready() {
            stats.count(*status).to_string()
        } else {
            "--".to_string()
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(status::label_for(*status))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        f.render_widget(paragraph, *card);
    }
}

/// Stacked share of each status across the whole collection
pub fn draw_share_bar(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.view_model.stats();
    let segments: Vec<(usize, Color)> = AppointmentStatus::ALL
        .iter()
        .map(|status| {
            (
                stats.count(*status),
                themed(status::color_for(*status, &app.theme)),
            )
        })
        .collect();
    let bar = StatusBar::new(&segments).empty_style(Style::default().fg(themed(app.theme.muted)));
    f.render_widget(bar, area);
}
