use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod tabs;
pub mod widgets;

use crate::app::App;
use crate::core::{NotifyLevel, ViewState};
use crate::domain::{self, status};

/// Convert a theme color for the terminal backend
pub fn themed(color: domain::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    tabs::draw_stats_cards(f, areas.stats, app);
    tabs::draw_share_bar(f, areas.share, app);
    tabs::draw_tab_bar(f, areas.tabs, app);
    draw_list_panel(f, areas.list, app);
    draw_detail_panel(f, areas.details, app);
    draw_status_line(f, areas.status_line, app);
    draw_hint_line(f, areas.hint_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let (state_label, state_color) = match app.view_model.state() {
        ViewState::Loading => ("loading", Color::Yellow),
        ViewState::Ready => ("ready", Color::Green),
        ViewState::Error(_) => ("error", Color::Red),
    };
    let line = Line::from(vec![
        Span::styled(
            "Appointments",
            Style::default()
                .fg(themed(app.theme.accent))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("●", Style::default().fg(state_color)),
        Span::raw(format!(" {state_label}  ")),
        Span::styled(
            format!("source: {}", app.source_name),
            Style::default().fg(themed(app.theme.muted)),
        ),
        Span::raw(format!("  total: {}", app.view_model.stats().total)),
    ]);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_list_panel(f: &mut Frame, area: Rect, app: &App) {
    let title = format!("{} appointments", app.view_model.active_tab().title());
    let block = Block::default().title(title).borders(Borders::ALL);

    match app.view_model.state() {
        ViewState::Loading if app.view_model.appointments().is_empty() => {
            draw_placeholder(f, area, block, "Loading appointments…", app);
            return;
        }
        ViewState::Error(message) => {
            let text = format!("Could not load appointments.\n\n{message}\n\nPress r to retry.");
            draw_placeholder(f, area, block, &text, app);
            return;
        }
        _ => {}
    }

    let visible = app.view_model.visible_appointments();
    if visible.is_empty() {
        draw_placeholder(f, area, block, "No appointments in this tab.", app);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|appointment| {
            let status = appointment.status();
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>5} ", appointment.id().to_string()),
                    Style::default().fg(themed(app.theme.muted)),
                ),
                Span::raw(format!("{}  ", appointment.date_time().format("%a %d %b %H:%M"))),
                Span::raw(format!("{:<20} ", appointment.doctor_name())),
                Span::styled(
                    status::label_for(status),
                    Style::default().fg(themed(status::color_for(status, &app.theme))),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");
    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_placeholder(f: &mut Frame, area: Rect, block: Block, text: &str, app: &App) {
    let paragraph = Paragraph::new(text.to_string())
        .style(Style::default().fg(themed(app.theme.muted)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(paragraph, area);
}

fn draw_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("Details").borders(Borders::ALL);
    let Some(appointment) = app.selected_appointment() else {
        f.render_widget(block, area);
        return;
    };
    let status = appointment.status();
    let label_style = Style::default().fg(themed(app.theme.muted));
    let lines = vec![
        Line::from(vec![
            Span::styled("Id:        ", label_style),
            Span::raw(appointment.id().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Doctor:    ", label_style),
            Span::raw(appointment.doctor_name().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Specialty: ", label_style),
            Span::raw(appointment.specialty().to_string()),
        ]),
        Line::from(vec![
            Span::styled("When:      ", label_style),
            Span::raw(appointment.date_time().format("%Y-%m-%d %H:%M UTC").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Status:    ", label_style),
            Span::styled(
                status::label_for(status),
                Style::default()
                    .fg(themed(status::color_for(status, &app.theme)))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let Some((text, level)) = app.status_text() else {
        return;
    };
    let color = match level {
        NotifyLevel::Info => Color::Green,
        NotifyLevel::Warn => Color::Yellow,
        NotifyLevel::Error => Color::Red,
    };
    f.render_widget(
        Paragraph::new(Span::styled(text.to_string(), Style::default().fg(color))),
        area,
    );
}

fn draw_hint_line(f: &mut Frame, area: Rect, app: &App) {
    let hint = "1-5 tab  j/k move  p/a/x/d pending/confirm/cancel/done  r refresh  ? help  q quit";
    f.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(themed(app.theme.muted)))),
        area,
    );
}

fn draw_help_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = layout::centered_rect(60, 60, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Navigation"),
        Line::from("  1-5        Jump to tab"),
        Line::from("  Tab / h / l Cycle tabs"),
        Line::from("  j / k      Move selection"),
        Line::from(""),
        Line::from("Status"),
        Line::from("  p          Mark pending"),
        Line::from("  a          Confirm"),
        Line::from("  x          Cancel"),
        Line::from("  d          Mark completed"),
        Line::from(""),
        Line::from("  r          Refresh"),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from(if app.persist_status {
            "Status changes are saved to the source."
        } else {
            "Status changes stay local to this session."
        }),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}
