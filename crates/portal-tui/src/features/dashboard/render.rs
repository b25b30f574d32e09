//! Dashboard screen view.

use portal_core::api::{StudentCounts, format_rupees};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::state::{CarouselState, DashboardState};
use crate::common::text::{parse_hex_color, truncate_with_ellipsis};

const QUICK_ACTIONS: [&str; 4] = ["Attendance", "Reports", "Notices", "Settings"];
const FALLBACK_ACCENT: Color = Color::Rgb(0x66, 0x7e, 0xea);

pub fn render_dashboard(
    frame: &mut Frame,
    state: &DashboardState,
    carousel: &CarouselState,
    area: Rect,
) {
    let accent = parse_hex_color(&state.color).unwrap_or(FALLBACK_ACCENT);

    if state.is_initial_load() {
        render_centered(
            frame,
            area,
            vec![Line::from(Span::styled(
                "Loading Dashboard...",
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ))],
        );
        return;
    }

    if state.has_hard_error() {
        let error = state.error.as_deref().unwrap_or_default();
        render_centered(
            frame,
            area,
            vec![
                Line::from(Span::styled("⚠", Style::default().fg(Color::Yellow))),
                Line::from(Span::styled(
                    truncate_with_ellipsis(error, area.width as usize),
                    Style::default().fg(Color::Red),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "r retry · l logout",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // header
            Constraint::Length(4), // carousel
            Constraint::Length(5), // students
            Constraint::Length(3), // fees
            Constraint::Length(3), // quick actions
            Constraint::Min(0),
            Constraint::Length(1), // status
        ])
        .split(area);

    render_header(frame, state, accent, chunks[0]);
    render_carousel(frame, state, carousel, accent, chunks[1]);
    if let Some(student) = state.student {
        render_students(frame, student, accent, chunks[2]);
    }
    if let Some(amount) = state.amount {
        let block = section_block("Fees Collected", accent);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format_rupees(amount),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )))
            .block(block),
            chunks[3],
        );
    }
    render_quick_actions(frame, accent, chunks[4]);
    render_status(frame, state, chunks[6]);
}

fn render_centered(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let height = lines.len() as u16;
    let top = area.y + area.height.saturating_sub(height) / 2;
    let target = Rect::new(area.x, top, area.width, height.min(area.height));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), target);
}

fn section_block(title: &str, accent: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(format!(" {title} "))
}

fn render_header(frame: &mut Frame, state: &DashboardState, accent: Color, area: Rect) {
    let (initial, name, user_id) = match &state.user {
        Some(user) => (
            user.initial(),
            user.display_name().to_string(),
            user.userid.clone().unwrap_or_default(),
        ),
        None => ('U', "User".to_string(), String::new()),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {initial} "),
                Style::default()
                    .fg(Color::Black)
                    .bg(accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  Welcome Back,"),
        ]),
        Line::from(Span::styled(
            name,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("ID: {user_id}"),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(section_block("Dashboard", accent)),
        area,
    );
}

fn render_carousel(
    frame: &mut Frame,
    state: &DashboardState,
    carousel: &CarouselState,
    accent: Color,
    area: Rect,
) {
    if state.carousel.is_empty() {
        return;
    }
    let index = carousel.index.min(state.carousel.len() - 1);
    let width = area.width.saturating_sub(2) as usize;

    let dots: Vec<Span> = (0..state.carousel.len())
        .map(|i| {
            if i == index {
                Span::styled("● ", Style::default().fg(accent))
            } else {
                Span::styled("○ ", Style::default().fg(Color::DarkGray))
            }
        })
        .collect();

    let lines = vec![
        Line::from(truncate_with_ellipsis(&state.carousel[index], width)),
        Line::from(dots),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(section_block("Highlights", accent)),
        area,
    );
}

fn render_students(frame: &mut Frame, student: StudentCounts, accent: Color, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled("Boys   ", Style::default().fg(Color::Cyan)),
            Span::raw(student.boys.to_string()),
            Span::styled("    Girls  ", Style::default().fg(Color::Magenta)),
            Span::raw(student.girls.to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Total Students  ", Style::default().fg(accent)),
            Span::styled(
                student.total().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(section_block("Student Statistics", accent)),
        area,
    );
}

fn render_quick_actions(frame: &mut Frame, accent: Color, area: Rect) {
    let mut spans = Vec::with_capacity(QUICK_ACTIONS.len() * 2);
    for action in QUICK_ACTIONS {
        spans.push(Span::styled(
            format!("[{action}]"),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::raw("  "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(section_block("Quick Actions", accent)),
        area,
    );
}

fn render_status(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let line = if state.refreshing {
        Line::from(Span::styled("Refreshing...", Style::default().fg(Color::Yellow)))
    } else if let Some(error) = &state.error {
        Line::from(Span::styled(
            truncate_with_ellipsis(error, area.width as usize),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::from(Span::styled(
            "r refresh · l logout · Ctrl+C quit",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}
