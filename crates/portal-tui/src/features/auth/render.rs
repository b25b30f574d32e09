//! Login screen view.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::state::{AuthState, LoginField, LoginForm};
use crate::common::text::truncate_with_ellipsis;

const FORM_WIDTH: u16 = 48;

pub fn render_login(frame: &mut Frame, auth: &AuthState, form: &LoginForm, area: Rect) {
    let width = FORM_WIDTH.min(area.width);
    let column = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3), // heading
            Constraint::Length(3), // user id
            Constraint::Length(3), // password
            Constraint::Length(2), // status
            Constraint::Length(1), // hints
            Constraint::Min(1),
        ])
        .split(column);

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(
            "Welcome Back",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Sign in to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(heading, chunks[1]);

    let inner_width = width.saturating_sub(4) as usize;
    render_field(
        frame,
        chunks[2],
        "User ID",
        &form.user_id,
        form.focus == LoginField::UserId,
        inner_width,
    );
    render_field(
        frame,
        chunks[3],
        if form.show_password {
            "Password (visible)"
        } else {
            "Password"
        },
        &form.password_display(),
        form.focus == LoginField::Password,
        inner_width,
    );

    let status = if auth.loading {
        Line::from(Span::styled("Signing in...", Style::default().fg(Color::Yellow)))
    } else if let Some(error) = &auth.error {
        Line::from(Span::styled(
            truncate_with_ellipsis(error, width as usize),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(status).alignment(Alignment::Center), chunks[4]);

    let hints = Paragraph::new(Line::from(Span::styled(
        "Tab switch · Enter login · Ctrl+P show password · Ctrl+C quit",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hints, chunks[5]);
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    inner_width: usize,
) {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let mut spans = vec![Span::raw(truncate_with_ellipsis(
        value,
        inner_width.saturating_sub(1),
    ))];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {label} "));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
