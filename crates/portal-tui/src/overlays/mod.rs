//! Modal overlays.
//!
//! An overlay takes over keyboard input until it is dismissed: alerts accept
//! Enter/Esc, the logout confirmation accepts y/n.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Blocking message dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Alert(Alert),
    ConfirmLogout,
}

impl Overlay {
    pub fn alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Alert(Alert::new(title, message))
    }
}

/// Centers a `width` x `height` box in `area`, clamped to fit.
pub fn calculate_overlay_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Clears the background and draws a titled border.
pub fn render_overlay_container(frame: &mut Frame, area: Rect, title: &str, border_color: Color) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
        .title_style(
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(block, area);
}

pub fn render_overlay(frame: &mut Frame, overlay: &Overlay, area: Rect) {
    match overlay {
        Overlay::Alert(alert) => render_alert(frame, alert, area),
        Overlay::ConfirmLogout => render_confirm_logout(frame, area),
    }
}

fn render_alert(frame: &mut Frame, alert: &Alert, area: Rect) {
    let popup = calculate_overlay_area(area, 50, 8);
    render_overlay_container(frame, popup, &alert.title, Color::Yellow);

    let lines = vec![
        Line::from(Span::styled(
            alert.message.clone(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled("Enter to dismiss", Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner(popup),
    );
}

fn render_confirm_logout(frame: &mut Frame, area: Rect) {
    let popup = calculate_overlay_area(area, 44, 7);
    render_overlay_container(frame, popup, "Logout", Color::Red);

    let lines = vec![
        Line::from("Are you sure you want to logout?"),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(" logout   ", Style::default().fg(Color::DarkGray)),
            Span::styled("n", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        inner(popup),
    );
}

fn inner(popup: Rect) -> Rect {
    Rect::new(
        popup.x + 2,
        popup.y + 1,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(2),
    )
}
