//! OTP verification screen view.

use portal_core::api::OTP_LENGTH;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::state::{OtpInput, OtpState};
use crate::common::text::truncate_with_ellipsis;

pub fn render_otp(
    frame: &mut Frame,
    otp: &OtpState,
    input: &OtpInput,
    user_id: Option<&str>,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(4), // heading
            Constraint::Length(2), // cells
            Constraint::Length(2), // status
            Constraint::Length(1), // hints
            Constraint::Min(1),
        ])
        .split(area);

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(
            "OTP Verification",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Enter the 6-digit code sent to your device",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(format!("User ID: {}", user_id.unwrap_or(""))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(heading, chunks[1]);

    frame.render_widget(
        Paragraph::new(cell_line(input, otp.loading)).alignment(Alignment::Center),
        chunks[2],
    );

    let status = if otp.loading {
        Line::from(Span::styled("Verifying...", Style::default().fg(Color::Yellow)))
    } else if let Some(error) = &otp.error {
        Line::from(Span::styled(
            truncate_with_ellipsis(error, area.width as usize),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(status).alignment(Alignment::Center), chunks[3]);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Enter verify · Ctrl+R resend · Esc back",
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center),
        chunks[4],
    );
}

fn cell_line(input: &OtpInput, loading: bool) -> Line<'static> {
    let mut spans = Vec::with_capacity(OTP_LENGTH * 2);
    for (index, digit) in input.digits.iter().enumerate() {
        let focused = !loading && index == input.focus;
        let style = match (focused, digit.is_some()) {
            (true, _) => Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            (false, true) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            (false, false) => Style::default().fg(Color::DarkGray),
        };
        spans.push(Span::styled(format!("[{}]", digit.unwrap_or('_')), style));
        if index + 1 < OTP_LENGTH {
            spans.push(Span::raw(" "));
        }
    }
    Line::from(spans)
}
