//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui Frame, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::features::auth::render_login;
use crate::features::dashboard::render_dashboard;
use crate::features::otp::render_otp;
use crate::navigation::Screen;
use crate::overlays::render_overlay;
use crate::state::AppState;

const TITLE_HEIGHT: u16 = 1;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(TITLE_HEIGHT), Constraint::Min(0)])
        .split(area);

    render_title(app, frame, chunks[0]);

    let body = chunks[1];
    if app.booting {
        let top = body.y + body.height / 2;
        frame.render_widget(
            Paragraph::new(Span::styled("Loading...", Style::default().fg(Color::Yellow)))
                .alignment(Alignment::Center),
            Rect::new(body.x, top, body.width, body.height.min(1)),
        );
    } else {
        match app.screen() {
            Screen::Login => render_login(frame, &app.auth, &app.login_form, body),
            Screen::OtpVerification => render_otp(
                frame,
                &app.otp,
                &app.otp_input,
                app.auth.user_id.as_deref(),
                body,
            ),
            Screen::Dashboard => render_dashboard(frame, &app.dashboard, &app.carousel, body),
        }
    }

    if let Some(overlay) = &app.overlay {
        render_overlay(frame, overlay, area);
    }
}

fn render_title(app: &AppState, frame: &mut Frame, area: Rect) {
    let screen = if app.booting { "" } else { app.screen().title() };
    let line = Line::from(vec![
        Span::styled(
            " Portal ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(screen, Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::overlays::Overlay;

    fn draw(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_booting_shows_loading() {
        let app = AppState::new();
        assert!(draw(&app).contains("Loading..."));
    }

    #[test]
    fn test_login_masks_password() {
        let mut app = AppState::new();
        app.booting = false;
        app.login_form.user_id = "S1".to_string();
        app.login_form.password = "secret".to_string();
        let screen = draw(&app);
        assert!(screen.contains("Welcome Back"));
        assert!(screen.contains("S1"));
        assert!(!screen.contains("secret"));
        assert!(screen.contains("••••••"));
    }

    #[test]
    fn test_otp_shows_user_and_cells() {
        let mut app = AppState::new();
        app.booting = false;
        app.auth.user_id = Some("S1".to_string());
        app.nav.push(Screen::OtpVerification);
        app.otp_input.input('4');
        let screen = draw(&app);
        assert!(screen.contains("User ID: S1"));
        assert!(screen.contains("[4]"));
    }

    #[test]
    fn test_dashboard_hard_error_offers_retry() {
        let mut app = AppState::new();
        app.booting = false;
        app.nav.reset(Screen::Dashboard);
        app.dashboard.rejected("Failed to load dashboard");
        let screen = draw(&app);
        assert!(screen.contains("Failed to load dashboard"));
        assert!(screen.contains("r retry"));
    }

    #[test]
    fn test_alert_overlay_is_drawn() {
        let mut app = AppState::new();
        app.booting = false;
        app.overlay = Some(Overlay::alert("Login Failed", "Invalid credentials"));
        let screen = draw(&app);
        assert!(screen.contains("Login Failed"));
        assert!(screen.contains("Invalid credentials"));
    }
}
