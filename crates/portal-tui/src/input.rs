//! Key bindings.
//!
//! Maps a key press to a `UserAction` for the current screen, or for the
//! open overlay, which takes all input while shown.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use portal_core::session::Screen;

use crate::events::UserAction;
use crate::overlays::Overlay;
use crate::state::AppState;

pub fn action_for_key(app: &AppState, key: KeyEvent) -> Option<UserAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(UserAction::Quit);
    }

    if let Some(overlay) = &app.overlay {
        return overlay_action(overlay, key.code);
    }
    if app.booting {
        return None;
    }

    match app.screen() {
        Screen::Login => match key.code {
            KeyCode::Char('p') if ctrl => Some(UserAction::TogglePassword),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                Some(UserAction::NextField)
            }
            KeyCode::Enter => Some(UserAction::Submit),
            KeyCode::Backspace => Some(UserAction::Backspace),
            KeyCode::Char(c) if !ctrl => Some(UserAction::TypeChar(c)),
            _ => None,
        },
        Screen::OtpVerification => match key.code {
            KeyCode::Char('r') if ctrl => Some(UserAction::ResendOtp),
            KeyCode::Esc => Some(UserAction::Back),
            KeyCode::Enter => Some(UserAction::Submit),
            KeyCode::Backspace => Some(UserAction::Backspace),
            KeyCode::Char(c) if !ctrl => Some(UserAction::TypeChar(c)),
            _ => None,
        },
        Screen::Dashboard => match key.code {
            KeyCode::Char('r') | KeyCode::F(5) => Some(UserAction::Refresh),
            KeyCode::Char('l') => Some(UserAction::RequestLogout),
            KeyCode::Esc => Some(UserAction::Back),
            _ => None,
        },
    }
}

fn overlay_action(overlay: &Overlay, code: KeyCode) -> Option<UserAction> {
    match overlay {
        Overlay::Alert(_) => match code {
            KeyCode::Enter | KeyCode::Esc => Some(UserAction::DismissAlert),
            _ => None,
        },
        Overlay::ConfirmLogout => match code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(UserAction::ConfirmLogout),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(UserAction::CancelLogout),
            _ => None,
        },
    }
}
