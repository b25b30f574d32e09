//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.
//!
//! Screen flow: Login → OtpVerification → Dashboard, with Dashboard → Login
//! on logout and OtpVerification → Login on back.

use crossterm::event::Event;
use portal_core::api::OtpRequest;
use portal_core::session::{Boot, Screen};

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::{UiEvent, UserAction};
use crate::features::auth::{self, LoginOutcome};
use crate::features::dashboard;
use crate::features::otp::{self, OtpInputResult, OtpOutcome};
use crate::input;
use crate::overlays::Overlay;
use crate::state::AppState;

/// Effects to run once at startup.
pub fn init(app: &mut AppState) -> Vec<UiEffect> {
    let task = app.task_seq.next_id();
    app.tasks.bootstrap.begin(task);
    vec![UiEffect::Bootstrap { task }]
}

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick { now } => {
            if app.screen() == Screen::Dashboard {
                app.carousel.tick(now, app.dashboard.carousel.len());
            } else {
                app.carousel.reset();
            }
            vec![]
        }
        UiEvent::Terminal(Event::Key(key)) => match input::action_for_key(app, key) {
            Some(action) => handle_action(app, action),
            None => vec![],
        },
        UiEvent::Terminal(_) => vec![],
        UiEvent::Action(action) => handle_action(app, action),

        UiEvent::TaskStarted { kind, started } => {
            match app.tasks.state_mut(kind).on_started(&started) {
                Some(token) => {
                    tracing::debug!(?kind, id = started.id.0, "cancelling superseded task");
                    vec![UiEffect::CancelTask { token }]
                }
                None => vec![],
            }
        }
        UiEvent::TaskCompleted { kind, completed } => {
            if app.tasks.state_mut(kind).finish_if_active(completed.id) {
                update(app, *completed.result)
            } else {
                tracing::debug!(?kind, id = completed.id.0, "ignoring stale task result");
                vec![]
            }
        }

        UiEvent::SessionLoaded(boot) => handle_session_loaded(app, boot),
        UiEvent::LoginFinished { userid, result } => {
            match auth::handle_login_result(&mut app.auth, &userid, result) {
                LoginOutcome::Proceed => {
                    app.otp.clear_error();
                    app.otp_input.reset();
                    app.nav.push(Screen::OtpVerification);
                }
                LoginOutcome::Alert(alert) => app.overlay = Some(Overlay::Alert(alert)),
                LoginOutcome::Stay => {}
            }
            vec![]
        }
        UiEvent::OtpFinished { result } => {
            match otp::handle_otp_result(&mut app.otp, &mut app.otp_input, result) {
                OtpOutcome::Proceed { .. } => {
                    app.login_form.reset();
                    app.otp_input.reset();
                    app.nav.reset(Screen::Dashboard);
                    enter_dashboard(app)
                }
                OtpOutcome::Alert(alert) => {
                    app.overlay = Some(Overlay::Alert(alert));
                    vec![]
                }
            }
        }
        UiEvent::DashboardFinished { result } => {
            dashboard::handle_dashboard_result(&mut app.dashboard, result);
            vec![]
        }
        UiEvent::LoggedOut => {
            app.reset_session_state();
            app.nav.reset(Screen::Login);
            tracing::info!("logged out");
            vec![]
        }
    }
}

fn handle_session_loaded(app: &mut AppState, boot: Boot) -> Vec<UiEffect> {
    app.booting = false;
    app.otp.load_token(&boot.session);
    // A user id without a token is not a session.
    if boot.session.is_authenticated() {
        app.auth.set_user_id(boot.session.user_id.clone());
        if let Some(user_id) = &boot.session.user_id {
            app.login_form.user_id.clone_from(user_id);
        }
    }
    app.nav.reset(boot.initial);
    tracing::info!(screen = ?boot.initial, "session loaded");

    if boot.initial == Screen::Dashboard {
        enter_dashboard(app)
    } else {
        vec![]
    }
}

fn handle_action(app: &mut AppState, action: UserAction) -> Vec<UiEffect> {
    match action {
        UserAction::Quit => {
            app.should_quit = true;
            return vec![UiEffect::Quit];
        }
        UserAction::DismissAlert => {
            if matches!(app.overlay, Some(Overlay::Alert(_))) {
                app.overlay = None;
            }
            return vec![];
        }
        UserAction::ConfirmLogout => {
            if app.overlay == Some(Overlay::ConfirmLogout) {
                app.overlay = None;
                return start_logout(app);
            }
            return vec![];
        }
        UserAction::CancelLogout => {
            if app.overlay == Some(Overlay::ConfirmLogout) {
                app.overlay = None;
            }
            return vec![];
        }
        _ => {}
    }
    if app.overlay.is_some() || app.booting {
        return vec![];
    }

    match app.screen() {
        Screen::Login => handle_login_action(app, action),
        Screen::OtpVerification => handle_otp_action(app, action),
        Screen::Dashboard => handle_dashboard_action(app, action),
    }
}

fn handle_login_action(app: &mut AppState, action: UserAction) -> Vec<UiEffect> {
    match action {
        UserAction::TypeChar(c) => app.login_form.insert_char(c),
        UserAction::Backspace => app.login_form.backspace(),
        UserAction::NextField => app.login_form.next_field(),
        UserAction::TogglePassword => app.login_form.toggle_password(),
        UserAction::Submit if !app.auth.loading => {
            return match auth::validate_login(&app.login_form) {
                Ok(request) => {
                    app.auth.login_pending();
                    let task = app.task_seq.next_id();
                    app.tasks.login.begin(task);
                    vec![UiEffect::Login { task, request }]
                }
                Err(alert) => {
                    app.overlay = Some(Overlay::Alert(alert));
                    vec![]
                }
            };
        }
        _ => {}
    }
    vec![]
}

fn handle_otp_action(app: &mut AppState, action: UserAction) -> Vec<UiEffect> {
    // The digits are frozen while a code is being verified.
    if app.otp.loading {
        return vec![];
    }
    let request = match action {
        UserAction::TypeChar(c) => match app.otp_input.input(c) {
            OtpInputResult::Complete(code) => otp::otp_request(app.auth.user_id.as_deref(), code),
            OtpInputResult::Updated | OtpInputResult::Rejected => return vec![],
        },
        UserAction::Submit => otp::validate_otp(&app.otp_input, app.auth.user_id.as_deref()),
        UserAction::Backspace => {
            app.otp_input.backspace();
            return vec![];
        }
        UserAction::ResendOtp => {
            app.otp_input.reset();
            return vec![];
        }
        UserAction::Back => {
            if app.nav.back() {
                app.otp_input.reset();
                app.otp.clear_error();
            }
            return vec![];
        }
        _ => return vec![],
    };

    match request {
        Ok(request) => submit_otp(app, request),
        Err(alert) => {
            app.overlay = Some(Overlay::Alert(alert));
            vec![]
        }
    }
}

fn submit_otp(app: &mut AppState, request: OtpRequest) -> Vec<UiEffect> {
    app.otp.verify_pending();
    let task = app.task_seq.next_id();
    app.tasks.verify_otp.begin(task);
    vec![UiEffect::VerifyOtp { task, request }]
}

fn handle_dashboard_action(app: &mut AppState, action: UserAction) -> Vec<UiEffect> {
    if app.tasks.state(TaskKind::Logout).is_running() {
        return vec![];
    }
    match action {
        UserAction::Refresh => refresh_dashboard(app, app.dashboard.user.is_some()),
        UserAction::RequestLogout => {
            app.overlay = Some(Overlay::ConfirmLogout);
            vec![]
        }
        // Back from the dashboard is ignored: the stack root is the dashboard.
        UserAction::Back => {
            app.nav.back();
            vec![]
        }
        _ => vec![],
    }
}

/// Loads the dashboard on arrival, if there is a token to load it with.
fn enter_dashboard(app: &mut AppState) -> Vec<UiEffect> {
    app.carousel.reset();
    refresh_dashboard(app, false)
}

/// Starts a fetch, cancelling any fetch still in flight.
fn refresh_dashboard(app: &mut AppState, refreshing: bool) -> Vec<UiEffect> {
    let Some(token) = app.otp.token.clone().filter(|t| !t.is_empty()) else {
        tracing::warn!("no session token; skipping dashboard fetch");
        return vec![];
    };

    let mut effects = Vec::new();
    if let Some(cancel) = app.tasks.dashboard.abandon() {
        effects.push(UiEffect::CancelTask { token: cancel });
    }
    let task = app.task_seq.next_id();
    app.tasks.dashboard.begin(task);
    app.dashboard.pending(refreshing);
    effects.push(UiEffect::FetchDashboard { task, token });
    effects
}

fn start_logout(app: &mut AppState) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    if let Some(cancel) = app.tasks.dashboard.abandon() {
        effects.push(UiEffect::CancelTask { token: cancel });
    }
    let task = app.task_seq.next_id();
    app.tasks.logout.begin(task);
    effects.push(UiEffect::Logout { task });
    effects
}
