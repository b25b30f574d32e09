//! UI event types.
//!
//! Everything the reducer reacts to arrives as a `UiEvent`: terminal input,
//! clock ticks, and results of async tasks sent back through the runtime inbox.

use std::time::Instant;

use crossterm::event::Event;
use portal_core::api::{ApiResult, DashboardResponse, LoginResponse, OtpResponse};
use portal_core::session::Boot;

use crate::common::{TaskCompleted, TaskKind, TaskStarted};

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic clock tick driving the carousel.
    Tick { now: Instant },
    Terminal(Event),
    /// A user intent, already decoded from the terminal.
    Action(UserAction),

    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },
    /// Wraps the task's own result event; dropped if the task is stale.
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    SessionLoaded(Boot),
    LoginFinished {
        userid: String,
        result: ApiResult<LoginResponse>,
    },
    OtpFinished {
        result: ApiResult<OtpResponse>,
    },
    DashboardFinished {
        result: ApiResult<DashboardResponse>,
    },
    LoggedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    TypeChar(char),
    Backspace,
    NextField,
    Submit,
    TogglePassword,
    Back,
    ResendOtp,
    Refresh,
    RequestLogout,
    ConfirmLogout,
    CancelLogout,
    DismissAlert,
    Quit,
}
