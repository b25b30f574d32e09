//! Application state.
//!
//! ```text
//! AppState
//! ├── nav: Navigator            (screen stack)
//! ├── auth + login_form         (login slice, form fields)
//! ├── otp + otp_input           (OTP slice, digit cells)
//! ├── dashboard + carousel      (dashboard slice, slide position)
//! ├── task_seq / tasks          (async task ids and lifecycle)
//! └── overlay: Option<Overlay>  (alert or logout confirmation)
//! ```
//!
//! Owned by the runtime and mutated only by the reducer in `update.rs`.

use portal_core::session::Screen;

use crate::common::{TaskSeq, Tasks};
use crate::features::auth::{AuthState, LoginForm};
use crate::features::dashboard::{CarouselState, DashboardState};
use crate::features::otp::{OtpInput, OtpState};
use crate::navigation::Navigator;
use crate::overlays::Overlay;

#[derive(Debug)]
pub struct AppState {
    /// True until the persisted session has been read.
    pub booting: bool,
    pub should_quit: bool,
    pub nav: Navigator,
    pub auth: AuthState,
    pub login_form: LoginForm,
    pub otp: OtpState,
    pub otp_input: OtpInput,
    pub dashboard: DashboardState,
    pub carousel: CarouselState,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    pub overlay: Option<Overlay>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            booting: true,
            should_quit: false,
            nav: Navigator::default(),
            auth: AuthState::default(),
            login_form: LoginForm::default(),
            otp: OtpState::default(),
            otp_input: OtpInput::default(),
            dashboard: DashboardState::default(),
            carousel: CarouselState::default(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            overlay: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.nav.current()
    }

    /// Returns every slice to its initial state. Task ids keep counting.
    pub fn reset_session_state(&mut self) {
        self.auth.reset();
        self.login_form.reset();
        self.otp.reset();
        self.otp_input.reset();
        self.dashboard.reset();
        self.carousel.reset();
        self.overlay = None;
    }
}
