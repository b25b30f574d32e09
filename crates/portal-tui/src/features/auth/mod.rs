//! Login feature slice.
//!
//! - `state.rs`: `AuthState` (login slice) and the editable `LoginForm`
//! - `update.rs`: form validation and login result handling
//! - `render.rs`: login screen

mod render;
mod state;
mod update;

pub use render::render_login;
pub(crate) use state::non_empty_or;
pub use state::{AuthState, LOGIN_REJECTED_FALLBACK, LoginField, LoginForm};
pub use update::{LoginOutcome, handle_login_result, validate_login};
