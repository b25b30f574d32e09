//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//!
//! Cancellation is decided by the reducer (`UiEffect::CancelTask`) and
//! carried out by the runtime calling `token.cancel()`.

use portal_core::api::{LoginRequest, OtpRequest};
use tokio_util::sync::CancellationToken;

use crate::common::TaskId;

#[derive(Debug)]
pub enum UiEffect {
    Quit,

    /// Read the persisted session and decide the first screen.
    Bootstrap { task: TaskId },

    Login { task: TaskId, request: LoginRequest },

    /// Verify the code; on success the session is persisted before reporting back.
    VerifyOtp { task: TaskId, request: OtpRequest },

    /// Fetch the dashboard snapshot; the profile is cached on success.
    FetchDashboard { task: TaskId, token: String },

    CancelTask { token: CancellationToken },

    /// Remove every persisted session key.
    Logout { task: TaskId },
}
