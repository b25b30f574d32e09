//! OTP verification feature slice.
//!
//! - `state.rs`: `OtpState` (OTP slice) and the six `OtpInput` cells
//! - `update.rs`: submit validation and verification result handling
//! - `render.rs`: OTP screen

mod render;
mod state;
mod update;

pub use render::render_otp;
pub use state::{OTP_REJECTED_FALLBACK, OtpInput, OtpInputResult, OtpState};
pub use update::{OtpOutcome, handle_otp_result, otp_request, validate_otp};
