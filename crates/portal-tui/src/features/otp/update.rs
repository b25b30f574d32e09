//! OTP feature reducer.

use portal_core::api::{ApiResult, OtpRequest, OtpResponse};

use super::state::{OtpInput, OtpState};
use crate::overlays::Alert;

const INVALID_OTP: &str = "Invalid OTP";
const VERIFY_FAILED: &str = "OTP verification failed";
const GENERIC_ERROR: &str = "Something went wrong. Try again.";

#[derive(Debug, PartialEq, Eq)]
pub enum OtpOutcome {
    /// Verified; the token should be persisted and the dashboard shown.
    Proceed { token: String },
    Alert(Alert),
}

/// Builds the request for a manual submit.
pub fn validate_otp(input: &OtpInput, user_id: Option<&str>) -> Result<OtpRequest, Alert> {
    let Some(otp) = input.code() else {
        return Err(Alert::new("Invalid OTP", "Please enter 6 digit OTP"));
    };
    otp_request(user_id, otp)
}

/// Builds the request for a code completed by typing the last digit.
pub fn otp_request(user_id: Option<&str>, otp: String) -> Result<OtpRequest, Alert> {
    match user_id.filter(|id| !id.is_empty()) {
        Some(userid) => Ok(OtpRequest {
            userid: userid.to_string(),
            otp,
        }),
        None => Err(Alert::new("Error", "Please login again.")),
    }
}

/// Applies a verification result to the slice and the digit cells.
///
/// A rejected code clears the cells and refocuses the first one. A transport
/// failure leaves the typed code in place so it can be resubmitted.
pub fn handle_otp_result(
    otp: &mut OtpState,
    input: &mut OtpInput,
    result: ApiResult<OtpResponse>,
) -> OtpOutcome {
    match result {
        Ok(resp) if resp.status => match resp.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                tracing::info!("otp verified");
                otp.verify_fulfilled(token.clone());
                OtpOutcome::Proceed { token }
            }
            None => {
                tracing::warn!("otp accepted without a token");
                otp.verify_rejected(VERIFY_FAILED);
                OtpOutcome::Alert(Alert::new("Error", GENERIC_ERROR))
            }
        },
        Ok(resp) => {
            let message = resp
                .msg
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| INVALID_OTP.to_string());
            tracing::info!(%message, "otp rejected");
            otp.verify_rejected(&message);
            input.reset();
            OtpOutcome::Alert(Alert::new("OTP Verification Failed", message))
        }
        Err(e) => {
            tracing::warn!(kind = %e.kind, details = ?e.details, "otp verification failed");
            otp.verify_rejected(&e.message);
            OtpOutcome::Alert(Alert::new("Error", GENERIC_ERROR))
        }
    }
}
