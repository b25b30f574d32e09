//! Auth feature reducer.
//!
//! Handles login form validation and login result processing.

use portal_core::api::{ApiResult, LoginRequest, LoginResponse};

use super::state::{AuthState, LoginForm};
use crate::overlays::Alert;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// What the screen flow should do after a login result.
#[derive(Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted; continue to OTP verification.
    Proceed,
    /// Rejected by the server; show a blocking alert.
    Alert(Alert),
    /// Request failed; the error is shown inline.
    Stay,
}

/// Builds the login request, or the alert explaining why it cannot be sent.
///
/// The user id is trimmed; the password is sent as typed.
pub fn validate_login(form: &LoginForm) -> Result<LoginRequest, Alert> {
    let userid = form.user_id.trim();
    if userid.is_empty() || form.password.trim().is_empty() {
        return Err(Alert::new(
            "Missing Details",
            "Please enter your user ID and password.",
        ));
    }
    Ok(LoginRequest {
        userid: userid.to_string(),
        password: form.password.clone(),
    })
}

/// Applies a login result to the slice.
///
/// A successful response without a user id keeps the id that was submitted.
pub fn handle_login_result(
    auth: &mut AuthState,
    submitted_userid: &str,
    result: ApiResult<LoginResponse>,
) -> LoginOutcome {
    match result {
        Ok(resp) if resp.status => {
            let user_id = resp
                .userid
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| submitted_userid.to_string());
            tracing::info!(%user_id, "login accepted");
            auth.login_fulfilled(user_id);
            LoginOutcome::Proceed
        }
        Ok(resp) => {
            let message = resp
                .msg
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| INVALID_CREDENTIALS.to_string());
            tracing::info!(%message, "login rejected");
            auth.login_rejected(&message);
            LoginOutcome::Alert(Alert::new("Login Failed", message))
        }
        Err(e) => {
            tracing::warn!(kind = %e.kind, details = ?e.details, "login failed");
            auth.login_rejected(&e.message);
            LoginOutcome::Stay
        }
    }
}

#[cfg(test)]
mod tests {
    use portal_core::api::{ApiError, ApiErrorKind};

    use super::*;

    fn form(user_id: &str, password: &str) -> LoginForm {
        LoginForm {
            user_id: user_id.to_string(),
            password: password.to_string(),
            ..LoginForm::default()
        }
    }

    #[test]
    fn test_validate_trims_user_id_only() {
        let request = validate_login(&form("  S1 ", " x ")).unwrap();
        assert_eq!(request.userid, "S1");
        assert_eq!(request.password, " x ");
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert!(validate_login(&form("", "x")).is_err());
        assert!(validate_login(&form("S1", "   ")).is_err());
    }

    #[test]
    fn test_success_stores_user_id() {
        let mut auth = AuthState::default();
        auth.login_pending();
        let outcome = handle_login_result(
            &mut auth,
            "S1",
            Ok(LoginResponse {
                status: true,
                userid: Some("S1".to_string()),
                msg: None,
            }),
        );
        assert_eq!(outcome, LoginOutcome::Proceed);
        assert_eq!(auth.user_id.as_deref(), Some("S1"));
        assert!(auth.error.is_none());
        assert!(!auth.loading);
    }

    #[test]
    fn test_success_without_user_id_keeps_submitted() {
        let mut auth = AuthState::default();
        let outcome = handle_login_result(
            &mut auth,
            "S9",
            Ok(LoginResponse {
                status: true,
                ..LoginResponse::default()
            }),
        );
        assert_eq!(outcome, LoginOutcome::Proceed);
        assert_eq!(auth.user_id.as_deref(), Some("S9"));
    }

    #[test]
    fn test_business_failure_alerts() {
        let mut auth = AuthState::default();
        let outcome = handle_login_result(
            &mut auth,
            "S1",
            Ok(LoginResponse {
                status: false,
                userid: None,
                msg: None,
            }),
        );
        assert_eq!(
            outcome,
            LoginOutcome::Alert(Alert::new("Login Failed", "Invalid credentials"))
        );
        assert_eq!(auth.error.as_deref(), Some("Invalid credentials"));
        assert!(auth.user_id.is_none());
    }

    #[test]
    fn test_transport_failure_is_inline() {
        let mut auth = AuthState::default();
        auth.login_pending();
        let outcome = handle_login_result(
            &mut auth,
            "S1",
            Err(ApiError::new(ApiErrorKind::Transport, "Login failed")),
        );
        assert_eq!(outcome, LoginOutcome::Stay);
        assert_eq!(auth.error.as_deref(), Some("Login failed"));
        assert!(!auth.loading);
    }
}
