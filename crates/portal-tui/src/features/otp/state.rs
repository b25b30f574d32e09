use portal_core::api::OTP_LENGTH;
use portal_core::session::Session;

use crate::features::auth::non_empty_or;

/// Fallback when an OTP rejection carries no message.
pub const OTP_REJECTED_FALLBACK: &str = "Invalid OTP. Please try again.";

/// OTP slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpState {
    pub token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl OtpState {
    pub fn verify_pending(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn verify_fulfilled(&mut self, token: String) {
        self.loading = false;
        self.token = Some(token);
        self.error = None;
    }

    pub fn verify_rejected(&mut self, message: &str) {
        self.loading = false;
        self.error = Some(non_empty_or(message, OTP_REJECTED_FALLBACK));
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Merges a persisted token. An absent token leaves the slice untouched.
    pub fn load_token(&mut self, session: &Session) {
        if let Some(token) = session.token.as_deref().filter(|t| !t.is_empty()) {
            self.token = Some(token.to_string());
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Result of typing into the digit cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpInputResult {
    /// Not a digit; nothing changed.
    Rejected,
    Updated,
    /// The last cell was filled and every cell holds a digit.
    Complete(String),
}

/// Six single-digit cells with a focused cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpInput {
    pub digits: [Option<char>; OTP_LENGTH],
    pub focus: usize,
}

impl OtpInput {
    /// Writes a digit into the focused cell and advances focus.
    ///
    /// Completion is only reported when the digit lands in the last cell, so a
    /// code is submitted once per entry of the sixth digit.
    pub fn input(&mut self, c: char) -> OtpInputResult {
        if !c.is_ascii_digit() {
            return OtpInputResult::Rejected;
        }
        let index = self.focus.min(OTP_LENGTH - 1);
        self.digits[index] = Some(c);

        if index + 1 < OTP_LENGTH {
            self.focus = index + 1;
            return OtpInputResult::Updated;
        }
        match self.code() {
            Some(code) => OtpInputResult::Complete(code),
            None => OtpInputResult::Updated,
        }
    }

    /// Clears the focused cell, or moves focus back when it is already empty.
    pub fn backspace(&mut self) {
        let index = self.focus.min(OTP_LENGTH - 1);
        if self.digits[index].is_some() {
            self.digits[index] = None;
        } else if index > 0 {
            self.focus = index - 1;
        }
    }

    /// The full code, if all cells are filled.
    pub fn code(&self) -> Option<String> {
        self.digits.iter().copied().collect()
    }

    pub fn filled(&self) -> usize {
        self.digits.iter().filter(|d| d.is_some()).count()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
