/// Fallback when a login rejection carries no message.
pub const LOGIN_REJECTED_FALLBACK: &str = "Login failed. Please try again.";

/// Login slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// User id returned by the last successful login or restored at startup.
    pub user_id: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    pub fn login_pending(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn login_fulfilled(&mut self, user_id: String) {
        self.loading = false;
        self.user_id = Some(user_id);
        self.error = None;
    }

    pub fn login_rejected(&mut self, message: &str) {
        self.loading = false;
        self.error = Some(non_empty_or(message, LOGIN_REJECTED_FALLBACK));
    }

    pub fn set_user_id(&mut self, user_id: Option<String>) {
        self.user_id = user_id;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub(crate) fn non_empty_or(message: &str, fallback: &str) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    UserId,
    Password,
}

/// Editable login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub user_id: String,
    pub password: String,
    pub focus: LoginField,
    pub show_password: bool,
}

impl LoginForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::UserId => &mut self.user_id,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if !c.is_control() {
            self.focused_mut().push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            LoginField::UserId => LoginField::Password,
            LoginField::Password => LoginField::UserId,
        };
    }

    pub fn toggle_password(&mut self) {
        self.show_password = !self.show_password;
    }

    /// Password as displayed: masked unless revealed.
    pub fn password_display(&self) -> String {
        if self.show_password {
            self.password.clone()
        } else {
            "•".repeat(self.password.chars().count())
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_transitions() {
        let mut auth = AuthState::default();
        auth.login_rejected("boom");
        auth.login_pending();
        assert!(auth.loading);
        assert!(auth.error.is_none());

        auth.login_fulfilled("S1".to_string());
        assert!(!auth.loading);
        assert_eq!(auth.user_id.as_deref(), Some("S1"));
        assert!(auth.error.is_none());
    }

    #[test]
    fn test_rejected_without_message_uses_fallback() {
        let mut auth = AuthState::default();
        auth.login_pending();
        auth.login_rejected("  ");
        assert!(!auth.loading);
        assert_eq!(auth.error.as_deref(), Some(LOGIN_REJECTED_FALLBACK));
    }

    #[test]
    fn test_form_editing() {
        let mut form = LoginForm::default();
        for c in "S1".chars() {
            form.insert_char(c);
        }
        form.next_field();
        for c in "pw".chars() {
            form.insert_char(c);
        }
        form.insert_char('\n');
        form.backspace();

        assert_eq!(form.user_id, "S1");
        assert_eq!(form.password, "p");
        assert_eq!(form.password_display(), "•");
        form.toggle_password();
        assert_eq!(form.password_display(), "p");
    }
}
