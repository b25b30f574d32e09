//! Session persistence and startup resolution.
//!
//! Storage failures never reach the user: reads that fail are treated as
//! "nothing stored" and writes that fail are logged.

use anyhow::{Context, Result};

use crate::api::UserProfile;
use crate::store::{KeyValueStore, SESSION_KEYS, TOKEN_KEY, USER_DATA_KEY, USER_ID_KEY};

/// Screens of the login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    OtpVerification,
    Dashboard,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::OtpVerification => "OTP Verification",
            Screen::Dashboard => "Dashboard",
        }
    }
}

/// Persisted credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user_id: Option<String>,
}

impl Session {
    /// A session counts as logged in only with a non-empty token.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// Result of reading the store at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boot {
    pub initial: Screen,
    pub session: Session,
}

impl Boot {
    /// Login screen with nothing restored.
    pub fn logged_out() -> Self {
        Self {
            initial: Screen::Login,
            session: Session::default(),
        }
    }
}

/// Reads token and user id together.
///
/// # Errors
/// Returns an error if either key cannot be read; no partial session is
/// returned.
pub fn load_session(store: &dyn KeyValueStore) -> Result<Session> {
    let token = store.get(TOKEN_KEY).context("Failed to read token")?;
    let user_id = store.get(USER_ID_KEY).context("Failed to read user id")?;
    Ok(Session { token, user_id })
}

/// Resolves the initial screen from the persisted session.
///
/// `Dashboard` if and only if a non-empty token is stored; any read error
/// resolves to `Login` with an empty session.
pub fn bootstrap(store: &dyn KeyValueStore) -> Boot {
    match load_session(store) {
        Ok(session) if session.is_authenticated() => {
            tracing::info!(user_id = ?session.user_id, "restored session");
            Boot {
                initial: Screen::Dashboard,
                session,
            }
        }
        Ok(session) => {
            tracing::debug!("no stored token");
            Boot {
                initial: Screen::Login,
                session,
            }
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "session read failed, starting logged out");
            Boot::logged_out()
        }
    }
}

/// Stores the token and user id issued by OTP verification.
///
/// # Errors
/// Returns an error if either write fails. The token is written first.
pub fn save_session(store: &dyn KeyValueStore, token: &str, user_id: &str) -> Result<()> {
    store.set(TOKEN_KEY, token).context("Failed to store token")?;
    store
        .set(USER_ID_KEY, user_id)
        .context("Failed to store user id")?;
    Ok(())
}

/// Caches the user profile from the latest dashboard snapshot.
///
/// # Errors
/// Returns an error if serialization or the write fails.
pub fn cache_user_profile(store: &dyn KeyValueStore, user: &UserProfile) -> Result<()> {
    let json = serde_json::to_string(user).context("Failed to serialize user profile")?;
    store
        .set(USER_DATA_KEY, &json)
        .context("Failed to store user profile")
}

/// Reads the cached user profile, if any.
///
/// # Errors
/// Returns an error if the read fails or the cached value is not valid JSON.
pub fn cached_user_profile(store: &dyn KeyValueStore) -> Result<Option<UserProfile>> {
    let Some(json) = store.get(USER_DATA_KEY).context("Failed to read user profile")? else {
        return Ok(None);
    };
    let user = serde_json::from_str(&json).context("Failed to parse cached user profile")?;
    Ok(Some(user))
}

/// Removes every session key.
///
/// # Errors
/// Returns an error if the store cannot be written.
pub fn clear_session(store: &dyn KeyValueStore) -> Result<()> {
    store
        .remove_all(&SESSION_KEYS)
        .context("Failed to clear session")
}

/// Returns a masked version of a token for display (first 6 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 10 {
        return "***".to_string();
    }
    let head: String = token.chars().take(6).collect();
    format!("{head}...")
}
