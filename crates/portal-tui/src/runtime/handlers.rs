//! Effect handlers.
//!
//! Pure async functions that perform I/O and return the `UiEvent` carrying
//! the result. They never touch `AppState`; the runtime spawns them and
//! routes the returned event through the reducer.

use std::sync::Arc;

use portal_core::api::{
    ApiClient, ApiError, ApiErrorKind, LoginRequest, OtpRequest, UserProfile,
};
use portal_core::session::{self, Boot};
use portal_core::store::KeyValueStore;
use tokio_util::sync::CancellationToken;

use crate::events::UiEvent;

/// Reads the persisted session on a blocking thread.
pub async fn bootstrap(store: Arc<dyn KeyValueStore>) -> UiEvent {
    let boot = tokio::task::spawn_blocking(move || session::bootstrap(store.as_ref()))
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "session read task failed");
            Boot::logged_out()
        });
    UiEvent::SessionLoaded(boot)
}

pub async fn login(client: ApiClient, request: LoginRequest) -> UiEvent {
    let result = client.login(&request).await;
    UiEvent::LoginFinished {
        userid: request.userid,
        result,
    }
}

/// Verifies the code and persists the session when a token is issued.
///
/// A failed write is logged; the in-memory session still proceeds.
pub async fn verify_otp(
    client: ApiClient,
    store: Arc<dyn KeyValueStore>,
    request: OtpRequest,
) -> UiEvent {
    let result = client.verify_otp(&request).await;
    if let Ok(resp) = &result
        && resp.status
        && let Some(token) = resp.token.clone().filter(|t| !t.is_empty())
    {
        let user_id = request.userid;
        run_blocking("persist session", move || {
            session::save_session(store.as_ref(), &token, &user_id)
        })
        .await;
    }
    UiEvent::OtpFinished { result }
}

/// Fetches the dashboard, giving up early if `cancel` fires.
///
/// The returned profile is cached on success.
pub async fn fetch_dashboard(
    client: ApiClient,
    store: Arc<dyn KeyValueStore>,
    token: String,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let fetch = client.fetch_dashboard(&token);
    let result = match &cancel {
        Some(cancel) => tokio::select! {
            () = cancel.cancelled() => {
                tracing::debug!("dashboard fetch cancelled");
                return UiEvent::DashboardFinished {
                    result: Err(ApiError::new(ApiErrorKind::Transport, "Request cancelled")),
                };
            }
            result = fetch => result,
        },
        None => fetch.await,
    };

    if let Ok(resp) = &result
        && resp.status
        && let Some(user) = resp.user.clone()
    {
        run_blocking("cache user profile", move || {
            cache_profile_unless_cancelled(store.as_ref(), &user, cancel.as_ref())
        })
        .await;
    }
    UiEvent::DashboardFinished { result }
}

/// Caches `user` unless the fetch that produced it has been cancelled.
///
/// Logout cancels the fetch before clearing the store, so a cancelled fetch
/// must not write the profile back.
fn cache_profile_unless_cancelled(
    store: &dyn KeyValueStore,
    user: &UserProfile,
    cancel: Option<&CancellationToken>,
) -> anyhow::Result<()> {
    if cancel.is_some_and(CancellationToken::is_cancelled) {
        tracing::debug!("fetch cancelled; profile not cached");
        return Ok(());
    }
    session::cache_user_profile(store, user)
}

/// Clears the persisted session. Local state is reset regardless of the outcome.
pub async fn logout(store: Arc<dyn KeyValueStore>) -> UiEvent {
    run_blocking("clear persisted session", move || {
        session::clear_session(store.as_ref())
    })
    .await;
    UiEvent::LoggedOut
}

/// Runs a store operation on a blocking thread. Failures are logged, not returned.
async fn run_blocking<F>(what: &'static str, f: F)
where
    F: FnOnce() -> anyhow::Result<()> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(error = %format!("{e:#}"), "failed to {what}"),
        Err(e) => tracing::warn!(error = %e, "{what} task failed"),
    }
}
