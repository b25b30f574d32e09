//! Session command handlers.

use anyhow::{Context, Result};
use portal_core::config::Config;
use portal_core::session::{self, Screen};
use portal_core::store::FileStore;

pub fn status(config: &Config) -> Result<()> {
    let _guard = super::init_logging(config);
    let store = FileStore::open_default();
    let boot = session::bootstrap(&store);

    println!("Screen: {}", boot.initial.title());
    match boot.session.user_id.as_deref() {
        Some(user_id) => println!("User ID: {user_id}"),
        None => println!("User ID: (none)"),
    }
    match boot.session.token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => println!("Token: {}", session::mask_token(token)),
        None => println!("Token: (none)"),
    }

    if boot.initial == Screen::Dashboard {
        match session::cached_user_profile(&store) {
            Ok(Some(user)) => println!("Name: {}", user.display_name()),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "cached profile unreadable");
                eprintln!("Warning: cached profile unreadable: {e:#}");
            }
        }
    }
    Ok(())
}

pub fn logout(config: &Config) -> Result<()> {
    let _guard = super::init_logging(config);
    let store = FileStore::open_default();
    session::clear_session(&store)
        .with_context(|| format!("clear session at {}", store.path().display()))?;
    println!("Logged out");
    Ok(())
}
