//! Terminal UI for the school portal: login, OTP verification, dashboard.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod input;
pub mod navigation;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};
use std::sync::Arc;

use anyhow::Result;
use portal_core::api::ApiClient;
use portal_core::store::KeyValueStore;
pub use runtime::{Engine, TuiRuntime};

/// Runs the interactive UI against `base_url` with the given session store.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
/// Returns an error if no terminal is attached or the terminal fails.
pub fn run_app(base_url: &str, store: Arc<dyn KeyValueStore>) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The portal UI requires a terminal.\n\
             Use `portal status` or `portal logout` for non-interactive use."
        );
    }

    tracing::info!(base_url, "starting portal ui");
    let client = ApiClient::new(base_url);
    let mut runtime = TuiRuntime::new(client, store)?;
    runtime.run()
}
