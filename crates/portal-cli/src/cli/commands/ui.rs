//! Interactive UI command.

use std::sync::Arc;

use anyhow::{Context, Result};
use portal_core::api::resolve_base_url_with_override;
use portal_core::config::Config;
use portal_core::store::FileStore;

pub fn run(config: &Config, base_url_override: Option<&str>) -> Result<()> {
    let base_url = resolve_base_url_with_override(base_url_override, config.base_url.as_deref())?;

    let _guard = super::init_logging(config);

    let store = Arc::new(FileStore::open_default());
    portal_tui::run_app(&base_url, store).context("portal ui failed")
}
