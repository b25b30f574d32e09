//! Core Portal library (config, API client, session storage).

pub mod api;
pub mod config;
pub mod logging;
pub mod session;
pub mod store;
