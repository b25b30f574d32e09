//! Dashboard feature slice.
//!
//! - `state.rs`: `DashboardState` (dashboard slice) and `CarouselState`
//! - `update.rs`: fetch result handling
//! - `render.rs`: dashboard screen, including the loading and hard-error views

mod render;
mod state;
mod update;

pub use render::render_dashboard;
pub use state::{
    CAROUSEL_INTERVAL, CarouselState, DASHBOARD_REJECTED_FALLBACK, DashboardState,
};
pub use update::handle_dashboard_result;
