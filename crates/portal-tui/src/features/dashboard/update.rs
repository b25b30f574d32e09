use portal_core::api::{ApiResult, DashboardResponse};

use super::state::{DASHBOARD_REJECTED_FALLBACK, DashboardState};

/// Applies a dashboard fetch result. Failures keep the current data.
pub fn handle_dashboard_result(state: &mut DashboardState, result: ApiResult<DashboardResponse>) {
    match result {
        Ok(resp) if resp.status => {
            tracing::info!(
                carousel = resp.dashboard.as_ref().map_or(0, |d| d.carousel.len()),
                has_user = resp.user.is_some(),
                "dashboard loaded"
            );
            state.fulfilled(resp);
        }
        Ok(resp) => {
            let message = resp.msg.unwrap_or_default();
            tracing::info!(%message, "dashboard rejected");
            state.rejected(if message.trim().is_empty() {
                DASHBOARD_REJECTED_FALLBACK
            } else {
                &message
            });
        }
        Err(e) => {
            tracing::warn!(kind = %e.kind, details = ?e.details, "dashboard fetch failed");
            state.rejected(&e.message);
        }
    }
}
