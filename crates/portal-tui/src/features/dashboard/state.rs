use std::time::{Duration, Instant};

use portal_core::api::{DEFAULT_COLOR, DashboardResponse, StudentCounts, UserProfile};

use crate::features::auth::non_empty_or;

/// Fallback when a dashboard rejection carries no message.
pub const DASHBOARD_REJECTED_FALLBACK: &str = "Failed to load dashboard data";

/// Interval between carousel slides.
pub const CAROUSEL_INTERVAL: Duration = Duration::from_secs(3);

/// Dashboard slice, flattened from the nested response.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub status: bool,
    pub message: String,
    pub user: Option<UserProfile>,
    pub carousel: Vec<String>,
    pub student: Option<StudentCounts>,
    pub amount: Option<f64>,
    pub color: String,
    pub loading: bool,
    /// Set while a user-requested refresh is in flight; the current data stays visible.
    pub refreshing: bool,
    pub error: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            status: false,
            message: String::new(),
            user: None,
            carousel: Vec::new(),
            student: None,
            amount: None,
            color: DEFAULT_COLOR.to_string(),
            loading: false,
            refreshing: false,
            error: None,
        }
    }
}

impl DashboardState {
    pub fn pending(&mut self, refreshing: bool) {
        self.loading = true;
        self.refreshing = refreshing;
        self.error = None;
    }

    pub fn fulfilled(&mut self, resp: DashboardResponse) {
        let payload = resp.dashboard.unwrap_or_default();

        self.loading = false;
        self.refreshing = false;
        self.status = resp.status;
        self.message = resp.msg.unwrap_or_default();
        self.user = resp.user;
        self.carousel = payload.carousel;
        self.student = payload.student;
        self.amount = payload.amount;
        self.color = payload
            .color
            .and_then(|c| c.dynamic_color)
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COLOR.to_string());
        self.error = None;
    }

    /// Records a failure. Previously loaded data is kept.
    pub fn rejected(&mut self, message: &str) {
        self.loading = false;
        self.refreshing = false;
        self.error = Some(non_empty_or(message, DASHBOARD_REJECTED_FALLBACK));
    }

    /// A failure with nothing to show; the screen offers a retry instead.
    pub fn has_hard_error(&self) -> bool {
        self.error.is_some() && self.user.is_none()
    }

    /// Initial load in progress (as opposed to a refresh over existing data).
    pub fn is_initial_load(&self) -> bool {
        self.loading && !self.refreshing
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Auto-rotating carousel position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarouselState {
    pub index: usize,
    len: usize,
    last_advance: Option<Instant>,
}

impl CarouselState {
    /// Advances the slide when the interval has elapsed.
    ///
    /// Rotation only runs with more than one image. A change in the number of
    /// images restarts from the first slide. Returns true if the index moved.
    pub fn tick(&mut self, now: Instant, len: usize) -> bool {
        if len != self.len {
            let moved = self.index != 0;
            self.len = len;
            self.index = 0;
            self.last_advance = Some(now);
            return moved;
        }
        if len <= 1 {
            return false;
        }
        let last = *self.last_advance.get_or_insert(now);
        if now.saturating_duration_since(last) < CAROUSEL_INTERVAL {
            return false;
        }
        self.index = (self.index + 1) % len;
        self.last_advance = Some(now);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
