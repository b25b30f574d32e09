use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Bootstrap,
    Login,
    VerifyOtp,
    Dashboard,
    Logout,
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
    pub cancel: Option<CancellationToken>,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
///
/// The reducer claims an id with `begin` when it emits the effect, so a
/// newer request supersedes an older one even before the runtime reports
/// the older one as started.
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn begin(&mut self, id: TaskId) {
        self.active = Some(id);
        self.cancel = None;
    }

    /// Records the cancel handle of a started task.
    ///
    /// Returns the handle back when the task was already superseded, so the
    /// caller can cancel it.
    pub fn on_started(&mut self, started: &TaskStarted) -> Option<CancellationToken> {
        if self.active == Some(started.id) {
            self.cancel = started.cancel.clone();
            None
        } else {
            started.cancel.clone()
        }
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.clear();
        }
        ok
    }

    /// Forgets the active task and hands back its cancel handle.
    pub fn abandon(&mut self) -> Option<CancellationToken> {
        let cancel = self.cancel.take();
        self.active = None;
        cancel
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub bootstrap: TaskState,
    pub login: TaskState,
    pub verify_otp: TaskState,
    pub dashboard: TaskState,
    pub logout: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::Bootstrap => &self.bootstrap,
            TaskKind::Login => &self.login,
            TaskKind::VerifyOtp => &self.verify_otp,
            TaskKind::Dashboard => &self.dashboard,
            TaskKind::Logout => &self.logout,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Bootstrap => &mut self.bootstrap,
            TaskKind::Login => &mut self.login,
            TaskKind::VerifyOtp => &mut self.verify_otp,
            TaskKind::Dashboard => &mut self.dashboard,
            TaskKind::Logout => &mut self.logout,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.bootstrap.is_running()
            || self.login.is_running()
            || self.verify_otp.is_running()
            || self.dashboard.is_running()
            || self.logout.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_task_supersedes_older() {
        let mut seq = TaskSeq::default();
        let mut state = TaskState::default();

        let first = seq.next_id();
        state.begin(first);
        let second = seq.next_id();
        state.begin(second);

        let stale_token = CancellationToken::new();
        let returned = state.on_started(&TaskStarted {
            id: first,
            cancel: Some(stale_token.clone()),
        });
        assert!(returned.is_some());
        assert!(state.cancel.is_none());

        assert!(!state.finish_if_active(first));
        assert!(state.is_running());
        assert!(state.finish_if_active(second));
        assert!(!state.is_running());
    }

    #[test]
    fn test_abandon_returns_cancel_handle() {
        let mut state = TaskState::default();
        let id = TaskId(7);
        state.begin(id);
        let token = CancellationToken::new();
        assert!(
            state
                .on_started(&TaskStarted {
                    id,
                    cancel: Some(token.clone()),
                })
                .is_none()
        );

        let cancel = state.abandon().unwrap();
        cancel.cancel();
        assert!(token.is_cancelled());
        assert!(!state.is_running());
    }
}
