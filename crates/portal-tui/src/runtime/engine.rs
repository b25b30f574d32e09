//! Headless core of the runtime.
//!
//! Owns the state, runs the reducer, and executes effects by spawning
//! handlers onto the tokio runtime. Results come back through the inbox
//! channel and are fed to the reducer on the next drain. `TuiRuntime` wraps
//! this with a terminal; tests drive it directly.

use std::future::Future;
use std::sync::Arc;

use portal_core::api::ApiClient;
use portal_core::store::KeyValueStore;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::handlers;
use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::update;

pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

pub struct Engine {
    pub state: AppState,
    client: ApiClient,
    store: Arc<dyn KeyValueStore>,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
}

impl Engine {
    pub fn new(client: ApiClient, store: Arc<dyn KeyValueStore>) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(),
            client,
            store,
            inbox_tx,
            inbox_rx,
        }
    }

    /// Kicks off session bootstrap. Must be called within a tokio runtime.
    pub fn start(&mut self) {
        let effects = update::init(&mut self.state);
        self.execute_effects(effects);
    }

    pub fn dispatch(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        self.execute_effects(effects);
    }

    /// Feeds every queued async result to the reducer. Returns true if any arrived.
    pub fn drain_inbox(&mut self) -> bool {
        let mut any = false;
        while let Ok(event) = self.inbox_rx.try_recv() {
            any = true;
            self.dispatch(event);
        }
        any
    }

    /// Waits for the next async result and feeds it to the reducer.
    /// Returns false if the inbox is closed.
    pub async fn step(&mut self) -> bool {
        match self.inbox_rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Processes inbox events until no task is running.
    pub async fn settle(&mut self) {
        while self.state.tasks.is_any_running() {
            if !self.step().await {
                break;
            }
        }
        self.drain_inbox();
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::CancelTask { token } => {
                token.cancel();
            }
            UiEffect::Bootstrap { task } => {
                let store = self.store.clone();
                self.spawn_task(TaskKind::Bootstrap, task, false, move |_| {
                    handlers::bootstrap(store)
                });
            }
            UiEffect::Login { task, request } => {
                let client = self.client.clone();
                self.spawn_task(TaskKind::Login, task, false, move |_| {
                    handlers::login(client, request)
                });
            }
            UiEffect::VerifyOtp { task, request } => {
                let client = self.client.clone();
                let store = self.store.clone();
                self.spawn_task(TaskKind::VerifyOtp, task, false, move |_| {
                    handlers::verify_otp(client, store, request)
                });
            }
            UiEffect::FetchDashboard { task, token } => {
                let client = self.client.clone();
                let store = self.store.clone();
                self.spawn_task(TaskKind::Dashboard, task, true, move |cancel| {
                    handlers::fetch_dashboard(client, store, token, cancel)
                });
            }
            UiEffect::Logout { task } => {
                let store = self.store.clone();
                self.spawn_task(TaskKind::Logout, task, false, move |_| {
                    handlers::logout(store)
                });
            }
        }
    }

    /// Spawns a task, reporting `TaskStarted` immediately and
    /// `TaskCompleted` with the handler's event when it finishes.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, cancelable: bool, f: F)
    where
        F: FnOnce(Option<CancellationToken>) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = cancelable.then(CancellationToken::new);
        let started = TaskStarted {
            id,
            cancel: cancel.clone(),
        };
        let _ = tx.send(UiEvent::TaskStarted { kind, started });
        tokio::spawn(async move {
            let inner = f(cancel).await;
            let completed = TaskCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }
}
