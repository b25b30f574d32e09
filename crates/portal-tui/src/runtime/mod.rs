//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! Structure:
//! - `mod.rs`: `TuiRuntime` (terminal, event loop, rendering)
//! - `engine.rs`: `Engine` (state, effect execution, inbox)
//! - `handlers.rs`: async effect handlers

mod engine;
mod handlers;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event;
pub use engine::{Engine, UiEventReceiver, UiEventSender};
use portal_core::api::ApiClient;
use portal_core::store::KeyValueStore;

use crate::events::UiEvent;
use crate::render;
use crate::terminal::{self, PortalTerminal};

/// Interval between `Tick` events.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Poll duration while a request is in flight, so results render promptly.
pub const BUSY_POLL_DURATION: Duration = Duration::from_millis(33);

/// Full-screen TUI runtime.
///
/// The terminal is restored on drop and on panic.
pub struct TuiRuntime {
    terminal: PortalTerminal,
    engine: Engine,
    last_tick: Instant,
}

impl TuiRuntime {
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(client: ApiClient, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal()?;
        Ok(Self {
            terminal,
            engine: Engine::new(client, store),
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error if reading terminal events or drawing fails.
    pub fn run(&mut self) -> Result<()> {
        self.engine.start();
        let mut dirty = true;

        while !self.engine.state.should_quit {
            let events = self.collect_events()?;
            if !events.is_empty() {
                dirty = true;
            }
            for event in events {
                self.engine.dispatch(event);
            }
            if self.engine.drain_inbox() {
                dirty = true;
            }

            if dirty {
                let state = &self.engine.state;
                self.terminal.draw(|frame| render::render(state, frame))?;
                dirty = false;
            }
        }
        Ok(())
    }

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let poll_limit = if self.engine.state.tasks.is_any_running() {
            BUSY_POLL_DURATION
        } else {
            TICK_INTERVAL
        };
        let poll_duration = poll_limit.min(TICK_INTERVAL.saturating_sub(self.last_tick.elapsed()));

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= TICK_INTERVAL {
            let now = Instant::now();
            events.push(UiEvent::Tick { now });
            self.last_tick = now;
        }
        Ok(events)
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
