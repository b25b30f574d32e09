//! Screen stack.
//!
//! The stack is never empty. `reset` replaces the whole history so that
//! back-navigation cannot return to screens before it.

pub use portal_core::session::Screen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Screen::Login)
    }
}

impl Navigator {
    pub fn new(initial: Screen) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::Login)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Pushes a screen, keeping the current one reachable with `back`.
    pub fn push(&mut self, screen: Screen) {
        tracing::debug!(from = ?self.current(), to = ?screen, "navigate push");
        self.stack.push(screen);
    }

    /// Replaces the history with a single screen.
    pub fn reset(&mut self, screen: Screen) {
        tracing::debug!(from = ?self.current(), to = ?screen, "navigate reset");
        self.stack.clear();
        self.stack.push(screen);
    }

    /// Pops the current screen. Returns false at the root, where back is ignored.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }
}
