//! The action registry: a closed, immutable kind-to-handler table.

use std::collections::HashMap;
use std::sync::Arc;

use chronomancer_core::power::ActionKind;

use crate::handlers::{
    CombineHandler, LockHandler, PowerHandler, ResetHandler, StealHandler, UnlockHandler,
    WinHandler,
};

/// Maps each action kind to its handler. Built once and injected into the
/// scheduler, so tests can rebind kinds to doubles.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<ActionKind, Arc<dyn PowerHandler>>,
}

impl HandlerRegistry {
    /// The production table covering all six kinds.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with_handler(ActionKind::Locking, Arc::new(LockHandler))
            .with_handler(ActionKind::Unlocking, Arc::new(UnlockHandler))
            .with_handler(ActionKind::Resetting, Arc::new(ResetHandler))
            .with_handler(ActionKind::Stealing, Arc::new(StealHandler))
            .with_handler(ActionKind::Combining, Arc::new(CombineHandler))
            .with_handler(ActionKind::Winning, Arc::new(WinHandler))
    }

    /// A table with no bindings, as a base for test doubles.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Returns the table with this kind rebound.
    #[must_use]
    pub fn with_handler(mut self, kind: ActionKind, handler: Arc<dyn PowerHandler>) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    /// Looks up the handler bound to a kind.
    #[must_use]
    pub fn get(&self, kind: ActionKind) -> Option<&Arc<dyn PowerHandler>> {
        self.handlers.get(&kind)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
