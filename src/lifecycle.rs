//! Game lifecycle as an explicit transition table.

use crate::error::{GameError, Result};

/// Lifecycle state of one game. Transitions only move forward.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum GameState {
    #[default]
    Setup,
    Started,
    Ended,
}

/// Events that drive [`GameState`] transitions.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LifecycleEvent {
    Start,
    Tick,
    Collide,
}

impl GameState {
    /// Returns the state reached by applying `event`, or
    /// [`GameError::InvalidTransition`] when the pair is not in the table.
    pub fn transition(self, event: LifecycleEvent) -> Result<Self> {
        match (self, event) {
            (Self::Setup, LifecycleEvent::Start) => Ok(Self::Started),
            (Self::Started, LifecycleEvent::Tick) => Ok(Self::Started),
            (Self::Started, LifecycleEvent::Collide) => Ok(Self::Ended),
            (from, event) => Err(GameError::InvalidTransition { from, event }),
        }
    }

    /// Short lowercase label used by the frontend and in logs.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Started => "started",
            Self::Ended => "ended",
        }
    }
}
