use std::io;

use thiserror::Error;

use crate::cell::Position;
use crate::lifecycle::{GameState, LifecycleEvent};

/// Errors raised by the simulation core.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid state transition: {event:?} while {from:?}")]
    InvalidTransition {
        from: GameState,
        event: LifecycleEvent,
    },

    #[error("no free cell left on the {dimension}x{dimension} field")]
    NoFreeCell { dimension: u16 },

    #[error("game started without a snake head on the field")]
    MissingHead,

    #[error("position {0:?} lies outside the field")]
    OutOfBounds(Position),

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Errors raised while loading or validating a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(#[from] io::Error),

    #[error("config file malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("speed must be between {min} and {max} ms per tick, got {value}")]
    SpeedOutOfRange { value: u64, min: u64, max: u64 },

    #[error("field dimension must be between {min} and {max}, got {value}")]
    FieldDimOutOfRange { value: u16, min: u16, max: u16 },
}

pub type Result<T> = std::result::Result<T, GameError>;
