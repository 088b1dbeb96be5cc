//! Snake on a wrapping square grid.
//!
//! The simulation core ([`engine`], [`field`], [`snake`], [`cell`]) has no
//! terminal dependencies and is driven tick by tick through a
//! [`ticker::TickSource`]. The [`renderer`] and [`terminal_runtime`] modules
//! attach a ratatui frontend as an [`observer::Observer`].

pub mod cell;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod input;
pub mod lifecycle;
pub mod logging;
pub mod observer;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
pub mod ticker;

pub use engine::{GameEngine, TickOutcome};
pub use error::{ConfigError, GameError, Result};
pub use lifecycle::GameState;
