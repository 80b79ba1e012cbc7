//! Core engine types: players, configuration, RNG, log, and game state.
//!
//! This module contains the game document and the primitive mutation API
//! that every rules path bottoms out in.

pub mod config;
pub mod log;
pub mod player;
pub mod rng;
pub mod state;

pub use config::GameConfig;
pub use log::LogEntry;
pub use player::{PlayerId, PlayerMap, PlayerState};
pub use rng::{GameRng, GameRngState};
pub use state::{BattlefieldCard, GameState, GameStatus, InstanceId};
