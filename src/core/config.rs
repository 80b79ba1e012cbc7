//! Game configuration.
//!
//! Numeric rules that vary per game mode are configured at game creation
//! rather than hardcoded in the engine.

use serde::{Deserialize, Serialize};

/// Per-game rule configuration.
///
/// Stored inside `GameState` so the turn machine can read the energy cap
/// on every turn advance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Health each player starts with (also the heal ceiling).
    pub starting_health: i64,

    /// Ceiling for per-turn max-energy growth.
    pub energy_cap: i64,

    /// Cards dealt to each player when the game starts.
    pub starting_hand_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_health: 30,
            energy_cap: 10,
            starting_hand_size: 3,
        }
    }
}
