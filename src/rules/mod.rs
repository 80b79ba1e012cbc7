//! Game rules: combat, triggers, the turn machine, and the engine facade.
//!
//! The facade (`GameEngine`) is the boundary the rendering layer talks
//! to; the submodules hold the individual resolvers it sequences.

pub mod combat;
pub mod engine;
pub mod setup;
pub mod triggers;
pub mod turn;

pub use combat::{attack_creature_with_creature, attack_player_with_creature};
pub use engine::{GameEngine, PendingAction};
pub use setup::GameBuilder;
pub use triggers::fire_triggers;
pub use turn::{end_player_turn, start_game};
