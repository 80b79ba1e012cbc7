//! Game setup.
//!
//! `GameBuilder` assembles a `Waiting` game document from a catalog and a
//! validated deck list. Starting the game (shuffle, deal, first turn) is
//! the turn machine's job.

use crate::cards::{CardCatalog, CardId};
use crate::core::{GameConfig, GameState};

/// Builder for a new game.
pub struct GameBuilder {
    player_count: usize,
    config: GameConfig,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self {
            player_count: 2,
            config: GameConfig::default(),
        }
    }
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_count(mut self, count: usize) -> Self {
        assert!((2..=8).contains(&count), "Player count must be 2-8");
        self.player_count = count;
        self
    }

    pub fn starting_health(mut self, health: i64) -> Self {
        self.config.starting_health = health;
        self
    }

    pub fn energy_cap(mut self, cap: i64) -> Self {
        self.config.energy_cap = cap;
        self
    }

    pub fn starting_hand_size(mut self, size: usize) -> Self {
        self.config.starting_hand_size = size;
        self
    }

    /// Build the game document in `Waiting` status.
    ///
    /// The deck should already be validated against the catalog (see
    /// `cards::build_deck`); it is shuffled when the game starts.
    pub fn build(self, catalog: CardCatalog, deck: Vec<CardId>, seed: u64) -> GameState {
        GameState::new(self.player_count, self.config, catalog, deck, seed)
    }
}
