//! Player identification and per-player data.
//!
//! ## PlayerId
//!
//! Type-safe player identifier. Seats are 0-based and fixed for the
//! lifetime of a game; the external identity layer maps display profiles
//! to seats.
//!
//! ## PlayerMap
//!
//! Per-player data storage backed by `Vec` for O(1) access, indexed by
//! `PlayerId`.
//!
//! ## PlayerState
//!
//! The mutable per-player resource pools: health and energy, each with a
//! maximum. All mutation goes through clamping methods; values never go
//! negative and never exceed their maximum.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Player identifier supporting 1-255 players.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// Backed by a `Vec<T>` with one entry per player. The player roster is
/// fixed at game creation; a `PlayerMap` never grows or shrinks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// Mutable per-player resource pools.
///
/// Created once per player at game start and never destroyed; a player at
/// 0 health stays in the roster (the game status transitions instead).
///
/// ## Invariants
///
/// - `0 <= health <= max_health`
/// - `0 <= energy <= max_energy`
///
/// All mutation goes through the clamping methods below, so the invariants
/// hold after every call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Current health.
    pub health: i64,
    /// Maximum health (heal ceiling).
    pub max_health: i64,
    /// Current energy available to pay card costs.
    pub energy: i64,
    /// Maximum energy (refill ceiling, grows each turn up to the cap).
    pub max_energy: i64,
}

impl PlayerState {
    /// Create a player state with full health and no energy.
    #[must_use]
    pub fn new(max_health: i64) -> Self {
        Self {
            health: max_health,
            max_health,
            energy: 0,
            max_energy: 0,
        }
    }

    /// Spend energy. Fails (no mutation) if the player cannot afford it.
    pub fn spend_energy(&mut self, amount: i64) -> bool {
        if amount < 0 || self.energy < amount {
            return false;
        }
        self.energy -= amount;
        true
    }

    /// Gain energy, clamped at `max_energy`.
    pub fn gain_energy(&mut self, amount: i64) {
        self.energy = (self.energy + amount.max(0)).min(self.max_energy);
    }

    /// Grow `max_energy` by one up to `cap`, then refill energy.
    pub fn grow_and_refill_energy(&mut self, cap: i64) {
        self.max_energy = (self.max_energy + 1).min(cap);
        self.energy = self.max_energy;
    }

    /// Apply damage, clamping health at 0. Returns the new health.
    pub fn take_damage(&mut self, amount: i64) -> i64 {
        self.health = (self.health - amount.max(0)).max(0);
        self.health
    }

    /// Heal, clamping at `max_health`.
    pub fn heal(&mut self, amount: i64) {
        self.health = (self.health + amount.max(0)).min(self.max_health);
    }

    /// Check whether the player is still standing.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}
