//! Game state and the primitive mutation API.
//!
//! ## GameState
//!
//! The complete shared game document:
//! - Turn progression (current player, turn counter, status)
//! - Per-player resources, hands, battlefields, graveyards
//! - The shared ordered deck (index 0 is the top)
//! - The immutable card catalog
//! - The append-only game log
//!
//! ## Mutation API
//!
//! The primitive operations at the bottom of every rules path. Each one
//! mutates the state in place, is atomic with respect to the caller (no
//! partial multi-field updates), and reports legality failures as a
//! boolean instead of panicking. The external document store provides the
//! serialization point; these methods assume the caller owns the state
//! exclusively for the duration of the call.
//!
//! Persistent `im::Vector`s back the deck and the log so the snapshot
//! clone taken by the effect-staging layer is O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{CardCatalog, CardId, CardType};

use super::config::GameConfig;
use super::log::LogEntry;
use super::player::{PlayerId, PlayerMap, PlayerState};
use super::rng::GameRng;

/// Unique identifier for one physical copy of a card in play.
///
/// Minted when a card enters the battlefield, never reused, distinct from
/// the definition's `CardId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create a new instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// Overall game lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Built but not yet started.
    Waiting,
    /// In progress.
    Playing,
    /// Over (terminal).
    Finished,
}

/// One card copy on a battlefield.
///
/// Invariant: `current_health > 0` for every entry; damage that brings a
/// card to 0 removes it immediately (see `deal_damage_to_card`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattlefieldCard {
    /// Unique per-copy identifier.
    pub instance_id: InstanceId,

    /// Reference into the card catalog.
    pub card_id: CardId,

    /// Has acted this turn; cannot attack again until refreshed.
    pub sapped: bool,

    /// Current health (may be below the definition's health).
    pub current_health: i64,
}

/// The complete game document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    config: GameConfig,

    /// Number of seats; fixed for the game's lifetime.
    player_count: usize,

    /// Index of the player whose turn it is.
    current_player_index: usize,

    /// Turn counter; starts at 1 and increments when play wraps to seat 0.
    pub turn: u32,

    /// Lifecycle status.
    pub status: GameStatus,

    /// Shared draw pile. Index 0 is the top.
    deck: Vector<CardId>,

    /// Immutable per-game card definitions.
    catalog: CardCatalog,

    /// Per-player resource pools.
    players: PlayerMap<PlayerState>,

    /// Per-player hands.
    hands: PlayerMap<Vec<CardId>>,

    /// Per-player battlefields, in play order.
    battlefields: PlayerMap<Vec<BattlefieldCard>>,

    /// Per-player graveyards.
    graveyards: PlayerMap<Vec<CardId>>,

    /// Append-only game log.
    log: Vector<LogEntry>,

    /// Next instance ID to mint.
    next_instance_id: u32,

    /// Deterministic RNG for shuffles.
    pub rng: GameRng,
}

impl GameState {
    /// Create a new game document in `Waiting` status.
    ///
    /// The deck arrives in list order; shuffling and dealing happen when
    /// the game starts.
    #[must_use]
    pub fn new(
        player_count: usize,
        config: GameConfig,
        catalog: CardCatalog,
        deck: Vec<CardId>,
        seed: u64,
    ) -> Self {
        let starting_health = config.starting_health;
        Self {
            config,
            player_count,
            current_player_index: 0,
            turn: 1,
            status: GameStatus::Waiting,
            deck: deck.into_iter().collect(),
            catalog,
            players: PlayerMap::new(player_count, |_| PlayerState::new(starting_health)),
            hands: PlayerMap::with_default(player_count),
            battlefields: PlayerMap::with_default(player_count),
            graveyards: PlayerMap::with_default(player_count),
            log: Vector::new(),
            next_instance_id: 0,
            rng: GameRng::new(seed),
        }
    }

    // === Accessors ===

    /// Get the rule configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Get the number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.player_count)
    }

    /// Index of the current player.
    #[must_use]
    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        PlayerId::new(self.current_player_index as u8)
    }

    /// Check whether it is `player`'s turn.
    #[must_use]
    pub fn is_current_player(&self, player: PlayerId) -> bool {
        self.current_player() == player
    }

    /// Advance the current player one seat; returns true when play
    /// wrapped back to seat 0 (callers increment the turn counter then).
    pub fn advance_current_player(&mut self) -> bool {
        self.current_player_index = (self.current_player_index + 1) % self.player_count;
        self.current_player_index == 0
    }

    /// Get a player's resource pools.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    /// Get a player's resource pools mutably.
    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    /// The card catalog. Immutable after game creation.
    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// Get a player's hand.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[CardId] {
        &self.hands[player]
    }

    /// Get a player's battlefield, in play order.
    #[must_use]
    pub fn battlefield(&self, player: PlayerId) -> &[BattlefieldCard] {
        &self.battlefields[player]
    }

    /// Get a player's graveyard.
    #[must_use]
    pub fn graveyard(&self, player: PlayerId) -> &[CardId] {
        &self.graveyards[player]
    }

    /// Remaining deck size.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    /// The append-only game log, oldest first.
    pub fn game_log(&self) -> impl Iterator<Item = &LogEntry> {
        self.log.iter()
    }

    /// Number of log entries.
    #[must_use]
    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Find a battlefield card by owner and instance.
    #[must_use]
    pub fn find_card(&self, owner: PlayerId, instance: InstanceId) -> Option<&BattlefieldCard> {
        self.battlefields[owner]
            .iter()
            .find(|c| c.instance_id == instance)
    }

    /// Find a battlefield card mutably.
    pub fn find_card_mut(
        &mut self,
        owner: PlayerId,
        instance: InstanceId,
    ) -> Option<&mut BattlefieldCard> {
        self.battlefields[owner]
            .iter_mut()
            .find(|c| c.instance_id == instance)
    }

    /// Look up the card type of a battlefield instance.
    #[must_use]
    pub fn card_type_of(&self, owner: PlayerId, instance: InstanceId) -> Option<CardType> {
        let entry = self.find_card(owner, instance)?;
        self.catalog.get(entry.card_id).map(|d| d.card_type)
    }

    // === Mutation API ===

    /// Append a log entry.
    pub fn add_log_entry(&mut self, entry: LogEntry) {
        self.log.push_back(entry);
    }

    /// Convenience: build and append a log entry.
    pub fn log_action(
        &mut self,
        player: PlayerId,
        action: &str,
        card: Option<CardId>,
        description: impl Into<String>,
    ) {
        self.add_log_entry(LogEntry::new(player, action, card, description));
    }

    /// Spend a player's energy. Fails (no mutation) on insufficient funds.
    pub fn spend_energy(&mut self, player: PlayerId, amount: i64) -> bool {
        self.players[player].spend_energy(amount)
    }

    /// Gain energy, clamped at the player's maximum.
    pub fn gain_energy(&mut self, player: PlayerId, amount: i64) {
        self.players[player].gain_energy(amount);
    }

    /// Remove the first matching card from a player's hand.
    ///
    /// Returns false (no mutation) if the card is not in that hand.
    pub fn remove_card_from_hand(&mut self, player: PlayerId, card_id: CardId) -> bool {
        if let Some(pos) = self.hands[player].iter().position(|&c| c == card_id) {
            self.hands[player].remove(pos);
            true
        } else {
            false
        }
    }

    /// Add a card to a player's hand.
    pub fn add_card_to_hand(&mut self, player: PlayerId, card_id: CardId) {
        self.hands[player].push(card_id);
    }

    /// Add a card to a player's graveyard.
    pub fn add_card_to_graveyard(&mut self, player: PlayerId, card_id: CardId) {
        self.graveyards[player].push(card_id);
    }

    /// Deal damage to a player, clamping health at 0.
    ///
    /// A player reaching 0 health finishes the game (elimination policy).
    pub fn deal_damage_to_player(&mut self, player: PlayerId, amount: i64) {
        let remaining = self.players[player].take_damage(amount);
        if remaining == 0 {
            self.status = GameStatus::Finished;
        }
    }

    /// Heal a player, clamped at their maximum health.
    pub fn heal_player(&mut self, player: PlayerId, amount: i64) {
        self.players[player].heal(amount);
    }

    /// Deal damage to a battlefield card.
    ///
    /// A card brought to 0 or below is removed from the battlefield and
    /// its id appended to the owner's graveyard - always, as part of this
    /// call. Returns false if the instance does not exist.
    pub fn deal_damage_to_card(
        &mut self,
        owner: PlayerId,
        instance: InstanceId,
        amount: i64,
    ) -> bool {
        let Some(card) = self.find_card_mut(owner, instance) else {
            return false;
        };

        card.current_health -= amount.max(0);
        if card.current_health <= 0 {
            self.remove_from_battlefield(owner, instance);
        }
        true
    }

    /// Heal a battlefield card, clamped at its definition health.
    ///
    /// Returns false if the instance does not exist.
    pub fn heal_card(&mut self, owner: PlayerId, instance: InstanceId, amount: i64) -> bool {
        let Some(entry) = self.find_card(owner, instance) else {
            return false;
        };

        let ceiling = self
            .catalog
            .get(entry.card_id)
            .map(|d| d.health_value())
            .unwrap_or(entry.current_health);

        let card = self
            .find_card_mut(owner, instance)
            .expect("card existed above");
        card.current_health = (card.current_health + amount.max(0)).min(ceiling);
        true
    }

    /// Destroy a battlefield card outright, regardless of health.
    ///
    /// Returns false if the instance does not exist.
    pub fn destroy_card(&mut self, owner: PlayerId, instance: InstanceId) -> bool {
        if self.find_card(owner, instance).is_none() {
            return false;
        }
        self.remove_from_battlefield(owner, instance);
        true
    }

    fn remove_from_battlefield(&mut self, owner: PlayerId, instance: InstanceId) {
        if let Some(pos) = self.battlefields[owner]
            .iter()
            .position(|c| c.instance_id == instance)
        {
            let removed = self.battlefields[owner].remove(pos);
            self.graveyards[owner].push(removed.card_id);
        }
    }

    /// Draw the top card of the shared deck into a player's hand.
    ///
    /// Drawing from an empty deck is not an error: it is an observable,
    /// logged no-op. Returns the drawn card id, if any.
    pub fn draw_card(&mut self, player: PlayerId) -> Option<CardId> {
        match self.deck.pop_front() {
            Some(card_id) => {
                self.hands[player].push(card_id);
                self.log_action(
                    player,
                    "draw_card",
                    Some(card_id),
                    format!("{} drew a card", player),
                );
                Some(card_id)
            }
            None => {
                self.log_action(
                    player,
                    "draw_card",
                    None,
                    format!("{} tried to draw from an empty deck", player),
                );
                None
            }
        }
    }

    /// Shuffle the shared deck in place.
    pub fn shuffle_deck(&mut self) {
        let mut cards: Vec<CardId> = self.deck.iter().copied().collect();
        self.rng.shuffle(&mut cards);
        self.deck = cards.into_iter().collect();
    }

    /// Mint a fresh battlefield instance for `card_id` and put it into
    /// play for `owner`. Returns the new instance id.
    ///
    /// New arrivals are unsapped and at full definition health.
    pub fn put_onto_battlefield(&mut self, owner: PlayerId, card_id: CardId) -> InstanceId {
        let instance_id = InstanceId::new(self.next_instance_id);
        self.next_instance_id += 1;

        let health = self
            .catalog
            .get(card_id)
            .map(|d| d.health_value())
            .unwrap_or(0);

        self.battlefields[owner].push(BattlefieldCard {
            instance_id,
            card_id,
            sapped: false,
            current_health: health,
        });

        instance_id
    }

    /// Refresh a player's battlefield at the start of their turn.
    pub fn refresh_battlefield(&mut self, player: PlayerId) {
        for card in self.battlefields[player].iter_mut() {
            card.sapped = false;
        }
    }

    /// Mark a battlefield card as having acted this turn.
    pub fn sap_card(&mut self, owner: PlayerId, instance: InstanceId) -> bool {
        match self.find_card_mut(owner, instance) {
            Some(card) => {
                card.sapped = true;
                true
            }
            None => false,
        }
    }
}
