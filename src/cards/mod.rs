//! Card system: definitions, catalog, and deck construction.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static card data (cost, stats, scripts, policies)
//! - `CardCatalog`: Immutable per-game definition lookup
//! - `build_deck`/`shuffle_deck`/`draw_cards`: deck-list helpers
//!
//! Definitions are reference data: mutable per-copy state (current
//! health, sapped) lives entirely on the battlefield entry.

pub mod catalog;
pub mod deck;
pub mod definition;

pub use catalog::CardCatalog;
pub use deck::{build_deck, draw_cards, shuffle_deck, DeckError};
pub use definition::{
    ArtifactAbility, AttackTargeting, CardDefinition, CardId, CardType, TriggerKind,
};
