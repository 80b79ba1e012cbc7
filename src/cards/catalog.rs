//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores all card definitions for a game. It is built
//! by an external content source before the game starts and never mutated
//! afterwards; everything in play references it by `CardId`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardId, CardType};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use skirmish::cards::{CardCatalog, CardDefinition, CardId, CardType};
///
/// let mut catalog = CardCatalog::new();
///
/// let bolt = CardDefinition::new(CardId::new(1), "Ember Bolt", 1, CardType::Spell);
/// catalog.register(bolt);
///
/// let found = catalog.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Ember Bolt");
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists - duplicate
    /// content is a build-time error, not a runtime condition.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.cards.insert(card.id, card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Find cards by type.
    pub fn find_by_type(&self, card_type: CardType) -> impl Iterator<Item = &CardDefinition> {
        self.cards
            .values()
            .filter(move |c| c.card_type == card_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut catalog = CardCatalog::new();

        let card = CardDefinition::new(CardId::new(1), "Test Card", 2, CardType::Creature);
        catalog.register(card);

        let found = catalog.get(CardId::new(1));
        assert!(found.is_some());
        assert_eq!(found.unwrap().name, "Test Card");

        assert!(catalog.get(CardId::new(99)).is_none());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let mut catalog = CardCatalog::new();

        catalog.register(CardDefinition::new(CardId::new(1), "A", 1, CardType::Spell));
        catalog.register(CardDefinition::new(CardId::new(1), "B", 2, CardType::Spell));
    }

    #[test]
    fn test_find_by_type() {
        let mut catalog = CardCatalog::new();

        catalog.register(CardDefinition::new(CardId::new(1), "Goblin", 1, CardType::Creature));
        catalog.register(CardDefinition::new(CardId::new(2), "Bolt", 1, CardType::Spell));
        catalog.register(CardDefinition::new(CardId::new(3), "Orc", 2, CardType::Creature));

        assert_eq!(catalog.find_by_type(CardType::Creature).count(), 2);
        assert_eq!(catalog.find_by_type(CardType::Spell).count(), 1);
        assert_eq!(catalog.find_by_type(CardType::Artifact).count(), 0);
    }

    #[test]
    fn test_contains_and_len() {
        let mut catalog = CardCatalog::new();
        assert!(catalog.is_empty());

        catalog.register(CardDefinition::new(CardId::new(1), "Test", 1, CardType::Spell));

        assert!(catalog.contains(CardId::new(1)));
        assert!(!catalog.contains(CardId::new(99)));
        assert_eq!(catalog.len(), 1);
    }
}
