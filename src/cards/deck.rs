//! Deck construction helpers.
//!
//! Decks are ordered lists of card ids built from a copy-count table and
//! validated against the catalog: a deck list that references an unknown
//! card is a content error surfaced here, at build time, never at play
//! time.

use crate::core::GameRng;

use super::catalog::CardCatalog;
use super::definition::CardId;

/// Content error raised while building a deck.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeckError {
    /// The deck list references a card id missing from the catalog.
    UnknownCard(CardId),
}

impl std::fmt::Display for DeckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckError::UnknownCard(id) => {
                write!(f, "deck references unknown card {}", id)
            }
        }
    }
}

impl std::error::Error for DeckError {}

/// Build an ordered deck from a copy-count table.
///
/// Every referenced id must exist in the catalog; the first missing id
/// fails the whole build. Copies of the same card are adjacent in the
/// returned list - shuffle before play.
pub fn build_deck(
    catalog: &CardCatalog,
    counts: &[(CardId, usize)],
) -> Result<Vec<CardId>, DeckError> {
    let mut deck = Vec::new();

    for &(card_id, copies) in counts {
        if !catalog.contains(card_id) {
            return Err(DeckError::UnknownCard(card_id));
        }
        deck.extend(std::iter::repeat(card_id).take(copies));
    }

    Ok(deck)
}

/// Shuffle a deck in place (uniform Fisher-Yates).
pub fn shuffle_deck(deck: &mut [CardId], rng: &mut GameRng) {
    rng.shuffle(deck);
}

/// Split a deck into the first `n` cards and the remainder.
///
/// Preserves order and total count: `drawn ++ remaining == deck`. Asking
/// for more cards than the deck holds drains it.
#[must_use]
pub fn draw_cards(deck: &[CardId], n: usize) -> (Vec<CardId>, Vec<CardId>) {
    let split = n.min(deck.len());
    let (drawn, remaining) = deck.split_at(split);
    (drawn.to_vec(), remaining.to_vec())
}
