//! Append-only game log.
//!
//! Every mutation entry point records a `LogEntry`. The log's vector order
//! is the causal order of mutation application; the timestamp is
//! informational only and no rule ever reads it. The rendering layer
//! consumes the log read-only.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::cards::CardId;

/// One record in the append-only game log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// The player the entry is about.
    pub player: PlayerId,

    /// Short machine-readable action tag ("play_card", "attack", ...).
    pub action: String,

    /// The card involved, if any.
    pub card: Option<CardId>,

    /// Human-readable description for the rendering layer.
    pub description: String,

    /// Wall-clock milliseconds since the Unix epoch when the entry was
    /// appended. Informational only.
    pub timestamp_ms: u64,
}

impl LogEntry {
    /// Create a log entry stamped with the current wall-clock time.
    #[must_use]
    pub fn new(
        player: PlayerId,
        action: impl Into<String>,
        card: Option<CardId>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            player,
            action: action.into(),
            card,
            description: description.into(),
            timestamp_ms: now_ms(),
        }
    }
}

fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry_fields() {
        let entry = LogEntry::new(
            PlayerId::new(1),
            "draw_card",
            Some(CardId::new(3)),
            "Player 1 drew a card",
        );

        assert_eq!(entry.player, PlayerId::new(1));
        assert_eq!(entry.action, "draw_card");
        assert_eq!(entry.card, Some(CardId::new(3)));
        assert!(entry.description.contains("drew"));
    }

    #[test]
    fn test_log_entry_serialization() {
        let entry = LogEntry::new(PlayerId::new(0), "end_turn", None, "Player 0 ended the turn");

        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, deserialized);
    }
}
