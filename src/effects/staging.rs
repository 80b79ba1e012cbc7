//! Staged operations: effects recorded as data.
//!
//! Phase one of spell resolution never touches real state. Instead the
//! interpreter appends `StagedOp`s - primitive mutations with their
//! targets already resolved - to an `OperationLog`. Phase two replays the
//! log against live state in recorded order, inside the synchronous
//! mutation boundary.
//!
//! Replay is tolerant: a staged operation whose battlefield target has
//! since left play degrades to a no-op rather than aborting the rest of
//! the log.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, InstanceId, PlayerId};

/// A primitive mutation with resolved targets, ready for replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StagedOp {
    /// Damage a player (clamped at 0 on replay).
    DamagePlayer { player: PlayerId, amount: i64 },
    /// Damage a battlefield card (death handling on replay).
    DamageCard {
        owner: PlayerId,
        instance: InstanceId,
        amount: i64,
    },
    /// Heal a player.
    HealPlayer { player: PlayerId, amount: i64 },
    /// Heal a battlefield card.
    HealCard {
        owner: PlayerId,
        instance: InstanceId,
        amount: i64,
    },
    /// Destroy a battlefield card outright.
    DestroyCard {
        owner: PlayerId,
        instance: InstanceId,
    },
    /// Draw cards.
    DrawCards { player: PlayerId, count: usize },
    /// Gain energy.
    GainEnergy { player: PlayerId, amount: i64 },
}

impl StagedOp {
    /// Replay this operation against live state.
    pub fn apply(&self, state: &mut GameState) {
        match *self {
            StagedOp::DamagePlayer { player, amount } => {
                state.deal_damage_to_player(player, amount);
            }
            StagedOp::DamageCard {
                owner,
                instance,
                amount,
            } => {
                state.deal_damage_to_card(owner, instance, amount);
            }
            StagedOp::HealPlayer { player, amount } => {
                state.heal_player(player, amount);
            }
            StagedOp::HealCard {
                owner,
                instance,
                amount,
            } => {
                state.heal_card(owner, instance, amount);
            }
            StagedOp::DestroyCard { owner, instance } => {
                state.destroy_card(owner, instance);
            }
            StagedOp::DrawCards { player, count } => {
                for _ in 0..count {
                    state.draw_card(player);
                }
            }
            StagedOp::GainEnergy { player, amount } => {
                state.gain_energy(player, amount);
            }
        }
    }
}

/// The ordered log of staged operations for one spell or trigger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLog {
    ops: Vec<StagedOp>,
}

impl OperationLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation.
    pub fn record(&mut self, op: StagedOp) {
        self.ops.push(op);
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate the recorded operations in order.
    pub fn iter(&self) -> impl Iterator<Item = &StagedOp> {
        self.ops.iter()
    }

    /// Replay every operation in recorded order.
    pub fn apply_all(&self, state: &mut GameState) {
        for op in &self.ops {
            op.apply(state);
        }
    }
}
