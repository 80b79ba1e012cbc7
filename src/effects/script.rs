//! Declarative effect scripts.
//!
//! A card's effect is data, not code: an ordered list of instructions
//! over a small, fixed capability surface, interpreted by the two-phase
//! executor. Keeping scripts as tagged values makes them serializable,
//! auditable, and trivially replayable.
//!
//! `SelectTargets` replaces the current target set; every later
//! instruction that applies to `Selected` uses that set. Applying a
//! damage or heal instruction to `Selected` dispatches per target kind
//! (player vs battlefield card) at stage time.

use serde::{Deserialize, Serialize};

use crate::targeting::TargetSelector;

/// Who an instruction applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTarget {
    /// The player casting the spell (or owning the triggering artifact).
    Caster,
    /// The targets chosen by the most recent `SelectTargets`.
    Selected,
}

/// One instruction in an effect script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EffectOp {
    /// Open a targeting prompt; the confirmed targets become the current
    /// target set.
    SelectTargets { selector: TargetSelector },

    /// Deal damage.
    DealDamage { amount: i64, to: EffectTarget },

    /// Heal (clamped at the entity's maximum).
    Heal { amount: i64, to: EffectTarget },

    /// Destroy the selected battlefield cards outright.
    Destroy,

    /// The caster draws cards.
    DrawCards { count: usize },

    /// The caster gains energy (clamped at their maximum).
    GainEnergy { amount: i64 },
}

/// An ordered effect script.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectScript {
    ops: Vec<EffectOp>,
}

impl EffectScript {
    /// Create a script from instructions.
    #[must_use]
    pub fn new(ops: Vec<EffectOp>) -> Self {
        Self { ops }
    }

    /// A targeted damage spell: pick targets, hit each for `amount`.
    #[must_use]
    pub fn targeted_damage(amount: i64, selector: TargetSelector) -> Self {
        Self::new(vec![
            EffectOp::SelectTargets { selector },
            EffectOp::DealDamage {
                amount,
                to: EffectTarget::Selected,
            },
        ])
    }

    /// A targeted heal spell.
    #[must_use]
    pub fn targeted_heal(amount: i64, selector: TargetSelector) -> Self {
        Self::new(vec![
            EffectOp::SelectTargets { selector },
            EffectOp::Heal {
                amount,
                to: EffectTarget::Selected,
            },
        ])
    }

    /// A draw spell.
    #[must_use]
    pub fn draw(count: usize) -> Self {
        Self::new(vec![EffectOp::DrawCards { count }])
    }

    /// An energy-gain effect.
    #[must_use]
    pub fn gain_energy(amount: i64) -> Self {
        Self::new(vec![EffectOp::GainEnergy { amount }])
    }

    /// The instructions in order.
    #[must_use]
    pub fn ops(&self) -> &[EffectOp] {
        &self.ops
    }

    /// Number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the script has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Whether the script ever opens a targeting prompt.
    #[must_use]
    pub fn requires_targeting(&self) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, EffectOp::SelectTargets { .. }))
    }
}
