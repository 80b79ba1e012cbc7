//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card type: cost,
//! combat stats, the declarative spell effect script, artifact abilities,
//! and the attack-targeting policy. Instance-specific data (current
//! health, sapped) lives on the battlefield entry, never here - the
//! catalog is resolved once per game and only ever read.

use serde::{Deserialize, Serialize};

use crate::effects::EffectScript;

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Ember Bolt"), not a
/// specific copy in play - copies get an `InstanceId` when they enter
/// the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
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

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// The three card categories the rules distinguish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    /// Enters the battlefield, can attack.
    Creature,
    /// One-shot effect, then moves to the graveyard.
    Spell,
    /// Enters the battlefield, hosts triggered abilities.
    Artifact,
}

/// Lifecycle events that artifact abilities can bind to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Fired for the player whose turn just began.
    StartTurn,
    /// Fired for the player whose turn is ending.
    EndTurn,
    /// Fired for the player who played a card.
    PlayCard,
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TriggerKind::StartTurn => "start_turn",
            TriggerKind::EndTurn => "end_turn",
            TriggerKind::PlayCard => "play_card",
        };
        f.write_str(name)
    }
}

/// A triggered ability on an artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactAbility {
    /// Which lifecycle event fires this ability.
    pub trigger: TriggerKind,

    /// The effect script to run when the ability fires.
    pub effect: EffectScript,

    /// Human-readable description for the rendering layer.
    pub description: String,
}

impl ArtifactAbility {
    /// Create a new artifact ability.
    #[must_use]
    pub fn new(trigger: TriggerKind, effect: EffectScript, description: impl Into<String>) -> Self {
        Self {
            trigger,
            effect,
            description: description.into(),
        }
    }
}

/// What kinds of defenders a card may attack.
///
/// Absent policy (`None` on the definition) means everything is allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackTargeting {
    /// May attack players directly.
    pub can_target_players: bool,
    /// May attack creatures.
    pub can_target_creatures: bool,
    /// May attack artifacts.
    pub can_target_artifacts: bool,
}

impl Default for AttackTargeting {
    fn default() -> Self {
        Self {
            can_target_players: true,
            can_target_creatures: true,
            can_target_artifacts: true,
        }
    }
}

/// Static card definition.
///
/// Immutable reference data, looked up by id. Never copied into mutable
/// state; the battlefield references it through `card_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name (for display/debugging).
    pub name: String,

    /// Energy cost to play.
    pub cost: i64,

    /// Card category.
    pub card_type: CardType,

    /// Attack value (creatures; artifacts normally have none).
    pub attack: Option<i64>,

    /// Health value (creatures and artifacts).
    pub health: Option<i64>,

    /// Declarative effect script (spells only).
    pub spell_effect: Option<EffectScript>,

    /// Triggered abilities (artifacts only).
    pub artifact_abilities: Vec<ArtifactAbility>,

    /// Attack-targeting policy. `None` means all defender kinds allowed.
    pub attack_targeting: Option<AttackTargeting>,
}

impl CardDefinition {
    /// Create a new card definition.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, cost: i64, card_type: CardType) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            card_type,
            attack: None,
            health: None,
            spell_effect: None,
            artifact_abilities: Vec::new(),
            attack_targeting: None,
        }
    }

    /// Set combat stats (builder pattern).
    #[must_use]
    pub fn with_stats(mut self, attack: i64, health: i64) -> Self {
        self.attack = Some(attack);
        self.health = Some(health);
        self
    }

    /// Set health only (builder pattern) - typical for artifacts.
    #[must_use]
    pub fn with_health(mut self, health: i64) -> Self {
        self.health = Some(health);
        self
    }

    /// Set the spell effect script (builder pattern).
    #[must_use]
    pub fn with_spell_effect(mut self, effect: EffectScript) -> Self {
        self.spell_effect = Some(effect);
        self
    }

    /// Add an artifact ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: ArtifactAbility) -> Self {
        self.artifact_abilities.push(ability);
        self
    }

    /// Set the attack-targeting policy (builder pattern).
    #[must_use]
    pub fn with_attack_targeting(mut self, policy: AttackTargeting) -> Self {
        self.attack_targeting = Some(policy);
        self
    }

    /// Attack value with missing treated as 0.
    #[must_use]
    pub fn attack_value(&self) -> i64 {
        self.attack.unwrap_or(0)
    }

    /// Health value with missing treated as 0.
    #[must_use]
    pub fn health_value(&self) -> i64 {
        self.health.unwrap_or(0)
    }

    /// Effective attack-targeting policy (default allows everything).
    #[must_use]
    pub fn targeting_policy(&self) -> AttackTargeting {
        self.attack_targeting.unwrap_or_default()
    }

    /// Abilities bound to a specific trigger, in declaration order.
    pub fn abilities_for(&self, trigger: TriggerKind) -> impl Iterator<Item = &ArtifactAbility> {
        self.artifact_abilities
            .iter()
            .filter(move |a| a.trigger == trigger)
    }
}
