//! Targets and target legality.
//!
//! Defines what spells and attacks may point at:
//! - `Target`: a player or a battlefield card, structurally comparable
//! - `TargetSelector`: how many targets of what kind a prompt wants
//! - `TargetingContext`: whether the prompt belongs to a spell cast or an
//!   attack (attacks are further restricted by the attacker's policy)
//!
//! Legality is evaluated against the live game state at click time;
//! nothing here caches a snapshot.

use serde::{Deserialize, Serialize};

use crate::cards::CardType;
use crate::core::{GameState, InstanceId, PlayerId};

/// Something a spell or attack points at.
///
/// Equality is structural over (variant, player, instance).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Target {
    /// A player.
    Player { player: PlayerId },
    /// A creature on `owner`'s battlefield.
    Creature { owner: PlayerId, instance: InstanceId },
    /// An artifact on `owner`'s battlefield.
    Artifact { owner: PlayerId, instance: InstanceId },
}

impl Target {
    /// The player this target belongs to (the owner for battlefield
    /// cards, the player themselves otherwise).
    #[must_use]
    pub fn side(&self) -> PlayerId {
        match *self {
            Target::Player { player } => player,
            Target::Creature { owner, .. } | Target::Artifact { owner, .. } => owner,
        }
    }

    /// The battlefield instance, if this targets a card.
    #[must_use]
    pub fn instance(&self) -> Option<InstanceId> {
        match *self {
            Target::Player { .. } => None,
            Target::Creature { instance, .. } | Target::Artifact { instance, .. } => Some(instance),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Target::Player { player } => write!(f, "{}", player),
            Target::Creature { owner, instance } => write!(f, "{}'s creature {}", owner, instance),
            Target::Artifact { owner, instance } => write!(f, "{}'s artifact {}", owner, instance),
        }
    }
}

/// What kind of targets a selector accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Players only.
    Player,
    /// Creatures only.
    Creature,
    /// Players, creatures, and artifacts.
    Any,
}

/// A targeting prompt: how many targets, of what kind, under what rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSelector {
    /// How many targets to pick (at least 1).
    pub count: usize,

    /// What kind of entities qualify.
    pub kind: TargetKind,

    /// Whether the acting player's own side (themselves and their
    /// battlefield cards) is targetable.
    pub can_target_self: bool,

    /// Skip the interactive prompt when exactly one legal target exists.
    pub auto_target: bool,

    /// Prompt text for the rendering layer.
    pub description: String,
}

impl TargetSelector {
    /// Create a selector for a single target of the given kind.
    #[must_use]
    pub fn single(kind: TargetKind, description: impl Into<String>) -> Self {
        Self {
            count: 1,
            kind,
            can_target_self: false,
            auto_target: false,
            description: description.into(),
        }
    }

    /// Set the target count (builder pattern).
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Allow targeting the acting player's own side (builder pattern).
    #[must_use]
    pub fn allow_self(mut self) -> Self {
        self.can_target_self = true;
        self
    }

    /// Enable the single-legal-target shortcut (builder pattern).
    #[must_use]
    pub fn auto(mut self) -> Self {
        self.auto_target = true;
        self
    }
}

/// What a targeting session is for.
///
/// Attacks carry the attacking instance so the attacker's
/// `attack_targeting` policy can further restrict legal target kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetingContext {
    /// Picking targets for a spell being cast.
    Spell { caster: PlayerId },
    /// Picking the defender for an attack.
    Attack {
        attacker_owner: PlayerId,
        attacker: InstanceId,
    },
}

impl TargetingContext {
    /// The player doing the selecting.
    #[must_use]
    pub fn acting_player(&self) -> PlayerId {
        match *self {
            TargetingContext::Spell { caster } => caster,
            TargetingContext::Attack { attacker_owner, .. } => attacker_owner,
        }
    }

    /// Whether this is an attack prompt.
    #[must_use]
    pub fn is_attack(&self) -> bool {
        matches!(self, TargetingContext::Attack { .. })
    }
}

/// Check whether `target` is a legal pick for this selector and context.
#[must_use]
pub fn is_legal_target(
    state: &GameState,
    selector: &TargetSelector,
    context: &TargetingContext,
    target: &Target,
) -> bool {
    // Self-side picks need explicit permission.
    if target.side() == context.acting_player() && !selector.can_target_self {
        return false;
    }

    // Kind must match the selector unless it accepts anything.
    let kind_ok = match (selector.kind, target) {
        (TargetKind::Any, _) => true,
        (TargetKind::Player, Target::Player { .. }) => true,
        (TargetKind::Creature, Target::Creature { .. }) => true,
        _ => false,
    };
    if !kind_ok {
        return false;
    }

    // The target must actually exist, and battlefield variants must agree
    // with the catalog's card type.
    let exists = match *target {
        Target::Player { player } => player.index() < state.player_count(),
        Target::Creature { owner, instance } => {
            state.card_type_of(owner, instance) == Some(CardType::Creature)
        }
        Target::Artifact { owner, instance } => {
            state.card_type_of(owner, instance) == Some(CardType::Artifact)
        }
    };
    if !exists {
        return false;
    }

    // Attacks are additionally gated by the attacker's targeting policy.
    if let TargetingContext::Attack {
        attacker_owner,
        attacker,
    } = *context
    {
        let Some(entry) = state.find_card(attacker_owner, attacker) else {
            return false;
        };
        let Some(def) = state.catalog().get(entry.card_id) else {
            return false;
        };
        let policy = def.targeting_policy();
        let allowed = match target {
            Target::Player { .. } => policy.can_target_players,
            Target::Creature { .. } => policy.can_target_creatures,
            Target::Artifact { .. } => policy.can_target_artifacts,
        };
        if !allowed {
            return false;
        }
    }

    true
}

/// Enumerate every legal target for this selector and context.
#[must_use]
pub fn legal_targets(
    state: &GameState,
    selector: &TargetSelector,
    context: &TargetingContext,
) -> Vec<Target> {
    let mut targets = Vec::new();

    for player in state.player_ids() {
        let candidate = Target::Player { player };
        if is_legal_target(state, selector, context, &candidate) {
            targets.push(candidate);
        }

        for entry in state.battlefield(player) {
            let candidate = match state.catalog().get(entry.card_id).map(|d| d.card_type) {
                Some(CardType::Creature) => Target::Creature {
                    owner: player,
                    instance: entry.instance_id,
                },
                Some(CardType::Artifact) => Target::Artifact {
                    owner: player,
                    instance: entry.instance_id,
                },
                _ => continue,
            };
            if is_legal_target(state, selector, context, &candidate) {
                targets.push(candidate);
            }
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{AttackTargeting, CardCatalog, CardDefinition, CardId, CardType};
    use crate::core::GameConfig;

    fn catalog() -> CardCatalog {
        let mut catalog = CardCatalog::new();
        catalog.register(
            CardDefinition::new(CardId::new(1), "Raider", 2, CardType::Creature).with_stats(3, 2),
        );
        catalog.register(
            CardDefinition::new(CardId::new(2), "Siege Ram", 3, CardType::Creature)
                .with_stats(4, 4)
                .with_attack_targeting(AttackTargeting {
                    can_target_players: false,
                    can_target_creatures: true,
                    can_target_artifacts: true,
                }),
        );
        catalog.register(
            CardDefinition::new(CardId::new(3), "Beacon", 2, CardType::Artifact).with_health(3),
        );
        catalog
    }

    fn state() -> GameState {
        GameState::new(2, GameConfig::default(), catalog(), vec![], 42)
    }

    #[test]
    fn test_target_equality_is_structural() {
        let a = Target::Creature {
            owner: PlayerId::new(0),
            instance: InstanceId::new(5),
        };
        let b = Target::Creature {
            owner: PlayerId::new(0),
            instance: InstanceId::new(5),
        };
        let c = Target::Artifact {
            owner: PlayerId::new(0),
            instance: InstanceId::new(5),
        };

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_self_targeting_requires_permission() {
        let state = state();
        let context = TargetingContext::Spell {
            caster: PlayerId::new(0),
        };

        let selfish = Target::Player {
            player: PlayerId::new(0),
        };

        let no_self = TargetSelector::single(TargetKind::Player, "pick a player");
        assert!(!is_legal_target(&state, &no_self, &context, &selfish));

        let with_self = no_self.allow_self();
        assert!(is_legal_target(&state, &with_self, &context, &selfish));
    }

    #[test]
    fn test_kind_must_match_unless_any() {
        let mut state = state();
        let p1 = PlayerId::new(1);
        let instance = state.put_onto_battlefield(p1, CardId::new(1));
        let context = TargetingContext::Spell {
            caster: PlayerId::new(0),
        };

        let creature = Target::Creature {
            owner: p1,
            instance,
        };
        let player = Target::Player { player: p1 };

        let players_only = TargetSelector::single(TargetKind::Player, "");
        assert!(is_legal_target(&state, &players_only, &context, &player));
        assert!(!is_legal_target(&state, &players_only, &context, &creature));

        let any = TargetSelector::single(TargetKind::Any, "");
        assert!(is_legal_target(&state, &any, &context, &player));
        assert!(is_legal_target(&state, &any, &context, &creature));
    }

    #[test]
    fn test_nonexistent_instance_is_illegal() {
        let state = state();
        let context = TargetingContext::Spell {
            caster: PlayerId::new(0),
        };
        let any = TargetSelector::single(TargetKind::Any, "");

        let ghost = Target::Creature {
            owner: PlayerId::new(1),
            instance: InstanceId::new(99),
        };
        assert!(!is_legal_target(&state, &any, &context, &ghost));
    }

    #[test]
    fn test_variant_must_agree_with_card_type() {
        let mut state = state();
        let p1 = PlayerId::new(1);
        let artifact = state.put_onto_battlefield(p1, CardId::new(3));
        let context = TargetingContext::Spell {
            caster: PlayerId::new(0),
        };
        let any = TargetSelector::single(TargetKind::Any, "");

        // An artifact claimed as a creature is not a legal target.
        let mislabeled = Target::Creature {
            owner: p1,
            instance: artifact,
        };
        assert!(!is_legal_target(&state, &any, &context, &mislabeled));

        let correct = Target::Artifact {
            owner: p1,
            instance: artifact,
        };
        assert!(is_legal_target(&state, &any, &context, &correct));
    }

    #[test]
    fn test_attack_policy_gates_players() {
        let mut state = state();
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        let ram = state.put_onto_battlefield(p0, CardId::new(2)); // cannot hit players
        let enemy = state.put_onto_battlefield(p1, CardId::new(1));

        let selector = TargetSelector::single(TargetKind::Any, "attack");
        let context = TargetingContext::Attack {
            attacker_owner: p0,
            attacker: ram,
        };

        let player_target = Target::Player { player: p1 };
        let creature_target = Target::Creature {
            owner: p1,
            instance: enemy,
        };

        assert!(!is_legal_target(&state, &selector, &context, &player_target));
        assert!(is_legal_target(&state, &selector, &context, &creature_target));
    }

    #[test]
    fn test_legal_targets_enumeration() {
        let mut state = state();
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        state.put_onto_battlefield(p1, CardId::new(1));
        state.put_onto_battlefield(p1, CardId::new(3));

        let selector = TargetSelector::single(TargetKind::Any, "");
        let context = TargetingContext::Spell { caster: p0 };

        let targets = legal_targets(&state, &selector, &context);

        // Opponent, their creature, their artifact. Own side excluded.
        assert_eq!(targets.len(), 3);
        assert!(targets.contains(&Target::Player { player: p1 }));
    }

    #[test]
    fn test_target_serde_round_trip() {
        let target = Target::Creature {
            owner: PlayerId::new(1),
            instance: InstanceId::new(4),
        };

        let json = serde_json::to_string(&target).unwrap();
        assert!(json.contains("\"creature\""));
        let back: Target = serde_json::from_str(&json).unwrap();
        assert_eq!(target, back);
    }
}
