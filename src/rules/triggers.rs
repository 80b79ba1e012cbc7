//! Artifact trigger dispatch.
//!
//! On a lifecycle event, the relevant player's battlefield artifacts are
//! walked in battlefield order; each ability bound to the event runs
//! through the collapsed two-phase interpreter. Failures are isolated per
//! artifact: a script error is logged and the remaining triggers still
//! fire.

use crate::cards::TriggerKind;
use crate::core::{GameState, PlayerId};
use crate::effects::{run_trigger_script, EffectScript};

/// Fire every matching artifact ability for a lifecycle event.
pub fn fire_triggers(state: &mut GameState, player: PlayerId, kind: TriggerKind) {
    // Fix the iteration order up front: a trigger may destroy artifacts
    // (including ones that have not fired yet), so walk a snapshot of the
    // battlefield and re-check liveness per entry.
    let lineup: Vec<_> = state
        .battlefield(player)
        .iter()
        .map(|entry| (entry.instance_id, entry.card_id))
        .collect();

    for (instance, card_id) in lineup {
        if state.find_card(player, instance).is_none() {
            continue;
        }
        let Some(def) = state.catalog().get(card_id) else {
            // Stale catalog reference: skip, never crash a live game.
            state.log_action(
                player,
                "trigger_skipped",
                Some(card_id),
                format!("unknown card {} on battlefield", card_id),
            );
            continue;
        };

        let abilities: Vec<(EffectScript, String)> = def
            .abilities_for(kind)
            .map(|a| (a.effect.clone(), a.description.clone()))
            .collect();
        let name = def.name.clone();

        for (script, description) in abilities {
            match run_trigger_script(state, player, &script) {
                Ok(()) => {
                    state.log_action(
                        player,
                        "artifact_trigger",
                        Some(card_id),
                        format!("{} triggered on {}: {}", name, kind, description),
                    );
                }
                Err(err) => {
                    state.log_action(
                        player,
                        "trigger_failed",
                        Some(card_id),
                        format!("{} failed to trigger on {}: {}", name, kind, err),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{
        ArtifactAbility, CardCatalog, CardDefinition, CardId, CardType,
    };
    use crate::core::{GameConfig, GameStatus};
    use crate::effects::{EffectOp, EffectTarget};
    use crate::targeting::{TargetKind, TargetSelector};

    const WELLSPRING: CardId = CardId::new(1);
    const CRACKED_IDOL: CardId = CardId::new(2);
    const GRUNT: CardId = CardId::new(3);

    fn catalog() -> CardCatalog {
        let mut catalog = CardCatalog::new();
        catalog.register(
            CardDefinition::new(WELLSPRING, "Wellspring", 2, CardType::Artifact)
                .with_health(3)
                .with_ability(ArtifactAbility::new(
                    TriggerKind::StartTurn,
                    EffectScript::gain_energy(1),
                    "Gain 1 energy at turn start",
                )),
        );
        // A deliberately broken ability: applies to Selected with no
        // selection, so the script always errors.
        catalog.register(
            CardDefinition::new(CRACKED_IDOL, "Cracked Idol", 1, CardType::Artifact)
                .with_health(2)
                .with_ability(ArtifactAbility::new(
                    TriggerKind::StartTurn,
                    EffectScript::new(vec![EffectOp::DealDamage {
                        amount: 1,
                        to: EffectTarget::Selected,
                    }]),
                    "Misfires",
                )),
        );
        catalog.register(
            CardDefinition::new(GRUNT, "Grunt", 2, CardType::Creature).with_stats(2, 3),
        );
        catalog
    }

    fn playing_state() -> GameState {
        let mut state = GameState::new(2, GameConfig::default(), catalog(), vec![], 42);
        state.status = GameStatus::Playing;
        state
    }

    #[test]
    fn test_matching_trigger_fires() {
        let mut state = playing_state();
        let p0 = PlayerId::new(0);
        state.put_onto_battlefield(p0, WELLSPRING);
        state.player_mut(p0).max_energy = 5;

        fire_triggers(&mut state, p0, TriggerKind::StartTurn);

        assert_eq!(state.player(p0).energy, 1);
        assert!(state
            .game_log()
            .any(|e| e.action == "artifact_trigger" && e.card == Some(WELLSPRING)));
    }

    #[test]
    fn test_non_matching_trigger_does_not_fire() {
        let mut state = playing_state();
        let p0 = PlayerId::new(0);
        state.put_onto_battlefield(p0, WELLSPRING);
        state.player_mut(p0).max_energy = 5;

        fire_triggers(&mut state, p0, TriggerKind::EndTurn);

        assert_eq!(state.player(p0).energy, 0);
    }

    #[test]
    fn test_only_named_players_artifacts_fire() {
        let mut state = playing_state();
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        state.put_onto_battlefield(p1, WELLSPRING);
        state.player_mut(p0).max_energy = 5;
        state.player_mut(p1).max_energy = 5;

        fire_triggers(&mut state, p0, TriggerKind::StartTurn);

        assert_eq!(state.player(p1).energy, 0);
    }

    #[test]
    fn test_failing_trigger_is_isolated() {
        let mut state = playing_state();
        let p0 = PlayerId::new(0);
        // Broken artifact first in battlefield order, healthy one second.
        state.put_onto_battlefield(p0, CRACKED_IDOL);
        state.put_onto_battlefield(p0, WELLSPRING);
        state.player_mut(p0).max_energy = 5;

        fire_triggers(&mut state, p0, TriggerKind::StartTurn);

        // The broken trigger logged a failure; the later one still fired.
        assert!(state.game_log().any(|e| e.action == "trigger_failed"));
        assert_eq!(state.player(p0).energy, 1);
    }

    #[test]
    fn test_creatures_never_trigger() {
        let mut state = playing_state();
        let p0 = PlayerId::new(0);
        state.put_onto_battlefield(p0, GRUNT);
        let before = state.log_len();

        fire_triggers(&mut state, p0, TriggerKind::StartTurn);

        assert_eq!(state.log_len(), before);
    }

    #[test]
    fn test_trigger_with_auto_target_damage() {
        let mut catalog = catalog();
        let turret = CardId::new(10);
        catalog.register(
            CardDefinition::new(turret, "Turret", 3, CardType::Artifact)
                .with_health(2)
                .with_ability(ArtifactAbility::new(
                    TriggerKind::EndTurn,
                    EffectScript::targeted_damage(
                        1,
                        TargetSelector::single(TargetKind::Creature, "").auto(),
                    ),
                    "Pings the lone enemy creature",
                )),
        );
        let mut state = GameState::new(2, GameConfig::default(), catalog, vec![], 42);
        state.status = GameStatus::Playing;
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        state.put_onto_battlefield(p0, turret);
        let enemy = state.put_onto_battlefield(p1, GRUNT);

        fire_triggers(&mut state, p0, TriggerKind::EndTurn);

        assert_eq!(state.find_card(p1, enemy).unwrap().current_health, 2);
    }
}
