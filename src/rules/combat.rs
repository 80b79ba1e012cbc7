//! Combat resolution.
//!
//! Attack legality and damage between battlefield cards and players.
//! Combat here is one-directional: only the attacker deals damage; the
//! defender never strikes back. Attacking saps the attacker for the rest
//! of the turn but does not end the turn.

use crate::cards::CardType;
use crate::core::{GameState, GameStatus, InstanceId, PlayerId};

/// Shared attacker legality: exists, owned by the current player, fresh,
/// and has positive attack. Returns the attack value on success.
fn validate_attacker(
    state: &GameState,
    attacker_owner: PlayerId,
    attacker: InstanceId,
) -> Option<i64> {
    if state.status != GameStatus::Playing {
        return None;
    }
    if !state.is_current_player(attacker_owner) {
        return None;
    }

    let entry = state.find_card(attacker_owner, attacker)?;
    if entry.sapped {
        return None;
    }

    let def = state.catalog().get(entry.card_id)?;
    let attack = def.attack_value();
    if attack <= 0 {
        return None;
    }

    Some(attack)
}

/// Attack a player directly.
///
/// `damage` is supplied by the caller (normally the attacker's printed
/// attack). Rejected as a no-op if the attacker is illegal, its policy
/// forbids hitting players, or the damage is not positive.
pub fn attack_player_with_creature(
    state: &mut GameState,
    attacker_owner: PlayerId,
    attacker: InstanceId,
    defender: PlayerId,
    damage: i64,
) -> bool {
    if validate_attacker(state, attacker_owner, attacker).is_none() || damage <= 0 {
        return false;
    }
    if defender.index() >= state.player_count() {
        return false;
    }

    let entry = state
        .find_card(attacker_owner, attacker)
        .expect("validated above");
    let card_id = entry.card_id;
    let policy = state
        .catalog()
        .get(card_id)
        .expect("validated above")
        .targeting_policy();
    if !policy.can_target_players {
        return false;
    }

    state.sap_card(attacker_owner, attacker);
    state.log_action(
        attacker_owner,
        "attack",
        Some(card_id),
        format!("{} attacked {} for {}", attacker_owner, defender, damage),
    );
    state.deal_damage_to_player(defender, damage);
    true
}

/// Attack a battlefield card (creature or artifact).
///
/// Damage equals the attacker's printed attack; the defender deals no
/// return damage. Rejected as a no-op on any legality failure.
pub fn attack_creature_with_creature(
    state: &mut GameState,
    attacker_owner: PlayerId,
    attacker: InstanceId,
    defender_owner: PlayerId,
    defender: InstanceId,
) -> bool {
    let Some(damage) = validate_attacker(state, attacker_owner, attacker) else {
        return false;
    };

    let Some(defender_type) = state.card_type_of(defender_owner, defender) else {
        return false;
    };

    let entry = state
        .find_card(attacker_owner, attacker)
        .expect("validated above");
    let card_id = entry.card_id;
    let policy = state
        .catalog()
        .get(card_id)
        .expect("validated above")
        .targeting_policy();
    let allowed = match defender_type {
        CardType::Creature => policy.can_target_creatures,
        CardType::Artifact => policy.can_target_artifacts,
        CardType::Spell => false,
    };
    if !allowed {
        return false;
    }

    state.sap_card(attacker_owner, attacker);
    state.log_action(
        attacker_owner,
        "attack",
        Some(card_id),
        format!(
            "{} attacked {}'s {} for {}",
            attacker_owner, defender_owner, defender, damage
        ),
    );
    state.deal_damage_to_card(defender_owner, defender, damage);
    true
}
