//! The engine facade.
//!
//! `GameEngine` is the mutation-API surface the rendering layer and test
//! harnesses drive: play a card, start an attack, feed targeting clicks,
//! end the turn. It owns the single in-flight `PendingAction` (a spell
//! cast suspended on targets, or an attack awaiting its defender), and
//! while one is open every other player-initiated entry point is rejected
//! with a log entry.
//!
//! Player-input failures never panic and never throw across this
//! boundary: they come back as `false` plus a log entry. Script failures
//! are caught internally and surface as "failed to cast" entries.

use crate::cards::{CardId, CardType, TriggerKind};
use crate::core::{GameState, GameStatus, InstanceId, PlayerId};
use crate::effects::{CastStatus, SpellCast};
use crate::targeting::{
    legal_targets, ClickOutcome, Target, TargetKind, TargetSelector, TargetingContext,
    TargetingSession,
};

use super::combat;
use super::triggers::fire_triggers;
use super::turn;

/// An action suspended on interactive targeting.
#[derive(Clone, Debug)]
pub enum PendingAction {
    /// A spell cast in phase one, awaiting target confirmation.
    Cast(SpellCast),
    /// An attack awaiting its defender.
    Attack {
        attacker_owner: PlayerId,
        attacker: InstanceId,
        session: TargetingSession,
    },
}

/// Drives a game: entry points for every player-initiated mutation.
#[derive(Clone, Debug, Default)]
pub struct GameEngine {
    pending: Option<PendingAction>,
}

impl GameEngine {
    /// Create an engine with no action in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a targeting session is currently open.
    #[must_use]
    pub fn targeting_open(&self) -> bool {
        self.pending.is_some()
    }

    /// The open targeting session, for the rendering layer.
    #[must_use]
    pub fn open_session(&self) -> Option<&TargetingSession> {
        match &self.pending {
            Some(PendingAction::Cast(cast)) => cast.session(),
            Some(PendingAction::Attack { session, .. }) => Some(session),
            None => None,
        }
    }

    /// Start a waiting game.
    pub fn start_game(&mut self, state: &mut GameState) -> bool {
        turn::start_game(state)
    }

    /// Play a card from hand.
    ///
    /// Creatures and artifacts enter the battlefield; effect-less spells
    /// go straight to the graveyard; scripted spells run through the
    /// two-phase interpreter and may suspend on targeting. Fails silently
    /// (logged) on any precondition violation.
    pub fn play_card(&mut self, state: &mut GameState, player: PlayerId, card_id: CardId) -> bool {
        if self.reject_if_busy(state, player, Some(card_id)) {
            return false;
        }
        if state.status != GameStatus::Playing || !state.is_current_player(player) {
            state.log_action(player, "play_rejected", Some(card_id), "cannot play now");
            return false;
        }
        if !state.hand(player).contains(&card_id) {
            state.log_action(player, "play_rejected", Some(card_id), "card not in hand");
            return false;
        }

        let Some(def) = state.catalog().get(card_id) else {
            state.log_action(
                player,
                "play_rejected",
                Some(card_id),
                format!("unknown card {}", card_id),
            );
            return false;
        };
        let card_type = def.card_type;
        let cost = def.cost;
        let name = def.name.clone();
        let scripted = def.spell_effect.is_some();

        match card_type {
            CardType::Creature | CardType::Artifact => {
                if !state.spend_energy(player, cost) {
                    state.log_action(player, "play_rejected", Some(card_id), "not enough energy");
                    return false;
                }
                state.remove_card_from_hand(player, card_id);
                state.put_onto_battlefield(player, card_id);
                state.log_action(
                    player,
                    "play_card",
                    Some(card_id),
                    format!("{} played {}", player, name),
                );
                fire_triggers(state, player, TriggerKind::PlayCard);
                true
            }

            CardType::Spell if scripted => match SpellCast::begin(state, player, card_id) {
                Ok(cast) => self.continue_cast(state, cast),
                Err(err) => {
                    state.log_action(
                        player,
                        "cast_failed",
                        Some(card_id),
                        format!("failed to cast {}: {}", name, err),
                    );
                    false
                }
            },

            CardType::Spell => {
                if !state.spend_energy(player, cost) {
                    state.log_action(player, "play_rejected", Some(card_id), "not enough energy");
                    return false;
                }
                state.remove_card_from_hand(player, card_id);
                state.add_card_to_graveyard(player, card_id);
                state.log_action(
                    player,
                    "play_card",
                    Some(card_id),
                    format!("{} played {}", player, name),
                );
                fire_triggers(state, player, TriggerKind::PlayCard);
                true
            }
        }
    }

    /// Start an attack with one of the current player's battlefield
    /// cards: opens a single-target attack session (which auto-confirms
    /// on the first legal click).
    pub fn begin_attack(
        &mut self,
        state: &mut GameState,
        player: PlayerId,
        attacker: InstanceId,
    ) -> bool {
        if self.reject_if_busy(state, player, None) {
            return false;
        }
        if state.status != GameStatus::Playing || !state.is_current_player(player) {
            state.log_action(player, "attack_rejected", None, "cannot attack now");
            return false;
        }
        let Some(entry) = state.find_card(player, attacker) else {
            state.log_action(player, "attack_rejected", None, "no such attacker");
            return false;
        };
        let card_id = entry.card_id;
        if entry.sapped {
            state.log_action(player, "attack_rejected", Some(card_id), "attacker is sapped");
            return false;
        }
        let Some(def) = state.catalog().get(card_id) else {
            state.log_action(player, "attack_rejected", Some(card_id), "unknown card");
            return false;
        };
        if def.attack_value() <= 0 {
            state.log_action(player, "attack_rejected", Some(card_id), "attacker has no attack");
            return false;
        }

        let selector = TargetSelector {
            count: 1,
            kind: TargetKind::Any,
            can_target_self: false,
            auto_target: false,
            description: format!("Choose a target for {}", def.name),
        };
        let context = TargetingContext::Attack {
            attacker_owner: player,
            attacker,
        };
        if legal_targets(state, &selector, &context).is_empty() {
            state.log_action(player, "attack_rejected", Some(card_id), "no legal targets");
            return false;
        }

        let session = TargetingSession::begin(selector, context, state);
        self.pending = Some(PendingAction::Attack {
            attacker_owner: player,
            attacker,
            session,
        });
        true
    }

    /// Forward a target click to the open session.
    pub fn click_target(&mut self, state: &mut GameState, target: Target) -> ClickOutcome {
        match self.pending.take() {
            None => ClickOutcome::Rejected,

            Some(PendingAction::Cast(mut cast)) => {
                let outcome = cast.handle_target_click(state, target);
                self.continue_cast(state, cast);
                outcome
            }

            Some(PendingAction::Attack {
                attacker_owner,
                attacker,
                mut session,
            }) => {
                let outcome = session.handle_target_click(state, target);
                if let Some(targets) = session.confirmed_targets() {
                    let confirmed = targets[0];
                    self.resolve_attack(state, attacker_owner, attacker, confirmed);
                } else if session.is_selecting() {
                    self.pending = Some(PendingAction::Attack {
                        attacker_owner,
                        attacker,
                        session,
                    });
                }
                outcome
            }
        }
    }

    /// Confirm the open session, with either the explicit `targets` or
    /// the accumulated selection.
    pub fn confirm_targets(
        &mut self,
        state: &mut GameState,
        targets: Option<Vec<Target>>,
    ) -> bool {
        match self.pending.take() {
            None => false,

            Some(PendingAction::Cast(mut cast)) => {
                if !cast.confirm_targets(state, targets) {
                    self.pending = Some(PendingAction::Cast(cast));
                    return false;
                }
                self.continue_cast(state, cast)
            }

            Some(PendingAction::Attack {
                attacker_owner,
                attacker,
                mut session,
            }) => {
                if !session.confirm_selection(state, targets) {
                    self.pending = Some(PendingAction::Attack {
                        attacker_owner,
                        attacker,
                        session,
                    });
                    return false;
                }
                let confirmed = session.confirmed_targets().expect("just confirmed")[0];
                self.resolve_attack(state, attacker_owner, attacker, confirmed)
            }
        }
    }

    /// Cancel the open session. A no-op for the board: costs stay
    /// unpaid, nothing resolves.
    pub fn cancel_targeting(&mut self, state: &mut GameState) -> bool {
        match self.pending.take() {
            None => false,

            Some(PendingAction::Cast(mut cast)) => {
                cast.cancel();
                state.log_action(
                    cast.caster(),
                    "cast_cancelled",
                    Some(cast.card_id()),
                    "targeting cancelled",
                );
                true
            }

            Some(PendingAction::Attack {
                attacker_owner,
                mut session,
                ..
            }) => {
                session.cancel();
                state.log_action(attacker_owner, "attack_cancelled", None, "targeting cancelled");
                true
            }
        }
    }

    /// End the current player's turn. Rejected while targeting is open.
    pub fn end_turn(&mut self, state: &mut GameState, player: PlayerId) -> bool {
        if self.reject_if_busy(state, player, None) {
            return false;
        }
        let ok = turn::end_player_turn(state, player);
        if !ok {
            state.log_action(player, "end_turn_rejected", None, "cannot end turn now");
        }
        ok
    }

    /// Log and report a rejection when an action is already in flight.
    fn reject_if_busy(&self, state: &mut GameState, player: PlayerId, card: Option<CardId>) -> bool {
        if self.pending.is_some() {
            state.log_action(
                player,
                "action_rejected",
                card,
                "another action is awaiting target selection",
            );
            true
        } else {
            false
        }
    }

    /// Route an in-flight cast by its status: park it, commit it, or
    /// report its failure.
    fn continue_cast(&mut self, state: &mut GameState, cast: SpellCast) -> bool {
        match cast.status() {
            CastStatus::AwaitingTargets => {
                self.pending = Some(PendingAction::Cast(cast));
                true
            }
            CastStatus::Ready => self.finish_cast(state, cast),
            CastStatus::Failed(err) => {
                state.log_action(
                    cast.caster(),
                    "cast_failed",
                    Some(cast.card_id()),
                    format!("failed to cast: {}", err),
                );
                false
            }
            CastStatus::Cancelled | CastStatus::Committed => false,
        }
    }

    /// Phase two plus bookkeeping: commit, log, fire play triggers.
    fn finish_cast(&mut self, state: &mut GameState, mut cast: SpellCast) -> bool {
        let caster = cast.caster();
        let card_id = cast.card_id();

        match cast.commit(state) {
            Ok(()) => {
                let name = state
                    .catalog()
                    .get(card_id)
                    .map(|d| d.name.clone())
                    .unwrap_or_else(|| card_id.to_string());
                state.log_action(
                    caster,
                    "cast_spell",
                    Some(card_id),
                    format!("{} cast {}", caster, name),
                );
                fire_triggers(state, caster, TriggerKind::PlayCard);
                true
            }
            Err(err) => {
                state.log_action(
                    caster,
                    "cast_failed",
                    Some(card_id),
                    format!("failed to cast: {}", err),
                );
                false
            }
        }
    }

    /// Dispatch a confirmed attack target to the combat resolver.
    fn resolve_attack(
        &mut self,
        state: &mut GameState,
        attacker_owner: PlayerId,
        attacker: InstanceId,
        target: Target,
    ) -> bool {
        let damage = state
            .find_card(attacker_owner, attacker)
            .and_then(|entry| state.catalog().get(entry.card_id))
            .map(|def| def.attack_value())
            .unwrap_or(0);

        match target {
            Target::Player { player } => {
                combat::attack_player_with_creature(state, attacker_owner, attacker, player, damage)
            }
            Target::Creature { owner, instance } | Target::Artifact { owner, instance } => {
                combat::attack_creature_with_creature(state, attacker_owner, attacker, owner, instance)
            }
        }
    }
}
