//! Two-phase spell execution.
//!
//! Target selection waits on a human, and that wait cannot happen inside
//! an atomic state transition. So a spell runs in two phases:
//!
//! - **Phase one** interprets the script against read-only state. Effect
//!   instructions are not applied; they are recorded into an
//!   `OperationLog` with their targets resolved. A `SelectTargets`
//!   instruction suspends the cast behind a `TargetingSession` until the
//!   player confirms or cancels.
//! - **Phase two** (`commit`) runs inside the synchronous mutation
//!   boundary: it re-verifies affordability against fresh state, pays the
//!   costs (energy, hand removal, graveyard move), then replays the log
//!   in recorded order.
//!
//! If phase one fails or the player cancels, nothing is replayed and no
//! cost is paid - the document is exactly as it was before the attempt.
//!
//! Artifact trigger scripts run through the same instruction set with
//! both phases collapsed (`run_trigger_script`); they have no human to
//! prompt, so a script that needs a prompt is an error there.

use smallvec::SmallVec;

use crate::cards::{CardId, CardType};
use crate::core::{GameState, GameStatus, PlayerId};
use crate::targeting::{
    legal_targets, ClickOutcome, Target, TargetingContext, TargetingSession,
};

use super::script::{EffectOp, EffectScript, EffectTarget};
use super::staging::{OperationLog, StagedOp};

/// Phase-one script failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptError {
    /// An instruction applies to `Selected` but nothing was selected.
    NoSelection,
    /// A required selection has no legal targets at all.
    NoLegalTargets,
    /// The script wants an interactive prompt in a context without one.
    TargetingUnavailable,
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ScriptError::NoSelection => "effect applies to selected targets but none were chosen",
            ScriptError::NoLegalTargets => "no legal targets for a required selection",
            ScriptError::TargetingUnavailable => {
                "interactive target selection unavailable in this context"
            }
        };
        f.write_str(msg)
    }
}

/// Why a cast could not begin or commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastError {
    /// The game is not in progress.
    GameNotInProgress,
    /// It is not the caster's turn.
    NotYourTurn,
    /// The card is not in the caster's hand.
    NotInHand,
    /// The card id is missing from the catalog.
    UnknownCard(CardId),
    /// The card is not a scripted spell.
    NotASpell,
    /// The caster cannot pay the cost.
    CannotAfford,
    /// The cast is not in a committable state.
    NotReady,
    /// Phase one failed.
    Script(ScriptError),
}

impl std::fmt::Display for CastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CastError::GameNotInProgress => f.write_str("game is not in progress"),
            CastError::NotYourTurn => f.write_str("not this player's turn"),
            CastError::NotInHand => f.write_str("card is not in hand"),
            CastError::UnknownCard(id) => write!(f, "unknown card {}", id),
            CastError::NotASpell => f.write_str("card is not a scripted spell"),
            CastError::CannotAfford => f.write_str("not enough energy"),
            CastError::NotReady => f.write_str("cast is not ready to commit"),
            CastError::Script(err) => write!(f, "script failed: {}", err),
        }
    }
}

/// Where an in-flight cast stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastStatus {
    /// Suspended behind an open targeting session.
    AwaitingTargets,
    /// Phase one finished; ready for phase two.
    Ready,
    /// Phase two ran; the spell is fully resolved.
    Committed,
    /// The player cancelled targeting; nothing was or will be applied.
    Cancelled,
    /// Phase one failed; nothing was or will be applied.
    Failed(ScriptError),
}

/// An in-flight spell cast.
///
/// Holds no references into game state; every step takes the current
/// state explicitly, so the document can be re-read fresh at commit time.
#[derive(Clone, Debug)]
pub struct SpellCast {
    caster: PlayerId,
    card_id: CardId,
    cost: i64,
    ops: Vec<EffectOp>,
    cursor: usize,
    selected: SmallVec<[Target; 2]>,
    staged: OperationLog,
    session: Option<TargetingSession>,
    status: CastStatus,
}

impl SpellCast {
    /// Start casting: validate preconditions and run phase one as far as
    /// it can go without a human.
    pub fn begin(state: &GameState, caster: PlayerId, card_id: CardId) -> Result<Self, CastError> {
        if state.status != GameStatus::Playing {
            return Err(CastError::GameNotInProgress);
        }
        if !state.is_current_player(caster) {
            return Err(CastError::NotYourTurn);
        }
        if !state.hand(caster).contains(&card_id) {
            return Err(CastError::NotInHand);
        }

        let def = state
            .catalog()
            .get(card_id)
            .ok_or(CastError::UnknownCard(card_id))?;
        if def.card_type != CardType::Spell {
            return Err(CastError::NotASpell);
        }
        let script = def.spell_effect.as_ref().ok_or(CastError::NotASpell)?;
        if state.player(caster).energy < def.cost {
            return Err(CastError::CannotAfford);
        }

        let mut cast = Self {
            caster,
            card_id,
            cost: def.cost,
            ops: script.ops().to_vec(),
            cursor: 0,
            selected: SmallVec::new(),
            staged: OperationLog::new(),
            session: None,
            status: CastStatus::Ready,
        };
        cast.advance(state);
        Ok(cast)
    }

    /// The casting player.
    #[must_use]
    pub fn caster(&self) -> PlayerId {
        self.caster
    }

    /// The card being cast.
    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.card_id
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> CastStatus {
        self.status
    }

    /// The open targeting session, while suspended.
    #[must_use]
    pub fn session(&self) -> Option<&TargetingSession> {
        self.session.as_ref()
    }

    /// The operation log accumulated so far.
    #[must_use]
    pub fn staged(&self) -> &OperationLog {
        &self.staged
    }

    /// Forward a click to the open targeting session.
    pub fn handle_target_click(&mut self, state: &GameState, target: Target) -> ClickOutcome {
        let Some(session) = self.session.as_mut() else {
            return ClickOutcome::Rejected;
        };
        let outcome = session.handle_target_click(state, target);
        if outcome == ClickOutcome::Confirmed {
            self.harvest_targets(state);
        }
        outcome
    }

    /// Confirm the open targeting session and resume phase one.
    pub fn confirm_targets(&mut self, state: &GameState, targets: Option<Vec<Target>>) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.confirm_selection(state, targets) {
            return false;
        }
        self.harvest_targets(state);
        true
    }

    /// Cancel the cast. Nothing has been applied and nothing will be.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.cancel();
        }
        self.session = None;
        self.status = CastStatus::Cancelled;
    }

    /// Phase two: verify against fresh state, pay costs, replay the log.
    pub fn commit(&mut self, state: &mut GameState) -> Result<(), CastError> {
        if self.status != CastStatus::Ready {
            return Err(CastError::NotReady);
        }
        if state.status != GameStatus::Playing {
            return Err(CastError::GameNotInProgress);
        }
        if !state.is_current_player(self.caster) {
            return Err(CastError::NotYourTurn);
        }
        if !state.hand(self.caster).contains(&self.card_id) {
            return Err(CastError::NotInHand);
        }
        if !state.spend_energy(self.caster, self.cost) {
            return Err(CastError::CannotAfford);
        }
        state.remove_card_from_hand(self.caster, self.card_id);
        state.add_card_to_graveyard(self.caster, self.card_id);

        self.staged.apply_all(state);
        self.status = CastStatus::Committed;
        Ok(())
    }

    /// Pull confirmed targets out of the finished session and continue.
    fn harvest_targets(&mut self, state: &GameState) {
        let Some(session) = self.session.take() else {
            return;
        };
        let Some(targets) = session.confirmed_targets() else {
            return;
        };
        self.selected = targets.iter().copied().collect();
        self.cursor += 1;
        self.status = CastStatus::Ready;
        self.advance(state);
    }

    /// Run phase one from the cursor until suspension, failure, or end.
    fn advance(&mut self, state: &GameState) {
        while self.cursor < self.ops.len() {
            match &self.ops[self.cursor] {
                EffectOp::SelectTargets { selector } => {
                    let context = TargetingContext::Spell {
                        caster: self.caster,
                    };
                    if legal_targets(state, selector, &context).is_empty() {
                        self.status = CastStatus::Failed(ScriptError::NoLegalTargets);
                        return;
                    }

                    let session = TargetingSession::begin(selector.clone(), context, state);
                    if let Some(targets) = session.confirmed_targets() {
                        // Auto-target resolved the prompt without a human.
                        self.selected = targets.iter().copied().collect();
                        self.cursor += 1;
                        continue;
                    }

                    self.session = Some(session);
                    self.status = CastStatus::AwaitingTargets;
                    return;
                }
                op => {
                    if let Err(err) = stage_op(op, self.caster, &self.selected, &mut self.staged) {
                        self.status = CastStatus::Failed(err);
                        return;
                    }
                    self.cursor += 1;
                }
            }
        }
        self.status = CastStatus::Ready;
    }
}

/// Resolve one non-targeting instruction into staged operations.
fn stage_op(
    op: &EffectOp,
    caster: PlayerId,
    selected: &[Target],
    out: &mut OperationLog,
) -> Result<(), ScriptError> {
    match *op {
        EffectOp::SelectTargets { .. } => Err(ScriptError::TargetingUnavailable),

        EffectOp::DealDamage { amount, to } => {
            for target in resolve(caster, to, selected)? {
                out.record(match target {
                    Target::Player { player } => StagedOp::DamagePlayer { player, amount },
                    Target::Creature { owner, instance } | Target::Artifact { owner, instance } => {
                        StagedOp::DamageCard {
                            owner,
                            instance,
                            amount,
                        }
                    }
                });
            }
            Ok(())
        }

        EffectOp::Heal { amount, to } => {
            for target in resolve(caster, to, selected)? {
                out.record(match target {
                    Target::Player { player } => StagedOp::HealPlayer { player, amount },
                    Target::Creature { owner, instance } | Target::Artifact { owner, instance } => {
                        StagedOp::HealCard {
                            owner,
                            instance,
                            amount,
                        }
                    }
                });
            }
            Ok(())
        }

        EffectOp::Destroy => {
            if selected.is_empty() {
                return Err(ScriptError::NoSelection);
            }
            for target in selected {
                if let (owner, Some(instance)) = (target.side(), target.instance()) {
                    out.record(StagedOp::DestroyCard { owner, instance });
                }
            }
            Ok(())
        }

        EffectOp::DrawCards { count } => {
            out.record(StagedOp::DrawCards {
                player: caster,
                count,
            });
            Ok(())
        }

        EffectOp::GainEnergy { amount } => {
            out.record(StagedOp::GainEnergy {
                player: caster,
                amount,
            });
            Ok(())
        }
    }
}

/// Expand an instruction's `to` into concrete targets.
fn resolve(
    caster: PlayerId,
    to: EffectTarget,
    selected: &[Target],
) -> Result<Vec<Target>, ScriptError> {
    match to {
        EffectTarget::Caster => Ok(vec![Target::Player { player: caster }]),
        EffectTarget::Selected => {
            if selected.is_empty() {
                Err(ScriptError::NoSelection)
            } else {
                Ok(selected.to_vec())
            }
        }
    }
}

/// Run an artifact trigger script: both phases collapsed, no prompt.
///
/// A `SelectTargets` instruction is honored only when auto-targeting can
/// resolve it (exactly one legal target); otherwise the script fails and
/// nothing is applied. On success the whole operation log is replayed
/// atomically.
pub fn run_trigger_script(
    state: &mut GameState,
    owner: PlayerId,
    script: &EffectScript,
) -> Result<(), ScriptError> {
    let mut selected: SmallVec<[Target; 2]> = SmallVec::new();
    let mut staged = OperationLog::new();

    for op in script.ops() {
        match op {
            EffectOp::SelectTargets { selector } => {
                let context = TargetingContext::Spell { caster: owner };
                let legal = legal_targets(state, selector, &context);
                if selector.auto_target && legal.len() == 1 {
                    selected = SmallVec::from_slice(&legal);
                } else {
                    return Err(ScriptError::TargetingUnavailable);
                }
            }
            op => stage_op(op, owner, &selected, &mut staged)?,
        }
    }

    staged.apply_all(state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardDefinition, CardType};
    use crate::core::GameConfig;
    use crate::targeting::{TargetKind, TargetSelector};

    const GRUNT: CardId = CardId::new(1);
    const BOLT: CardId = CardId::new(2);
    const INSIGHT: CardId = CardId::new(3);

    fn catalog() -> CardCatalog {
        let mut catalog = CardCatalog::new();
        catalog.register(
            CardDefinition::new(GRUNT, "Grunt", 2, CardType::Creature).with_stats(2, 3),
        );
        catalog.register(
            CardDefinition::new(BOLT, "Bolt", 1, CardType::Spell).with_spell_effect(
                EffectScript::targeted_damage(3, TargetSelector::single(TargetKind::Any, "zap")),
            ),
        );
        catalog.register(
            CardDefinition::new(INSIGHT, "Insight", 2, CardType::Spell)
                .with_spell_effect(EffectScript::draw(2)),
        );
        catalog
    }

    fn playing_state() -> GameState {
        let mut state = GameState::new(
            2,
            GameConfig::default(),
            catalog(),
            vec![GRUNT, GRUNT, GRUNT, GRUNT],
            42,
        );
        state.status = GameStatus::Playing;
        let p0 = PlayerId::new(0);
        state.player_mut(p0).max_energy = 5;
        state.player_mut(p0).energy = 5;
        state
    }

    #[test]
    fn test_untargeted_spell_is_immediately_ready() {
        let mut state = playing_state();
        let p0 = PlayerId::new(0);
        state.add_card_to_hand(p0, INSIGHT);

        let cast = SpellCast::begin(&state, p0, INSIGHT).unwrap();

        assert_eq!(cast.status(), CastStatus::Ready);
        assert_eq!(cast.staged().len(), 1);
    }

    #[test]
    fn test_targeted_spell_suspends_then_commits() {
        let mut state = playing_state();
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        state.add_card_to_hand(p0, BOLT);

        let mut cast = SpellCast::begin(&state, p0, BOLT).unwrap();
        assert_eq!(cast.status(), CastStatus::AwaitingTargets);
        assert!(cast.session().is_some());

        let target = Target::Player { player: p1 };
        cast.handle_target_click(&state, target);
        assert!(cast.confirm_targets(&state, None));
        assert_eq!(cast.status(), CastStatus::Ready);

        cast.commit(&mut state).unwrap();

        assert_eq!(cast.status(), CastStatus::Committed);
        assert_eq!(state.player(p1).health, 27);
        assert_eq!(state.player(p0).energy, 4); // cost paid
        assert!(!state.hand(p0).contains(&BOLT));
        assert_eq!(state.graveyard(p0), &[BOLT]);
    }

    #[test]
    fn test_cancel_leaves_document_untouched() {
        let mut state = playing_state();
        let p0 = PlayerId::new(0);
        state.add_card_to_hand(p0, BOLT);
        let snapshot = state.clone();

        let mut cast = SpellCast::begin(&state, p0, BOLT).unwrap();
        cast.handle_target_click(
            &state,
            Target::Player {
                player: PlayerId::new(1),
            },
        );
        cast.cancel();

        assert_eq!(cast.status(), CastStatus::Cancelled);
        assert!(cast.commit(&mut state).is_err());
        assert_eq!(state.player(p0).energy, snapshot.player(p0).energy);
        assert_eq!(state.hand(p0), snapshot.hand(p0));
        assert_eq!(state.graveyard(p0), snapshot.graveyard(p0));
    }

    #[test]
    fn test_broken_script_fails_phase_one() {
        let p0 = PlayerId::new(0);

        // Damage to Selected without any SelectTargets first.
        let broken = CardId::new(9);
        let mut catalog = catalog();
        catalog.register(
            CardDefinition::new(broken, "Broken", 1, CardType::Spell).with_spell_effect(
                EffectScript::new(vec![EffectOp::DealDamage {
                    amount: 2,
                    to: EffectTarget::Selected,
                }]),
            ),
        );
        let mut state = GameState::new(2, GameConfig::default(), catalog, vec![], 42);
        state.status = GameStatus::Playing;
        state.player_mut(p0).max_energy = 5;
        state.player_mut(p0).energy = 5;
        state.add_card_to_hand(p0, broken);

        let mut cast = SpellCast::begin(&state, p0, broken).unwrap();

        assert_eq!(cast.status(), CastStatus::Failed(ScriptError::NoSelection));
        assert!(cast.commit(&mut state).is_err());
        assert_eq!(state.player(p0).energy, 5);
        assert!(state.hand(p0).contains(&broken));
        assert!(state.graveyard(p0).is_empty());
    }

    #[test]
    fn test_begin_rejects_wrong_turn_and_poverty() {
        let mut state = playing_state();
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        state.add_card_to_hand(p1, BOLT);

        assert_eq!(
            SpellCast::begin(&state, p1, BOLT).unwrap_err(),
            CastError::NotYourTurn
        );

        state.add_card_to_hand(p0, BOLT);
        state.player_mut(p0).energy = 0;
        assert_eq!(
            SpellCast::begin(&state, p0, BOLT).unwrap_err(),
            CastError::CannotAfford
        );
    }

    #[test]
    fn test_commit_reverifies_affordability() {
        let mut state = playing_state();
        let p0 = PlayerId::new(0);
        state.add_card_to_hand(p0, INSIGHT);

        let mut cast = SpellCast::begin(&state, p0, INSIGHT).unwrap();
        assert_eq!(cast.status(), CastStatus::Ready);

        // Energy drained between phase one and commit.
        state.player_mut(p0).energy = 0;

        assert_eq!(cast.commit(&mut state).unwrap_err(), CastError::CannotAfford);
        assert!(state.hand(p0).contains(&INSIGHT));
        assert!(state.graveyard(p0).is_empty());
    }

    #[test]
    fn test_no_legal_targets_fails_cast() {
        let mut catalog = catalog();
        let purge = CardId::new(10);
        catalog.register(
            CardDefinition::new(purge, "Purge", 1, CardType::Spell).with_spell_effect(
                EffectScript::targeted_damage(
                    2,
                    TargetSelector::single(TargetKind::Creature, "pick a creature"),
                ),
            ),
        );
        let mut state = GameState::new(2, GameConfig::default(), catalog, vec![], 42);
        state.status = GameStatus::Playing;
        let p0 = PlayerId::new(0);
        state.player_mut(p0).max_energy = 5;
        state.player_mut(p0).energy = 5;
        state.add_card_to_hand(p0, purge);

        // No creatures anywhere: the required selection cannot be met.
        let cast = SpellCast::begin(&state, p0, purge).unwrap();
        assert_eq!(
            cast.status(),
            CastStatus::Failed(ScriptError::NoLegalTargets)
        );
    }

    #[test]
    fn test_trigger_script_runs_collapsed() {
        let mut state = playing_state();
        let p0 = PlayerId::new(0);
        state.player_mut(p0).energy = 0;

        run_trigger_script(&mut state, p0, &EffectScript::gain_energy(2)).unwrap();

        assert_eq!(state.player(p0).energy, 2);
    }

    #[test]
    fn test_trigger_script_rejects_interactive_targeting() {
        let mut state = playing_state();
        let p0 = PlayerId::new(0);
        let before = state.clone();

        let script =
            EffectScript::targeted_damage(2, TargetSelector::single(TargetKind::Creature, ""));
        let err = run_trigger_script(&mut state, p0, &script).unwrap_err();

        assert_eq!(err, ScriptError::TargetingUnavailable);
        assert_eq!(state.player(PlayerId::new(1)).health, before.player(PlayerId::new(1)).health);
    }

    #[test]
    fn test_trigger_script_auto_target_resolves() {
        let mut state = playing_state();
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        let enemy = state.put_onto_battlefield(p1, GRUNT);

        // Exactly one legal creature target plus auto-targeting: the
        // trigger resolves without a prompt.
        let script = EffectScript::targeted_damage(
            1,
            TargetSelector::single(TargetKind::Creature, "").auto(),
        );
        run_trigger_script(&mut state, p0, &script).unwrap();

        assert_eq!(state.find_card(p1, enemy).unwrap().current_health, 2);
    }
}
