//! Turn state machine.
//!
//! Lifecycle: `Waiting -> Playing -> Finished` (terminal). `start_game`
//! performs the one-time setup; `end_player_turn` rotates the current
//! player and runs the begin-turn sequence for the next one. The caller
//! (the engine facade) guarantees no targeting session is open when a
//! turn ends.

use crate::cards::TriggerKind;
use crate::core::{GameState, GameStatus, PlayerId};

use super::triggers::fire_triggers;

/// Start a waiting game: shuffle, deal starting hands, begin the first
/// player's turn. Returns false if the game is not in `Waiting`.
pub fn start_game(state: &mut GameState) -> bool {
    if state.status != GameStatus::Waiting {
        return false;
    }

    state.shuffle_deck();

    let players: Vec<PlayerId> = state.player_ids().collect();
    let hand_size = state.config().starting_hand_size;
    for &player in &players {
        for _ in 0..hand_size {
            state.draw_card(player);
        }
    }

    state.status = GameStatus::Playing;
    state.log_action(
        state.current_player(),
        "start_game",
        None,
        format!("game started with {} players", players.len()),
    );

    begin_turn(state);
    true
}

/// End the current player's turn.
///
/// Only legal for the current player while the game is in progress.
/// Fires `end_turn` triggers for the departing player, advances the seat
/// (incrementing the turn counter on wrap), then runs the begin-turn
/// sequence for the new current player. Returns false (no mutation) on
/// an illegal call.
pub fn end_player_turn(state: &mut GameState, player: PlayerId) -> bool {
    if state.status != GameStatus::Playing {
        return false;
    }
    if !state.is_current_player(player) {
        return false;
    }

    fire_triggers(state, player, TriggerKind::EndTurn);
    state.log_action(
        player,
        "end_turn",
        None,
        format!("{} ended their turn", player),
    );

    // End-turn triggers may have finished the game.
    if state.status != GameStatus::Playing {
        return true;
    }

    if state.advance_current_player() {
        state.turn += 1;
    }

    begin_turn(state);
    true
}

/// The begin-turn sequence for the current player: refresh the
/// battlefield, grow and refill energy, draw for the turn, fire
/// `start_turn` triggers.
fn begin_turn(state: &mut GameState) {
    let player = state.current_player();

    state.refresh_battlefield(player);
    let cap = state.config().energy_cap;
    state.player_mut(player).grow_and_refill_energy(cap);
    state.draw_card(player);
    state.log_action(
        player,
        "start_turn",
        None,
        format!("{} started turn {}", player, state.turn),
    );

    fire_triggers(state, player, TriggerKind::StartTurn);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardDefinition, CardId, CardType};
    use crate::core::GameConfig;

    const GRUNT: CardId = CardId::new(1);

    fn catalog() -> CardCatalog {
        let mut catalog = CardCatalog::new();
        catalog.register(
            CardDefinition::new(GRUNT, "Grunt", 2, CardType::Creature).with_stats(2, 3),
        );
        catalog
    }

    fn waiting_state() -> GameState {
        GameState::new(
            2,
            GameConfig::default(),
            catalog(),
            vec![GRUNT; 20],
            42,
        )
    }

    #[test]
    fn test_start_game_deals_and_begins_first_turn() {
        let mut state = waiting_state();

        assert!(start_game(&mut state));

        assert_eq!(state.status, GameStatus::Playing);
        // Starting hand plus the first turn draw.
        assert_eq!(state.hand(PlayerId::new(0)).len(), 4);
        assert_eq!(state.hand(PlayerId::new(1)).len(), 3);
        assert_eq!(state.player(PlayerId::new(0)).energy, 1);
        assert_eq!(state.player(PlayerId::new(1)).energy, 0);
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn test_start_game_twice_rejected() {
        let mut state = waiting_state();

        assert!(start_game(&mut state));
        assert!(!start_game(&mut state));
    }

    #[test]
    fn test_end_turn_rotates_without_turn_increment() {
        let mut state = waiting_state();
        start_game(&mut state);

        assert!(end_player_turn(&mut state, PlayerId::new(0)));

        assert_eq!(state.current_player(), PlayerId::new(1));
        assert_eq!(state.turn, 1); // no wrap yet
    }

    #[test]
    fn test_end_turn_wrap_increments_turn() {
        let mut state = waiting_state();
        start_game(&mut state);

        end_player_turn(&mut state, PlayerId::new(0));
        end_player_turn(&mut state, PlayerId::new(1));

        assert_eq!(state.current_player(), PlayerId::new(0));
        assert_eq!(state.turn, 2);
    }

    #[test]
    fn test_end_turn_wrong_player_rejected() {
        let mut state = waiting_state();
        start_game(&mut state);
        let log_before = state.log_len();

        assert!(!end_player_turn(&mut state, PlayerId::new(1)));
        assert_eq!(state.current_player(), PlayerId::new(0));
        assert_eq!(state.log_len(), log_before);
    }

    #[test]
    fn test_energy_grows_each_turn_up_to_cap() {
        let mut state = waiting_state();
        start_game(&mut state);

        // Round-trip the turn a few times.
        for _ in 0..3 {
            end_player_turn(&mut state, PlayerId::new(0));
            end_player_turn(&mut state, PlayerId::new(1));
        }

        assert_eq!(state.player(PlayerId::new(0)).max_energy, 4);
        assert_eq!(state.player(PlayerId::new(0)).energy, 4);
    }

    #[test]
    fn test_new_turn_draws_a_card() {
        let mut state = waiting_state();
        start_game(&mut state);
        let before = state.hand(PlayerId::new(1)).len();

        end_player_turn(&mut state, PlayerId::new(0));

        assert_eq!(state.hand(PlayerId::new(1)).len(), before + 1);
    }

    #[test]
    fn test_begin_turn_refreshes_sapped_cards() {
        let mut state = waiting_state();
        start_game(&mut state);
        let p1 = PlayerId::new(1);
        let instance = state.put_onto_battlefield(p1, GRUNT);
        state.sap_card(p1, instance);

        end_player_turn(&mut state, PlayerId::new(0));

        assert!(!state.find_card(p1, instance).unwrap().sapped);
    }

    #[test]
    fn test_end_turn_requires_playing_status() {
        let mut state = waiting_state();

        assert!(!end_player_turn(&mut state, PlayerId::new(0)));
    }
}
