//! Interactive targeting session.
//!
//! The session is the explicit state machine behind the targeting prompt:
//!
//! ```text
//! (no session) -> Selecting -> Confirmed
//!                          \-> Cancelled
//! ```
//!
//! A session exists only while a prompt is open - idle is the absence of
//! a session. The driving component (the engine facade) owns at most one
//! session at a time and rejects every other player-initiated mutation
//! while it is open. Suspension is explicit: the session holds no
//! reference to game state, and every click re-checks legality against
//! the live document.
//!
//! Cancellation is a normal terminal outcome, not an error: the caller
//! treats it as "the player changed their mind" and leaves all costs
//! unpaid.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::GameState;

use super::selector::{is_legal_target, legal_targets, Target, TargetSelector, TargetingContext};

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Accepting clicks.
    Selecting,
    /// Selection locked in; `confirmed_targets` is available.
    Confirmed,
    /// Aborted by the player; resolves to no targets.
    Cancelled,
}

/// What a single click did to the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Target added to the selection.
    Selected,
    /// Target was already selected and has been toggled off.
    Deselected,
    /// Click ignored (illegal target, full selection, or closed session).
    Rejected,
    /// Target added and the session auto-confirmed (attack shortcut).
    Confirmed,
}

/// One open targeting prompt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetingSession {
    selector: TargetSelector,
    context: TargetingContext,
    selected: SmallVec<[Target; 2]>,
    state: SessionState,
}

impl TargetingSession {
    /// Open a session.
    ///
    /// If the selector allows auto-targeting and exactly one legal target
    /// exists, the session starts already `Confirmed` on that target and
    /// the interactive prompt is skipped.
    #[must_use]
    pub fn begin(
        selector: TargetSelector,
        context: TargetingContext,
        game: &GameState,
    ) -> Self {
        let mut session = Self {
            selector,
            context,
            selected: SmallVec::new(),
            state: SessionState::Selecting,
        };

        if session.selector.auto_target {
            let legal = legal_targets(game, &session.selector, &session.context);
            if legal.len() == 1 {
                session.selected.push(legal[0]);
                session.state = SessionState::Confirmed;
            }
        }

        session
    }

    /// The selector this session prompts for.
    #[must_use]
    pub fn selector(&self) -> &TargetSelector {
        &self.selector
    }

    /// The context this session belongs to.
    #[must_use]
    pub fn context(&self) -> &TargetingContext {
        &self.context
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session is still accepting clicks.
    #[must_use]
    pub fn is_selecting(&self) -> bool {
        self.state == SessionState::Selecting
    }

    /// The in-progress selection.
    #[must_use]
    pub fn selected(&self) -> &[Target] {
        &self.selected
    }

    /// The locked-in targets, once confirmed.
    #[must_use]
    pub fn confirmed_targets(&self) -> Option<&[Target]> {
        match self.state {
            SessionState::Confirmed => Some(&self.selected),
            _ => None,
        }
    }

    /// Handle a click on a potential target.
    ///
    /// Clicking a selected target toggles it off. Clicking an unselected,
    /// legal target adds it, unless the selection is already full. For
    /// single-target attack prompts, a click on an unselected legal
    /// target confirms immediately with that target.
    pub fn handle_target_click(&mut self, game: &GameState, target: Target) -> ClickOutcome {
        if self.state != SessionState::Selecting {
            return ClickOutcome::Rejected;
        }

        if let Some(pos) = self.selected.iter().position(|t| *t == target) {
            self.selected.remove(pos);
            return ClickOutcome::Deselected;
        }

        if !is_legal_target(game, &self.selector, &self.context, &target) {
            return ClickOutcome::Rejected;
        }

        if self.selected.len() >= self.selector.count {
            return ClickOutcome::Rejected;
        }

        self.selected.push(target);

        if self.context.is_attack() && self.selector.count == 1 {
            self.state = SessionState::Confirmed;
            return ClickOutcome::Confirmed;
        }

        ClickOutcome::Selected
    }

    /// Confirm the selection (spell path).
    ///
    /// Confirms either the explicitly passed targets or the accumulated
    /// selection. Fails (returns false, stays `Selecting`) on an empty
    /// selection, too many targets, or any illegal explicit target.
    pub fn confirm_selection(&mut self, game: &GameState, targets: Option<Vec<Target>>) -> bool {
        if self.state != SessionState::Selecting {
            return false;
        }

        if let Some(explicit) = targets {
            if explicit.is_empty() || explicit.len() > self.selector.count {
                return false;
            }
            if !explicit
                .iter()
                .all(|t| is_legal_target(game, &self.selector, &self.context, t))
            {
                return false;
            }
            self.selected = explicit.into_iter().collect();
        } else if self.selected.is_empty() {
            return false;
        }

        self.state = SessionState::Confirmed;
        true
    }

    /// Cancel the session. Legal at any point while selecting.
    pub fn cancel(&mut self) {
        if self.state == SessionState::Selecting {
            self.state = SessionState::Cancelled;
            self.selected.clear();
        }
    }
}
