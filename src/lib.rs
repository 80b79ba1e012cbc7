//! # skirmish
//!
//! A turn-based card battler rules engine: players cast creatures,
//! spells, and artifacts, attack, and resolve triggered abilities over a
//! shared mutable game document.
//!
//! ## Design Principles
//!
//! 1. **Scripts are data**: card effects are declarative instruction
//!    lists (`EffectScript`), interpreted - never host-language closures.
//!    That keeps them serializable, auditable, and replayable.
//!
//! 2. **Two-phase resolution**: target selection waits on a human, which
//!    cannot happen inside an atomic state transition. Phase one records
//!    resolved operations against read-only state; phase two pays costs
//!    and replays them as one indivisible mutation. Cancellation or a
//!    script error means zero observable mutation.
//!
//! 3. **Explicit targeting sessions**: the in-progress selection is an
//!    owned state machine (`TargetingSession`), not ambient UI state.
//!    While a session is open, every other player-initiated mutation is
//!    rejected.
//!
//! 4. **Legality as booleans**: player-input failures (wrong turn, too
//!    poor, sapped attacker) come back as `false` plus a log entry,
//!    never as a panic across the mutation-API surface.
//!
//! The engine introduces no internal parallelism and assumes the
//! external document store provides a serialized, race-free mutation
//! point; its own job is keeping every mutation internally legal and
//! deterministic.
//!
//! ## Modules
//!
//! - `core`: players, configuration, RNG, log, game state + mutation API
//! - `cards`: card definitions, the immutable catalog, deck helpers
//! - `targeting`: targets, legality, the interactive selection session
//! - `effects`: effect scripts, staged operations, two-phase interpreter
//! - `rules`: combat, trigger dispatch, turn machine, engine facade

pub mod cards;
pub mod core;
pub mod effects;
pub mod rules;
pub mod targeting;

// Re-export commonly used types
pub use crate::core::{
    BattlefieldCard, GameConfig, GameRng, GameRngState, GameState, GameStatus, InstanceId,
    LogEntry, PlayerId, PlayerMap, PlayerState,
};

pub use crate::cards::{
    build_deck, draw_cards, shuffle_deck, ArtifactAbility, AttackTargeting, CardCatalog,
    CardDefinition, CardId, CardType, DeckError, TriggerKind,
};

pub use crate::targeting::{
    ClickOutcome, SessionState, Target, TargetKind, TargetSelector, TargetingContext,
    TargetingSession,
};

pub use crate::effects::{
    CastError, CastStatus, EffectOp, EffectScript, EffectTarget, OperationLog, ScriptError,
    SpellCast, StagedOp,
};

pub use crate::rules::{GameBuilder, GameEngine, PendingAction};
