//! Effect system: declarative scripts, staged operations, and the
//! two-phase interpreter.
//!
//! A card's effect is a small instruction list (`EffectScript`). Phase
//! one interprets it against read-only state, pausing for interactive
//! targeting and recording resolved operations into an `OperationLog`.
//! Phase two pays the costs and replays the log atomically. Cancellation
//! or a phase-one error means zero observable mutation.

pub mod interpreter;
pub mod script;
pub mod staging;

pub use interpreter::{run_trigger_script, CastError, CastStatus, ScriptError, SpellCast};
pub use script::{EffectOp, EffectScript, EffectTarget};
pub use staging::{OperationLog, StagedOp};
