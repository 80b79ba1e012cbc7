//! Interactive targeting: targets, legality, and the selection session.
//!
//! Targeting is the one place the engine waits on a human. The
//! `TargetingSession` state machine makes that wait explicit: it is
//! created when a prompt opens, fed clicks by the rendering layer, and
//! resolves to confirmed targets or a cancellation. Nothing mutates game
//! state while a session is open.

pub mod selector;
pub mod session;

pub use selector::{
    is_legal_target, legal_targets, Target, TargetKind, TargetSelector, TargetingContext,
};
pub use session::{ClickOutcome, SessionState, TargetingSession};
