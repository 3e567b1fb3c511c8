//! Public session API surface.
//!
//! Gathers the error and transport types consumers of the runtime crate need
//! so the session modules can stay focused on game flow.

pub mod errors;
pub mod submit;

pub use errors::{Result, RuntimeError, SubmitError};
pub use submit::{
    ActionSubmitter, AttackRequest, ChestAttackRequest, FightResultRequest, MoveRequest,
    OutboundAction, RecordingSubmitter, SkipRequest,
};
