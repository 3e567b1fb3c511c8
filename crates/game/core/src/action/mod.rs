//! What the local player may do in a turn.
//!
//! A turn is a move budget plus three flags. Moves spend budget one tile at a
//! time, an attack ends movement, and a skip ends the turn outright. Checks
//! run against the last rendered [`Viewport`](crate::engine::Viewport) so the
//! buttons a player sees agree with what a submission will accept.
mod direction;
mod error;
mod turn;

pub use direction::CardinalDirection;
pub use error::{AttackError, MoveError, SkipError};
pub use turn::{
    AttackTarget, AttackTransition, MoveTransition, TurnContext, TurnFlags, TurnSession,
};
