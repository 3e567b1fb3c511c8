//! Turn-rule rejections.
//!
//! Display strings are shown to the player verbatim. None of these leave the
//! turn session or the board modified.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{PlayerId, Position};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("You have already skipped this turn.")]
    AlreadySkipped,

    #[error("You cannot move after attacking.")]
    AlreadyAttacked,

    #[error("No movement remaining for this turn.")]
    NoMovementRemaining,

    #[error("player {0} is not on the board")]
    UnknownActor(PlayerId),

    #[error("You cannot leave the board.")]
    OutOfBounds { destination: Position },

    #[error("That tile cannot be entered.")]
    Inaccessible { destination: Position },

    #[error("An opposing player is blocking that tile.")]
    Blocked { destination: Position },
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // The occupant may leave before the next attempt.
            Self::Blocked { .. } => ErrorSeverity::Recoverable,
            Self::UnknownActor(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadySkipped => "MOVE_ALREADY_SKIPPED",
            Self::AlreadyAttacked => "MOVE_ALREADY_ATTACKED",
            Self::NoMovementRemaining => "MOVE_NO_MOVEMENT_REMAINING",
            Self::UnknownActor(_) => "MOVE_UNKNOWN_ACTOR",
            Self::OutOfBounds { .. } => "MOVE_OUT_OF_BOUNDS",
            Self::Inaccessible { .. } => "MOVE_INACCESSIBLE",
            Self::Blocked { .. } => "MOVE_BLOCKED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackError {
    #[error("You have already skipped this turn.")]
    AlreadySkipped,

    #[error("You have already attacked this turn.")]
    AlreadyAttacked,

    #[error("You cannot attack after moving.")]
    AlreadyMoved,

    #[error("player {0} is not on the board")]
    UnknownActor(PlayerId),

    #[error("There is nothing to attack in that direction.")]
    NoTarget { target: Position },
}

impl GameError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownActor(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadySkipped => "ATTACK_ALREADY_SKIPPED",
            Self::AlreadyAttacked => "ATTACK_ALREADY_ATTACKED",
            Self::AlreadyMoved => "ATTACK_ALREADY_MOVED",
            Self::UnknownActor(_) => "ATTACK_UNKNOWN_ACTOR",
            Self::NoTarget { .. } => "ATTACK_NO_TARGET",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipError {
    #[error("You have already skipped this turn.")]
    AlreadySkipped,
}

impl GameError for SkipError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "SKIP_ALREADY_SKIPPED"
    }
}
