//! Unified error types surfaced by the session API.
//!
//! Wraps turn-rule rejections, snapshot problems, feed parsing, and failed
//! acknowledgements so clients can bubble them up with consistent context.
use game_core::{
    AttackError, ErrorSeverity, GameError, InitializationError, MoveError, PlayerId, SkipError,
};
use thiserror::Error;

use crate::feed::FeedError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// The server refused or never acknowledged an outbound action.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmitError {
    pub message: String,
}

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no board snapshot has been received yet")]
    NotConnected,

    #[error("player {0} is not part of this game")]
    PlayerNotInGame(PlayerId),

    #[error("failed to initialize board from snapshot")]
    InitialState(#[source] InitializationError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Attack(#[from] AttackError),

    #[error(transparent)]
    Skip(#[from] SkipError),

    #[error("{action} was applied locally but not acknowledged")]
    Submission {
        action: &'static str,
        #[source]
        source: SubmitError,
    },
}

impl RuntimeError {
    /// Severity for display decisions; acknowledgement failures are reported
    /// but never undo local state.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotConnected | Self::Feed(_) => ErrorSeverity::Recoverable,
            Self::PlayerNotInGame(_) => ErrorSeverity::Fatal,
            Self::InitialState(err) => err.severity(),
            Self::Move(err) => err.severity(),
            Self::Attack(err) => err.severity(),
            Self::Skip(err) => err.severity(),
            Self::Submission { .. } => ErrorSeverity::Recoverable,
        }
    }
}
