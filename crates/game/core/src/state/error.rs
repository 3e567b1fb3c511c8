//! Snapshot ingestion errors.
//!
//! A snapshot is trusted input; any of these means the upstream feed is
//! corrupt and the session must not start from it.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{ItemId, MapDimensions, PlayerId, Position};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitializationError {
    /// Board must have at least one tile.
    #[error("board dimensions {width}x{height} are empty")]
    EmptyBoard { width: u32, height: u32 },

    #[error("terrain override at {position} is outside the {}x{} board", dimensions.width, dimensions.height)]
    TileOutOfBounds {
        position: Position,
        dimensions: MapDimensions,
    },

    #[error("player {id} starts at {position}, outside the {}x{} board", dimensions.width, dimensions.height)]
    PlayerOutOfBounds {
        id: PlayerId,
        position: Position,
        dimensions: MapDimensions,
    },

    #[error("item {id} starts at {position}, outside the {}x{} board", dimensions.width, dimensions.height)]
    ItemOutOfBounds {
        id: ItemId,
        position: Position,
        dimensions: MapDimensions,
    },

    #[error("player id {0} appears more than once")]
    DuplicatePlayer(PlayerId),

    #[error("item id {0} appears more than once")]
    DuplicateItem(ItemId),
}

impl GameError for InitializationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use InitializationError::*;
        match self {
            EmptyBoard { .. } => "INIT_EMPTY_BOARD",
            TileOutOfBounds { .. } => "INIT_TILE_OUT_OF_BOUNDS",
            PlayerOutOfBounds { .. } => "INIT_PLAYER_OUT_OF_BOUNDS",
            ItemOutOfBounds { .. } => "INIT_ITEM_OUT_OF_BOUNDS",
            DuplicatePlayer(_) => "INIT_DUPLICATE_PLAYER",
            DuplicateItem(_) => "INIT_DUPLICATE_ITEM",
        }
    }
}
