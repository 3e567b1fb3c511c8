//! Board data model.
//!
//! Entities live in id-keyed tables owned by the
//! [`GridEngine`](crate::engine::GridEngine); tiles only ever hold ids. This
//! module defines those records, the [`Change`] that moves them, and the
//! [`Snapshot`] a board is built from.
pub mod change;
pub mod error;
pub mod snapshot;
pub mod types;

pub use change::{Change, EntityRef};
pub use error::InitializationError;
pub use snapshot::{Snapshot, TileOverride};
pub use types::{
    ClassStats, EntityKind, Item, ItemId, MapDimensions, Player, PlayerClass, PlayerId, Position,
    Team, Tile, TileFlag,
};
