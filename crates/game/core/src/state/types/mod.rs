pub mod class;
pub mod common;
pub mod entities;
pub mod tile;

// Re-export common types
pub use common::{EntityKind, ItemId, MapDimensions, PlayerId, Position, Team};

// Re-export class table
pub use class::{ClassStats, PlayerClass};

// Re-export entity records
pub use entities::{Item, Player};

// Re-export board cells
pub use tile::{Tile, TileFlag};
