//! Full board description delivered when a session connects.

use super::{Item, MapDimensions, Player, Position, Team, TileFlag};

/// Terrain that differs from the default empty, neutral tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileOverride {
    pub position: Position,
    pub flag: TileFlag,
    pub team: Team,
}

impl TileOverride {
    pub const fn new(position: Position, flag: TileFlag, team: Team) -> Self {
        Self {
            position,
            flag,
            team,
        }
    }
}

/// Everything needed to build a [`GridEngine`](crate::engine::GridEngine).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub dimensions: MapDimensions,
    pub tiles: Vec<TileOverride>,
    pub players: Vec<Player>,
    pub items: Vec<Item>,
}

impl Snapshot {
    pub fn new(dimensions: MapDimensions) -> Self {
        Self {
            dimensions,
            tiles: Vec::new(),
            players: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn with_tile(mut self, tile: TileOverride) -> Self {
        self.tiles.push(tile);
        self
    }

    pub fn with_player(mut self, player: Player) -> Self {
        self.players.push(player);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }
}
