use std::collections::BTreeSet;

use super::{ItemId, PlayerId, Team};

/// Terrain kind of a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileFlag {
    #[default]
    Empty,
    Spawn,
    TreasureChest,
    Inaccessible,
}

impl TileFlag {
    /// Maps the numeric flag code used on the wire.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Spawn),
            2 => Some(Self::TreasureChest),
            3 => Some(Self::Inaccessible),
            _ => None,
        }
    }

    /// Walls are the only terrain a move can never enter.
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Inaccessible)
    }
}

/// One board cell.
///
/// Occupants are stored as ordered id sets so iteration (and therefore
/// rendering) is deterministic: the lowest id comes first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub flag: TileFlag,
    pub team: Team,
    players: BTreeSet<PlayerId>,
    items: BTreeSet<ItemId>,
}

impl Tile {
    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.iter()
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter()
    }

    pub fn has_player(&self, id: &PlayerId) -> bool {
        self.players.contains(id)
    }

    pub fn has_item(&self, id: &ItemId) -> bool {
        self.items.contains(id)
    }

    pub fn is_occupied(&self) -> bool {
        !self.players.is_empty()
    }

    pub(crate) fn insert_player(&mut self, id: PlayerId) {
        self.players.insert(id);
    }

    /// Set-discard: absent ids are ignored.
    pub(crate) fn remove_player(&mut self, id: &PlayerId) -> bool {
        self.players.remove(id)
    }

    pub(crate) fn insert_item(&mut self, id: ItemId) {
        self.items.insert(id);
    }

    pub(crate) fn remove_item(&mut self, id: &ItemId) -> bool {
        self.items.remove(id)
    }
}
