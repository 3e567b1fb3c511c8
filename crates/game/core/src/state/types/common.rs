use std::fmt;

use arrayvec::ArrayVec;

/// Stable identifier of a player, as assigned by the room server.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of an item.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
///
/// `x` grows to the right and `y` grows downwards, matching the row-major
/// order of rendered grids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Marker for entities that are not on the board (consumed items,
    /// removed players).
    pub const OFF_GRID: Self = Self { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn is_off_grid(self) -> bool {
        self.x == Self::OFF_GRID.x && self.y == Self::OFF_GRID.y
    }

    /// Shifted position; saturates at the numeric edges instead of wrapping.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Manhattan distance between two positions.
    pub const fn distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }

    /// True when `other` shares an edge with `self` (4-neighbourhood).
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.distance(other) == 1
    }

    /// The four edge-sharing neighbours, in up/down/left/right order.
    pub fn neighbors(self) -> ArrayVec<Position, 4> {
        let mut out = ArrayVec::new();
        out.push(self.offset(0, -1));
        out.push(self.offset(0, 1));
        out.push(self.offset(-1, 0));
        out.push(self.offset(1, 0));
        out
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as i64) < self.width as i64
            && (position.y as i64) < self.height as i64
    }

    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Team affiliation of players and terrain.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    #[default]
    Neutral,
    Team1,
    Team2,
}

impl Team {
    /// Maps the numeric team code used on the wire.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Neutral),
            1 => Some(Self::Team1),
            2 => Some(Self::Team2),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::Neutral => 0,
            Self::Team1 => 1,
            Self::Team2 => 2,
        }
    }

    pub const fn is_neutral(self) -> bool {
        matches!(self, Self::Neutral)
    }

    /// True for the two sides that can own chests and spawns.
    pub const fn is_playing(self) -> bool {
        !self.is_neutral()
    }
}

/// Which occupant table a [`Change`](crate::state::Change) targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Player,
    Item,
}
