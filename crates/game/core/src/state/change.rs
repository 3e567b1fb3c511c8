//! The atomic unit of board mutation.

use super::{EntityKind, ItemId, PlayerId, Position};

/// Moves (or removes) one entity between two coordinates.
///
/// A destination of [`Position::OFF_GRID`] removes the entity from the board.
/// Inside a batch every `from` describes the entity's position before the
/// batch began; changes are not chained.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Change {
    pub to: Position,
    pub from: Position,
    pub entity: EntityRef,
}

/// Typed id of the entity a change targets.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityRef {
    Player(PlayerId),
    Item(ItemId),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Player(_) => EntityKind::Player,
            Self::Item(_) => EntityKind::Item,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Player(id) => id.as_str(),
            Self::Item(id) => id.as_str(),
        }
    }
}

impl Change {
    pub fn player(id: PlayerId, from: Position, to: Position) -> Self {
        Self {
            to,
            from,
            entity: EntityRef::Player(id),
        }
    }

    pub fn item(id: ItemId, from: Position, to: Position) -> Self {
        Self {
            to,
            from,
            entity: EntityRef::Item(id),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.entity.kind()
    }

    pub fn is_removal(&self) -> bool {
        self.to.is_off_grid()
    }

    /// The change that undoes this one.
    pub fn reversed(&self) -> Self {
        Self {
            to: self.from,
            from: self.to,
            entity: self.entity.clone(),
        }
    }
}
