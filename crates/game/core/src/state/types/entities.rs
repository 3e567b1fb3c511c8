use super::{ItemId, PlayerClass, PlayerId, Position, Team};

/// A participant on the board.
///
/// Lives in the engine's player table; tiles refer to it only by id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub class: PlayerClass,
    pub team: Team,
    pub position: Position,
    pub carried_item: Option<ItemId>,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        class: PlayerClass,
        team: Team,
        position: Position,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            class,
            team,
            position,
            carried_item: None,
        }
    }

    pub fn with_item(mut self, item: ItemId) -> Self {
        self.carried_item = Some(item);
        self
    }

    /// Label shown in rendered cells: the full name, or only its first
    /// character in condensed renders.
    pub fn label(&self, condensed: bool) -> &str {
        condensed_label(&self.name, condensed)
    }

    /// Any other team counts as opposing, neutral included.
    pub fn is_opponent_of(&self, other: &Player) -> bool {
        is_opposing(self.team, other.team)
    }
}

/// A collectible object.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub position: Position,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            position,
        }
    }

    pub fn label(&self, condensed: bool) -> &str {
        condensed_label(&self.name, condensed)
    }
}

pub(crate) fn is_opposing(a: Team, b: Team) -> bool {
    a != b
}

fn condensed_label(name: &str, condensed: bool) -> &str {
    if !condensed {
        return name;
    }
    match name.char_indices().nth(1) {
        Some((end, _)) => &name[..end],
        None => name,
    }
}
