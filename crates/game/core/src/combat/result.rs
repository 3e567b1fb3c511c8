use crate::state::Position;

/// The player's call on the die's parity.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Guess {
    Odd,
    Even,
}

impl Guess {
    pub const fn matches(self, roll: u32) -> bool {
        match self {
            Self::Odd => roll % 2 == 1,
            Self::Even => roll % 2 == 0,
        }
    }
}

/// Who won a round, seen from the local player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DuelResult {
    #[strum(to_string = "Player won")]
    LocalWon,
    #[strum(to_string = "Enemy won")]
    OpponentWon,
}

/// Board effect the session must carry out after a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Consequence {
    /// The local player lost while defending and returns to spawn.
    RespawnLocal,
    /// The opponent lost and returns to spawn.
    RespawnOpponent,
    /// The local attack failed; nobody moves, a counterattack follows.
    CounterQueued,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuelOutcome {
    pub roll: u32,
    pub result: DuelResult,
    pub consequence: Consequence,
}

/// Positions of the two duelists, sampled when a check is made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Engagement {
    pub local: Position,
    pub opponent: Position,
}

impl Engagement {
    pub const fn new(local: Position, opponent: Position) -> Self {
        Self { local, opponent }
    }

    pub const fn is_adjacent(&self) -> bool {
        self.local.is_adjacent(self.opponent)
    }

    pub const fn is_colocated(&self) -> bool {
        self.local.x == self.opponent.x && self.local.y == self.opponent.y
    }

    /// Close enough for a duel to open.
    pub const fn is_engaged(&self) -> bool {
        self.is_adjacent() || self.is_colocated()
    }
}
