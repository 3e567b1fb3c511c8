//! Character classes and their static stat table.

use crate::config::GameConfig;

/// Derived combat stats for a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassStats {
    pub power: u32,
    pub defence: u32,
    pub range: u32,
    /// Tiles a player may move per turn.
    pub movement_speed: u32,
    pub initial_hp: u32,
    /// Half-width of the fog-of-war window rendered around the player.
    pub sight_radius: u32,
}

/// Closed set of playable classes.
///
/// Parsing is case-insensitive and accepts the legacy names used by older
/// rooms (`Archer` for ranger, `Rogue` for thief).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerClass {
    Fighter,
    #[strum(to_string = "Ranger", serialize = "Archer")]
    Ranger,
    #[strum(to_string = "Thief", serialize = "Rogue")]
    Thief,
}

const FIGHTER: ClassStats = ClassStats {
    power: 2,
    defence: 1,
    range: 1,
    movement_speed: 1,
    initial_hp: 2,
    sight_radius: GameConfig::SIGHT_RADIUS,
};

const RANGER: ClassStats = ClassStats {
    power: 2,
    defence: 0,
    range: 2,
    movement_speed: 1,
    initial_hp: 2,
    sight_radius: GameConfig::SIGHT_RADIUS,
};

const THIEF: ClassStats = ClassStats {
    power: 2,
    defence: 0,
    range: 1,
    movement_speed: 2,
    initial_hp: 2,
    sight_radius: GameConfig::THIEF_SIGHT_RADIUS,
};

impl PlayerClass {
    pub const fn stats(self) -> &'static ClassStats {
        match self {
            Self::Fighter => &FIGHTER,
            Self::Ranger => &RANGER,
            Self::Thief => &THIEF,
        }
    }

    pub const fn movement_speed(self) -> u32 {
        self.stats().movement_speed
    }

    pub const fn sight_radius(self) -> u32 {
        self.stats().sight_radius
    }
}
