/// Game configuration constants.
///
/// Board rules are fixed per build; session-level knobs live in the runtime
/// configuration instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameConfig;

impl GameConfig {
    /// Half-width of the window rendered around a fighter or ranger.
    pub const SIGHT_RADIUS: u32 = 2;
    /// Half-width of the window rendered around a thief.
    pub const THIEF_SIGHT_RADIUS: u32 = 3;
    /// Faces on the die rolled by the odd/even combat sub-game.
    pub const DUEL_DIE_SIDES: u32 = 10;
    /// Envelopes `{MessageType, Message}` unwrapped before giving up on a payload.
    pub const MAX_ENVELOPE_DEPTH: usize = 3;
    /// Separator between player labels inside a rendered cell.
    pub const PLAYER_LABEL_SEPARATOR: &'static str = ",";
    /// Separator between item groups inside a rendered cell.
    pub const ITEM_LABEL_SEPARATOR: &'static str = "|";
}
