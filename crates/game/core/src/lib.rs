//! Board rules and data types shared by every Cho-Han client surface.
//!
//! `game-core` defines the canonical board model (tiles, players, items),
//! the [`engine::GridEngine`] that folds position changes into it and renders
//! windows of it, the per-turn rules in [`action`], and the odd/even combat
//! sub-game in [`combat`]. Everything here is synchronous and free of I/O;
//! session layers feed it snapshots and changes and forward its outputs.
pub mod action;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

pub use action::{
    AttackError, AttackTarget, AttackTransition, CardinalDirection, MoveError, MoveTransition,
    SkipError, TurnContext, TurnFlags, TurnSession,
};
pub use combat::{
    Consequence, Duel, DuelError, DuelOutcome, DuelPhase, DuelResult, Engagement, Guess,
};
pub use config::GameConfig;
pub use engine::{ChestInventory, GridEngine, RenderedCell, RenderedGrid, Viewport};
pub use env::{PcgRng, RngOracle, compute_seed};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    Change, ClassStats, EntityKind, EntityRef, InitializationError, Item, ItemId, MapDimensions,
    Player, PlayerClass, PlayerId, Position, Snapshot, Team, Tile, TileFlag, TileOverride,
};
