//! Session runtime for Cho-Han tactics clients.
//!
//! This crate connects the synchronous rules in `game-core` to the room
//! server. Feed payloads are decoded by [`feed`] and folded into a
//! [`PlayerSession`] or [`SpectatorSession`]; player actions leave through an
//! [`ActionSubmitter`].
//!
//! Modules are organized by responsibility:
//! - [`feed`] decodes the server's message envelopes
//! - [`session`] owns board mirrors, turn state, and the duel popup
//! - [`api`] exposes errors and the outbound transport seam
//! - [`config`] and [`message`] hold session settings and the player log
pub mod api;
pub mod config;
pub mod feed;
pub mod message;
pub mod session;

pub use api::{
    ActionSubmitter, AttackRequest, ChestAttackRequest, FightResultRequest, MoveRequest,
    OutboundAction, RecordingSubmitter, Result, RuntimeError, SkipRequest, SubmitError,
};
pub use config::RuntimeConfig;
pub use feed::{FeedError, FeedEvent, FightNotice, UpdateBatch, parse_event};
pub use message::{MessageEntry, MessageLevel, MessageLog};
pub use session::{PlayerSession, SpectatorSession};
