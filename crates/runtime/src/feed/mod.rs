//! Inbound room feed.
//!
//! The room server pushes `{MessageType, Message}` envelopes over SSE. This
//! module turns one such payload into a typed [`FeedEvent`]; transport and
//! line framing are left to the caller.
mod event;
mod parse;
mod wire;

pub use event::{FeedEvent, FightNotice, UpdateBatch};
pub use parse::{FeedError, parse_event};
