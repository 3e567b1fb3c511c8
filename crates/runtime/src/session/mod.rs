//! Sessions fold feed events into a board mirror.
//!
//! A [`PlayerSession`] plays for one player id; a [`SpectatorSession`] only
//! watches.
mod player;
mod spectator;

pub use player::PlayerSession;
pub use spectator::SpectatorSession;
