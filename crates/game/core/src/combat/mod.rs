//! The odd/even duel fought whenever two opposing players meet.
//!
//! A round rolls one die; the local player wins by calling its parity. A
//! failed local attack does not hurt the attacker but queues a
//! counterattack round in which the local player defends.
mod duel;
mod result;

pub use duel::{Duel, DuelError, DuelPhase};
pub use result::{Consequence, DuelOutcome, DuelResult, Engagement, Guess};
