//! Environment collaborators injected into the rules.
//!
//! The only external capability the board rules need is randomness for the
//! combat roll; it is modelled as an oracle trait so sessions can supply a
//! seeded generator and tests a fixed one.
pub mod rng;

pub use rng::{PcgRng, RngOracle, compute_seed};
