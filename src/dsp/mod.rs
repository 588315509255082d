//! Loudness metering and gain solving
//!
//! The numerical core of vunorm: the VU envelope follower, the bisection
//! gain solver, and the one-shot normalization pipeline.

mod envelope;
mod normalize;
mod solver;

pub use envelope::VuMeter;
pub use normalize::{NormalizeOutcome, Normalizer};
pub use solver::{GainSolution, GainSolver, Saturation};
