//! vunorm - VU-Referenced Loudness Normalizer
//!
//! Normalizes a multichannel PCM recording to the "0 VU = -18 dBFS"
//! broadcast leveling convention. The pipeline:
//!
//! 1. Decode a WAV file into a normalized float buffer ([`engine::io`])
//! 2. Estimate the perceived loudness envelope with VU-meter ballistics
//!    ([`dsp::VuMeter`])
//! 3. Bisect for the uniform gain that lands the peak envelope on the
//!    reference level ([`dsp::GainSolver`])
//! 4. Apply the gain and re-quantize the result back to a WAV container
//!
//! Every tunable (reference offset, release time, bracket, tolerance) flows
//! through [`config::NormalizeConfig`].

pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;

pub use config::NormalizeConfig;
pub use dsp::{GainSolution, GainSolver, NormalizeOutcome, Normalizer, Saturation, VuMeter};
pub use engine::AudioBuffer;
pub use error::{Result, VunormError};
