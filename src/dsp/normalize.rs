//! One-shot normalization pipeline
//!
//! Ties the gain solver and the gain applicator together: solve for the
//! gain that lands the peak envelope on the reference level, then scale
//! every sample by it. The scaled buffer is returned unclamped; deciding
//! what to do with samples outside [-1.0, 1.0] (clip at re-quantization,
//! attenuate further, or report) belongs to the caller.

use crate::config::NormalizeConfig;
use crate::dsp::solver::{GainSolution, GainSolver};
use crate::engine::AudioBuffer;
use crate::error::Result;

/// Outcome of normalizing one buffer
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    /// The gain-adjusted buffer (same shape and rate as the input)
    pub buffer: AudioBuffer,
    /// The solution the gain was taken from
    pub solution: GainSolution,
}

/// Loudness normalizer
///
/// # Example
/// ```
/// use vunorm::config::NormalizeConfig;
/// use vunorm::dsp::Normalizer;
/// use vunorm::engine::generate_test_tone;
///
/// let normalizer = Normalizer::new(&NormalizeConfig::default()).unwrap();
/// let tone = generate_test_tone(440.0, 0.05, 1.0, 44100);
/// let outcome = normalizer.normalize(&tone).unwrap();
/// assert!(!outcome.solution.is_saturated());
/// ```
#[derive(Debug, Clone)]
pub struct Normalizer {
    solver: GainSolver,
}

impl Normalizer {
    /// Create a normalizer from a validated configuration
    pub fn new(config: &NormalizeConfig) -> Result<Self> {
        Ok(Self {
            solver: GainSolver::new(config)?,
        })
    }

    /// Linear reference level the pipeline drives toward
    pub fn reference_level(&self) -> f32 {
        self.solver.reference_level()
    }

    /// Solve for the gain without applying it
    pub fn analyze(&self, buffer: &AudioBuffer) -> Result<GainSolution> {
        self.solver.solve(buffer)
    }

    /// Solve for the gain and apply it uniformly to every sample
    ///
    /// When the solution is saturated, the bracket-edge gain is applied
    /// all the same; the `solution` carries the marker so callers can warn
    /// or reject.
    pub fn normalize(&self, buffer: &AudioBuffer) -> Result<NormalizeOutcome> {
        let solution = self.solver.solve(buffer)?;
        Ok(NormalizeOutcome {
            buffer: buffer.scaled(solution.gain),
            solution,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
