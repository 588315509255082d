//! Bisection gain solver
//!
//! Inverts "peak envelope as a function of applied gain" to find the scalar
//! gain that lands the loudest envelope value on the reference level. The
//! function is monotonically non-decreasing in the gain (scaling a signal by
//! a larger positive factor cannot decrease its peak envelope), so a bounded
//! bisection converges in a fixed number of iterations, each costing one
//! full metering pass over the buffer.

use crate::config::NormalizeConfig;
use crate::dsp::envelope::VuMeter;
use crate::engine::AudioBuffer;
use crate::error::Result;

/// Which bracket edge the required gain fell outside of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saturation {
    /// The envelope exceeds the reference even at the minimum gain:
    /// the required gain lies below the bracket.
    Lower,
    /// The envelope never reaches the reference even at the maximum gain
    /// (an all-silent buffer always lands here): the required gain lies
    /// above the bracket.
    Upper,
}

/// Result of a gain search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainSolution {
    /// The solved gain, or the bracket edge when saturated
    pub gain: f32,
    /// Peak envelope value of the buffer at `gain`
    pub peak_envelope: f32,
    /// Number of bisection iterations performed
    pub iterations: u32,
    /// Set when the reference level is unreachable within the bracket
    pub saturation: Option<Saturation>,
}

impl GainSolution {
    /// Whether the search ran out of bracket instead of converging
    pub fn is_saturated(&self) -> bool {
        self.saturation.is_some()
    }
}

/// Bisection search for the normalization gain
///
/// # Example
/// ```
/// use vunorm::config::NormalizeConfig;
/// use vunorm::dsp::GainSolver;
/// use vunorm::engine::generate_test_tone;
///
/// let solver = GainSolver::new(&NormalizeConfig::default()).unwrap();
/// let tone = generate_test_tone(440.0, 0.05, 1.0, 44100);
/// let solution = solver.solve(&tone).unwrap();
/// assert!((solution.gain - 2.518).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct GainSolver {
    meter: VuMeter,
    reference_level: f32,
    gain_low: f32,
    gain_high: f32,
    tolerance: f32,
}

impl GainSolver {
    /// Create a solver from a validated configuration
    ///
    /// # Errors
    /// Returns `InvalidParameter` if any tunable is out of range.
    pub fn new(config: &NormalizeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            meter: VuMeter::new(config.release_secs)?,
            reference_level: config.reference_level(),
            gain_low: config.gain_low,
            gain_high: config.gain_high,
            tolerance: config.tolerance,
        })
    }

    /// Linear reference level the solver drives toward
    pub fn reference_level(&self) -> f32 {
        self.reference_level
    }

    /// The meter used for envelope evaluation
    pub fn meter(&self) -> &VuMeter {
        &self.meter
    }

    /// Find the gain that brings the peak envelope to the reference level
    ///
    /// Both bracket edges are evaluated first. If the reference is
    /// unreachable inside `[gain_low, gain_high]`, the search is skipped and
    /// the nearer edge is returned with a `Saturation` marker instead of
    /// silently bisecting toward a boundary.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if the buffer's sample rate is zero.
    pub fn solve(&self, buffer: &AudioBuffer) -> Result<GainSolution> {
        let at_low = self.meter.peak_envelope(buffer, self.gain_low)?;
        if at_low >= self.reference_level {
            return Ok(GainSolution {
                gain: self.gain_low,
                peak_envelope: at_low,
                iterations: 0,
                saturation: Some(Saturation::Lower),
            });
        }

        let at_high = self.meter.peak_envelope(buffer, self.gain_high)?;
        if at_high < self.reference_level {
            return Ok(GainSolution {
                gain: self.gain_high,
                peak_envelope: at_high,
                iterations: 0,
                saturation: Some(Saturation::Upper),
            });
        }

        // Invariant from here on: f(low) < reference <= f(high)
        let mut low = self.gain_low;
        let mut high = self.gain_high;
        let mut iterations = 0_u32;

        while high - low > self.tolerance {
            let mid = (low + high) / 2.0;
            // Stop once the midpoint no longer separates the bracket
            if mid <= low || mid >= high {
                break;
            }
            if self.meter.peak_envelope(buffer, mid)? < self.reference_level {
                low = mid;
            } else {
                high = mid;
            }
            iterations += 1;
        }

        let gain = (low + high) / 2.0;
        let peak_envelope = self.meter.peak_envelope(buffer, gain)?;
        Ok(GainSolution {
            gain,
            peak_envelope,
            iterations,
            saturation: None,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::generate_test_tone;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    fn default_solver() -> GainSolver {
        GainSolver::new(&NormalizeConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = NormalizeConfig {
            tolerance: -1.0,
            ..NormalizeConfig::default()
        };
        assert!(GainSolver::new(&config).is_err());
    }

    #[test]
    fn test_peak_envelope_monotonic_in_gain() {
        let solver = default_solver();
        let tone = generate_test_tone(440.0, 0.3, 0.25, 44100);

        let maxima: Vec<f32> = [0.5_f32, 1.0, 2.0, 5.0]
            .iter()
            .map(|&g| solver.meter().peak_envelope(&tone, g).unwrap())
            .collect();

        for pair in maxima.windows(2) {
            assert!(
                pair[0] <= pair[1],
                "peak envelope decreased with gain: {:?}",
                maxima
            );
        }
    }

    #[test]
    fn test_solves_sine_to_reference() {
        let solver = default_solver();
        let tone = generate_test_tone(440.0, 0.05, 1.0, 44100);

        let solution = solver.solve(&tone).unwrap();
        assert!(!solution.is_saturated());
        // 0.12589 / 0.05 ~= 2.518
        assert_abs_diff_eq!(solution.gain, 2.518, epsilon = 0.01);
        assert_abs_diff_eq!(
            solution.peak_envelope,
            solver.reference_level(),
            epsilon = 1e-3
        );
    }

    #[test_case(-18.0)]
    #[test_case(-20.0)]
    #[test_case(-12.0)]
    fn test_solution_reaches_reference(reference_db: f32) {
        let config = NormalizeConfig {
            reference_db,
            ..NormalizeConfig::default()
        };
        let solver = GainSolver::new(&config).unwrap();
        let tone = generate_test_tone(440.0, 0.1, 0.5, 44100);

        let solution = solver.solve(&tone).unwrap();
        assert!(!solution.is_saturated());
        assert_abs_diff_eq!(
            solution.peak_envelope,
            config.reference_level(),
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_convergence_is_idempotent() {
        let solver = default_solver();
        let tone = generate_test_tone(880.0, 0.07, 0.5, 48000);

        let first = solver.solve(&tone).unwrap();
        let second = solver.solve(&tone).unwrap();
        assert_abs_diff_eq!(first.gain, second.gain, epsilon = 1e-4);
    }

    #[test]
    fn test_scale_invariance() {
        let solver = default_solver();
        let tone = generate_test_tone(440.0, 0.05, 0.5, 44100);
        let scaled = tone.scaled(4.0);

        let base = solver.solve(&tone).unwrap();
        let shrunk = solver.solve(&scaled).unwrap();
        // Pre-scaling by k divides the required gain by k
        assert_abs_diff_eq!(shrunk.gain, base.gain / 4.0, epsilon = 1e-2);
    }

    #[test]
    fn test_silent_buffer_saturates_high() {
        let solver = default_solver();
        let silent = AudioBuffer::new(2, 44100, 44100);

        let solution = solver.solve(&silent).unwrap();
        assert_eq!(solution.saturation, Some(Saturation::Upper));
        assert_eq!(solution.gain, 10.0);
        assert_eq!(solution.peak_envelope, 0.0);
        assert_eq!(solution.iterations, 0);
    }

    #[test]
    fn test_loud_buffer_saturates_low() {
        let solver = default_solver();
        // Peak 1.5: even at gain 0.1 the envelope sits at 0.15 > 0.12589
        let loud = AudioBuffer::from_channels(vec![vec![1.5; 4410]], 44100).unwrap();

        let solution = solver.solve(&loud).unwrap();
        assert_eq!(solution.saturation, Some(Saturation::Lower));
        assert_eq!(solution.gain, 0.1);
        assert!(solution.peak_envelope > solver.reference_level());
    }

    #[test]
    fn test_iteration_count_is_input_independent() {
        let solver = default_solver();
        let short = generate_test_tone(440.0, 0.05, 0.1, 44100);
        let long = generate_test_tone(220.0, 0.02, 1.0, 22050);

        let a = solver.solve(&short).unwrap();
        let b = solver.solve(&long).unwrap();
        // log2(9.9 / 1e-4) ~= 17 halvings for the default bracket
        assert_eq!(a.iterations, b.iterations);
        assert!((16..=18).contains(&a.iterations));
    }

    #[test]
    fn test_solve_rejects_zero_sample_rate() {
        let solver = default_solver();
        let buffer = AudioBuffer::new(1, 100, 0);
        assert!(solver.solve(&buffer).is_err());
    }
}
