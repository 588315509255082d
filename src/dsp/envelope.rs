//! VU-ballistics envelope follower
//!
//! A one-pole peak-hold/release detector: instantaneous attack (the max with
//! the rectified sample never misses a peak) and exponential release with
//! coefficient `alpha = exp(-1 / (release_secs * sample_rate))`. With the
//! default 0.3 s release this approximates classic VU meter response.

use crate::engine::AudioBuffer;
use crate::error::{Result, VunormError};

/// VU meter envelope follower
///
/// Produces, for one channel of samples `x`, the envelope sequence
///
/// ```text
/// v[0] = |x[0]|
/// v[i] = max(alpha * v[i-1], |x[i]|)    for i >= 1
/// ```
///
/// The recurrence is strictly sequential: each value depends on the prior
/// output, so it is computed as an explicit in-order loop.
///
/// # Example
/// ```
/// use vunorm::dsp::VuMeter;
///
/// let meter = VuMeter::new(0.3).unwrap();
/// let envelope = meter.envelope(&[0.5, 0.0, 0.0], 44100).unwrap();
/// assert_eq!(envelope.len(), 3);
/// assert_eq!(envelope[0], 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct VuMeter {
    /// Release time constant in seconds
    release_secs: f32,
}

impl VuMeter {
    /// Create a meter with the given release time
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `release_secs` is not a positive,
    /// finite number.
    pub fn new(release_secs: f32) -> Result<Self> {
        if !release_secs.is_finite() || release_secs <= 0.0 {
            return Err(VunormError::InvalidParameter {
                param: "release_secs".to_string(),
                value: release_secs.to_string(),
                expected: "> 0 seconds".to_string(),
            });
        }
        Ok(Self { release_secs })
    }

    /// Release time constant in seconds
    pub fn release_secs(&self) -> f32 {
        self.release_secs
    }

    /// Per-sample release coefficient for the given rate
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `sample_rate` is zero.
    pub fn release_coeff(&self, sample_rate: u32) -> Result<f32> {
        if sample_rate == 0 {
            return Err(VunormError::InvalidParameter {
                param: "sample_rate".to_string(),
                value: "0".to_string(),
                expected: "> 0 Hz".to_string(),
            });
        }
        Ok((-1.0 / (self.release_secs * sample_rate as f32)).exp())
    }

    /// Envelope sequence for one channel of samples
    ///
    /// The result has the same length as the input; an empty input yields an
    /// empty sequence. Every value is non-negative and at least the
    /// rectified sample at the same index.
    pub fn envelope(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>> {
        let alpha = self.release_coeff(sample_rate)?;

        let mut envelope = Vec::with_capacity(samples.len());
        let mut level = 0.0_f32;
        for (i, &sample) in samples.iter().enumerate() {
            let rectified = sample.abs();
            level = if i == 0 {
                rectified
            } else {
                (alpha * level).max(rectified)
            };
            envelope.push(level);
        }
        Ok(envelope)
    }

    /// Maximum envelope value across all channels at a candidate gain
    ///
    /// Runs the follower independently over every channel of `buffer` with
    /// each sample pre-scaled by `gain` (identical to metering `buffer`
    /// scaled by `gain`) and returns the single largest envelope value.
    /// This is a pure function of its inputs and the dominant cost of one
    /// solver iteration: O(frames x channels).
    pub fn peak_envelope(&self, buffer: &AudioBuffer, gain: f32) -> Result<f32> {
        let alpha = self.release_coeff(buffer.sample_rate())?;

        let mut peak = 0.0_f32;
        for channel in buffer.channels() {
            let mut level = 0.0_f32;
            for (i, &sample) in channel.iter().enumerate() {
                let rectified = (sample * gain).abs();
                level = if i == 0 {
                    rectified
                } else {
                    (alpha * level).max(rectified)
                };
                peak = peak.max(level);
            }
        }
        Ok(peak)
    }
}

// ============================================================================
// Tests
// ============================================================================
