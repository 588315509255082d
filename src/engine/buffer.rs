//! Audio Buffer Management
//!
//! Provides the core sample matrix type shared by the whole pipeline.
//! Samples are stored non-interleaved as 32-bit floats, one `Vec<f32>` per
//! channel, nominally in [-1.0, 1.0]. Values may exceed that range after
//! gain is applied; re-quantization clamping happens at the encoder.

use crate::error::{Result, VunormError};

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// Returns `f32::NEG_INFINITY` for non-positive input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

// ============================================================================
// Audio Buffer
// ============================================================================

/// Multichannel sample buffer
///
/// Rows are time frames, columns are channels. The buffer is rectangular:
/// every channel holds the same number of frames, enforced at construction
/// and maintained by every operation (nothing mutates the shape afterwards).
///
/// # Example
/// ```
/// use vunorm::engine::AudioBuffer;
///
/// // One second of 2-channel silence at 44.1 kHz
/// let buffer = AudioBuffer::new(2, 44100, 44100);
/// assert_eq!(buffer.num_channels(), 2);
/// assert_eq!(buffer.num_frames(), 44100);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Sample data: outer Vec is channels, inner Vec is frames
    samples: Vec<Vec<f32>>,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer of silence with the given shape
    pub fn new(num_channels: usize, num_frames: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![vec![0.0_f32; num_frames]; num_channels],
            sample_rate,
        }
    }

    /// Create a buffer from per-channel sample data
    ///
    /// # Errors
    /// Returns `InvalidAudio` if the channels have differing lengths.
    pub fn from_channels(samples: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if let Some(first) = samples.first() {
            let frames = first.len();
            if samples.iter().any(|ch| ch.len() != frames) {
                return Err(VunormError::InvalidAudio {
                    reason: "channels have differing frame counts".to_string(),
                    source: None,
                });
            }
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Create a buffer from interleaved sample data
    ///
    /// # Errors
    /// Returns `InvalidAudio` if the data length is not divisible by the
    /// channel count.
    pub fn from_interleaved(
        interleaved: &[f32],
        num_channels: usize,
        sample_rate: u32,
    ) -> Result<Self> {
        if num_channels == 0 {
            return Err(VunormError::InvalidAudio {
                reason: "channel count must be at least 1".to_string(),
                source: None,
            });
        }
        if interleaved.len() % num_channels != 0 {
            return Err(VunormError::InvalidAudio {
                reason: format!(
                    "Interleaved data length {} is not divisible by channel count {}",
                    interleaved.len(),
                    num_channels
                ),
                source: None,
            });
        }

        let num_frames = interleaved.len() / num_channels;
        let mut samples = vec![Vec::with_capacity(num_frames); num_channels];

        for frame in interleaved.chunks_exact(num_channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                samples[ch].push(sample);
            }
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Convert the buffer to interleaved format
    pub fn to_interleaved(&self) -> Vec<f32> {
        let num_channels = self.num_channels();
        let num_frames = self.num_frames();

        if num_channels == 0 || num_frames == 0 {
            return Vec::new();
        }

        let mut interleaved = Vec::with_capacity(num_channels * num_frames);
        for frame in 0..num_frames {
            for channel in &self.samples {
                interleaved.push(channel[frame]);
            }
        }
        interleaved
    }

    /// Number of channels
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.samples.len()
    }

    /// Number of frames per channel
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.samples.first().map(|ch| ch.len()).unwrap_or(0)
    }

    /// Check if the buffer holds no frames
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_frames() == 0
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Immutable access to a channel's samples
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds.
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.samples[index]
    }

    /// Mutable access to a channel's samples
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds.
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.samples[index]
    }

    /// Iterate over channels
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.samples.iter().map(|ch| ch.as_slice())
    }

    /// Absolute peak sample value across all channels
    pub fn peak(&self) -> f32 {
        self.samples
            .iter()
            .flat_map(|ch| ch.iter())
            .map(|&s| s.abs())
            .fold(0.0_f32, f32::max)
    }

    /// Minimum and maximum sample values across all channels
    ///
    /// Returns (0.0, 0.0) for an empty buffer.
    pub fn sample_range(&self) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &s in self.samples.iter().flat_map(|ch| ch.iter()) {
            min = min.min(s);
            max = max.max(s);
        }
        if min > max {
            (0.0, 0.0)
        } else {
            (min, max)
        }
    }

    /// Return a new buffer with every sample multiplied by `gain`
    ///
    /// The result keeps the shape and sample rate of the source. No clamping
    /// is performed: samples may leave [-1.0, 1.0], and callers decide how
    /// to handle that before re-quantization.
    pub fn scaled(&self, gain: f32) -> AudioBuffer {
        let samples = self
            .samples
            .iter()
            .map(|ch| ch.iter().map(|&s| s * gain).collect())
            .collect();
        Self {
            samples,
            sample_rate: self.sample_rate,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
