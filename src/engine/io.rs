//! Audio file I/O for vunorm
//!
//! Handles decoding and encoding WAV files. Import normalizes the
//! container's integer samples to [-1.0, 1.0] floats and preserves the
//! native sample rate; export re-quantizes back to the requested width.
//! Quantization clamps out-of-range values, so clipping policy lives here
//! rather than in the gain pipeline.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::engine::buffer::AudioBuffer;
use crate::error::{Result, VunormError};

// ============================================================================
// Export format
// ============================================================================

/// Export format configuration
///
/// Only the sample width is configurable; the output always keeps the
/// buffer's own sample rate (no resampling is performed anywhere).
#[derive(Debug, Clone, Copy)]
pub struct ExportFormat {
    /// Bit depth: 16, 24, or 32 (default: 16)
    pub bit_depth: u16,
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat { bit_depth: 16 }
    }
}

impl ExportFormat {
    /// Create a new export format with the given bit depth
    pub fn new(bit_depth: u16) -> Self {
        ExportFormat { bit_depth }
    }
}

// ============================================================================
// Import / export
// ============================================================================

/// Import a WAV file as a normalized float buffer
///
/// Reads any channel count at 8/16/24/32-bit integer or 32-bit float width
/// and scales samples into [-1.0, 1.0]. The file's sample rate is kept as-is.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a valid WAV file
/// * `UnsupportedFormat` - If the sample width is not supported
/// * `EmptyAudio` - If the file contains no frames
pub fn import_audio(path: &Path) -> Result<AudioBuffer> {
    if !path.exists() {
        return Err(VunormError::FileNotFound {
            path: path.display().to_string(),
            source: None,
        });
    }

    let reader = WavReader::open(path).map_err(|e| VunormError::InvalidAudio {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    let samples_f32 = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;

    let buffer = AudioBuffer::from_interleaved(&samples_f32, channels, sample_rate)?;
    if buffer.is_empty() {
        return Err(VunormError::EmptyAudio);
    }

    Ok(buffer)
}

/// Export an AudioBuffer to a WAV file
///
/// Re-quantizes the normalized floats to the format's bit depth at the
/// buffer's sample rate. Integer widths clamp out-of-range samples to the
/// representable range.
///
/// # Errors
/// * `UnsupportedFormat` - If the bit depth is not 16, 24, or 32
/// * `Io` - If the file cannot be created or written
pub fn export_audio(buffer: &AudioBuffer, path: &Path, format: ExportFormat) -> Result<()> {
    if !matches!(format.bit_depth, 16 | 24 | 32) {
        return Err(VunormError::UnsupportedFormat {
            format: format!("{}-bit audio (only 16, 24, 32 supported)", format.bit_depth),
        });
    }

    let spec = WavSpec {
        channels: buffer.num_channels() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: format.bit_depth,
        sample_format: if format.bit_depth == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };

    let mut writer = WavWriter::create(path, spec).map_err(io_error)?;

    let interleaved = buffer.to_interleaved();
    match format.bit_depth {
        16 => {
            for sample in interleaved {
                let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
                writer.write_sample(scaled).map_err(io_error)?;
            }
        }
        24 => {
            for sample in interleaved {
                // 24-bit stored as i32 in hound
                let scaled = (sample * 8388607.0).clamp(-8388608.0, 8388607.0) as i32;
                writer.write_sample(scaled).map_err(io_error)?;
            }
        }
        32 => {
            for sample in interleaved {
                writer.write_sample(sample).map_err(io_error)?;
            }
        }
        _ => unreachable!("bit depth checked above"),
    }

    writer.finalize().map_err(io_error)?;
    Ok(())
}

/// Generate a mono sine test tone
///
/// Useful for exercising the pipeline in tests.
pub fn generate_test_tone(
    frequency: f32,
    amplitude: f32,
    duration_secs: f32,
    sample_rate: u32,
) -> AudioBuffer {
    let num_frames = (duration_secs * sample_rate as f32) as usize;
    let mut buffer = AudioBuffer::new(1, num_frames, sample_rate);

    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;
    for (i, sample) in buffer.channel_mut(0).iter_mut().enumerate() {
        *sample = amplitude * (angular_freq * i as f32).sin();
    }

    buffer
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn io_error(e: hound::Error) -> VunormError {
    VunormError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        e.to_string(),
    ))
}

/// Read samples from a WAV reader and normalize to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| VunormError::InvalidAudio {
                reason: format!("Failed to read float samples: {}", e),
                source: Some(Box::new(e)),
            }),
        SampleFormat::Int => match bits_per_sample {
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| v as f32 / 128.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| VunormError::InvalidAudio {
                    reason: format!("Failed to read 8-bit samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| VunormError::InvalidAudio {
                    reason: format!("Failed to read 16-bit samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            24 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 8388608.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| VunormError::InvalidAudio {
                    reason: format!("Failed to read 24-bit samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| VunormError::InvalidAudio {
                    reason: format!("Failed to read 32-bit int samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            _ => Err(VunormError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits_per_sample),
            }),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_generate_test_tone() {
        let buffer = generate_test_tone(440.0, 0.5, 1.0, 44100);

        assert_eq!(buffer.num_frames(), 44100);
        assert_eq!(buffer.num_channels(), 1);
        assert_eq!(buffer.sample_rate(), 44100);
        // Peak of a 440 Hz sine over a full second reaches the amplitude
        assert!((buffer.peak() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_round_trip_16bit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_16bit.wav");

        let original = generate_test_tone(440.0, 0.5, 0.2, 44100);
        export_audio(&original, &path, ExportFormat::default()).unwrap();
        let imported = import_audio(&path).unwrap();

        assert_eq!(original.num_frames(), imported.num_frames());
        assert_eq!(original.num_channels(), imported.num_channels());
        assert_eq!(imported.sample_rate(), 44100);

        for (orig, imp) in original
            .channel(0)
            .iter()
            .zip(imported.channel(0).iter())
        {
            // 16-bit quantization error is bounded by one step
            assert!(
                (orig - imp).abs() < 1e-3,
                "Sample mismatch: {} vs {}",
                orig,
                imp
            );
        }
    }

    #[test]
    fn test_round_trip_24bit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_24bit.wav");

        let original = generate_test_tone(1000.0, 0.8, 0.2, 48000);
        export_audio(&original, &path, ExportFormat::new(24)).unwrap();
        let imported = import_audio(&path).unwrap();

        for (orig, imp) in original
            .channel(0)
            .iter()
            .zip(imported.channel(0).iter())
        {
            assert!(
                (orig - imp).abs() < 1e-5,
                "Sample mismatch: {} vs {}",
                orig,
                imp
            );
        }
    }

    #[test]
    fn test_round_trip_32bit_float() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_32bit.wav");

        let original = generate_test_tone(1000.0, 0.8, 0.2, 48000);
        export_audio(&original, &path, ExportFormat::new(32)).unwrap();
        let imported = import_audio(&path).unwrap();

        for (orig, imp) in original
            .channel(0)
            .iter()
            .zip(imported.channel(0).iter())
        {
            assert!(
                (orig - imp).abs() < 1e-7,
                "Sample mismatch: {} vs {}",
                orig,
                imp
            );
        }
    }

    #[test]
    fn test_round_trip_stereo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_stereo.wav");

        let left: Vec<f32> = (0..4410).map(|i| (i as f32 / 100.0).sin() * 0.4).collect();
        let right: Vec<f32> = (0..4410).map(|i| (i as f32 / 50.0).sin() * 0.6).collect();
        let original = AudioBuffer::from_channels(vec![left, right], 44100).unwrap();

        export_audio(&original, &path, ExportFormat::new(24)).unwrap();
        let imported = import_audio(&path).unwrap();

        assert_eq!(imported.num_channels(), 2);
        assert_eq!(imported.num_frames(), 4410);
        for ch in 0..2 {
            for (orig, imp) in original.channel(ch).iter().zip(imported.channel(ch).iter()) {
                assert!((orig - imp).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_export_clamps_out_of_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_clamp.wav");

        let original = AudioBuffer::from_channels(vec![vec![1.5, -2.0, 0.5]], 44100).unwrap();
        export_audio(&original, &path, ExportFormat::default()).unwrap();
        let imported = import_audio(&path).unwrap();

        // Out-of-range samples pinned to full scale at quantization
        assert!(imported.channel(0)[0] <= 1.0);
        assert!(imported.channel(0)[1] >= -1.0);
        assert!((imported.channel(0)[2] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_audio(Path::new("/nonexistent/path/audio.wav"));
        match result.unwrap_err() {
            VunormError::FileNotFound { path, .. } => assert!(path.contains("nonexistent")),
            other => panic!("Expected FileNotFound error, got: {:?}", other),
        }
    }

    #[test]
    fn test_import_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not_a_wav.wav");
        std::fs::write(&path, b"definitely not RIFF data").unwrap();

        assert!(matches!(
            import_audio(&path),
            Err(VunormError::InvalidAudio { .. })
        ));
    }

    #[test]
    fn test_export_rejects_bad_bit_depth() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad_depth.wav");
        let buffer = generate_test_tone(440.0, 0.5, 0.1, 44100);

        assert!(matches!(
            export_audio(&buffer, &path, ExportFormat::new(12)),
            Err(VunormError::UnsupportedFormat { .. })
        ));
    }
}
