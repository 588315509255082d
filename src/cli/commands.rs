//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::NormalizeConfig;
use crate::dsp::{Normalizer, Saturation, VuMeter};
use crate::engine::{export_audio, import_audio, linear_to_db, ExportFormat};
use crate::error::Result;

/// Suffix inserted before the extension of derived output paths
const OUTPUT_SUFFIX: &str = "_vu";

/// Normalize a WAV file and write the adjusted result.
pub fn normalize(
    input: &Path,
    output: Option<&Path>,
    bit_depth: u16,
    config: &NormalizeConfig,
) -> Result<()> {
    info!("Normalizing: {}", input.display());

    let buffer = import_audio(input)?;
    println!(
        "Loaded '{}': {} channel(s), {} Hz, {:.2}s",
        input.display(),
        buffer.num_channels(),
        buffer.sample_rate(),
        buffer.duration_secs()
    );

    let (min, max) = buffer.sample_range();
    println!("Normalized data range: {:.6} to {:.6}", min, max);

    let normalizer = Normalizer::new(config)?;
    let outcome = normalizer.normalize(&buffer)?;
    report_saturation(&outcome.solution.saturation, outcome.solution.gain);

    println!("Gain adjustment factor: {:.6}", outcome.solution.gain);

    let (min, max) = outcome.buffer.sample_range();
    println!("Adjusted data range: {:.6} to {:.6}", min, max);

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => derive_output_path(input),
    };
    export_audio(&outcome.buffer, &output, ExportFormat::new(bit_depth))?;
    println!("Adjusted audio saved as '{}'", output.display());

    Ok(())
}

/// Measure a WAV file's loudness and report the gain it would receive.
pub fn measure(input: &Path, config: &NormalizeConfig) -> Result<()> {
    info!("Measuring: {}", input.display());

    let buffer = import_audio(input)?;
    println!(
        "Loaded '{}': {} channel(s), {} Hz, {:.2}s",
        input.display(),
        buffer.num_channels(),
        buffer.sample_rate(),
        buffer.duration_secs()
    );

    let normalizer = Normalizer::new(config)?;
    let solution = normalizer.analyze(&buffer)?;
    report_saturation(&solution.saturation, solution.gain);

    let meter = VuMeter::new(config.release_secs)?;
    let current_peak = meter.peak_envelope(&buffer, 1.0)?;
    println!(
        "Peak envelope: {:.6} ({:.2} dBFS)",
        current_peak,
        linear_to_db(current_peak)
    );
    println!(
        "Reference level: {:.6} ({:.1} dBFS)",
        normalizer.reference_level(),
        config.reference_db
    );
    println!("Suggested gain: {:.6}", solution.gain);

    Ok(())
}

/// Interactive mode: prompt for the input path and normalize with defaults.
pub fn interactive() -> Result<()> {
    print!("Enter the path to the WAV file: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let input = PathBuf::from(line.trim());

    normalize(&input, None, 16, &NormalizeConfig::default())
}

/// Derive the output path by inserting the suffix before the extension.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, OUTPUT_SUFFIX),
    };
    input.with_file_name(file_name)
}

fn report_saturation(saturation: &Option<Saturation>, gain: f32) {
    match saturation {
        Some(Saturation::Lower) => warn!(
            "input exceeds the reference even at the minimum gain; using bracket edge {:.3}",
            gain
        ),
        Some(Saturation::Upper) => warn!(
            "input cannot reach the reference even at the maximum gain; using bracket edge {:.3}",
            gain
        ),
        None => {}
    }
}

// ============================================================================
// Tests
// ============================================================================
