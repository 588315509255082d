//! Normalization configuration
//!
//! Every tunable of the pipeline lives here as an explicit value: the
//! reference level, the meter release time, the bisection bracket and the
//! convergence tolerance. Nothing downstream reads a global constant.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VunormError};

// ============================================================================
// Constants
// ============================================================================

/// Default "0 VU" reference offset in dBFS
pub const DEFAULT_REFERENCE_DB: f32 = -18.0;

/// Default meter release time in seconds (classic VU ballistics)
pub const DEFAULT_RELEASE_SECS: f32 = 0.3;

/// Default lower edge of the gain search bracket
pub const DEFAULT_GAIN_LOW: f32 = 0.1;

/// Default upper edge of the gain search bracket
pub const DEFAULT_GAIN_HIGH: f32 = 10.0;

/// Default bisection convergence tolerance
pub const DEFAULT_TOLERANCE: f32 = 1e-4;

// ============================================================================
// Configuration
// ============================================================================

/// Normalization parameters
///
/// # Fields
/// - `reference_db`: dBFS level that 0 VU maps to (-60 to 0 dB)
/// - `release_secs`: envelope release time constant in seconds
/// - `gain_low` / `gain_high`: bisection bracket for the gain search
/// - `tolerance`: bracket width at which the search stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Reference level offset in dBFS (0 VU maps here)
    pub reference_db: f32,
    /// Envelope release time in seconds
    pub release_secs: f32,
    /// Lower edge of the gain bracket
    pub gain_low: f32,
    /// Upper edge of the gain bracket
    pub gain_high: f32,
    /// Bisection convergence tolerance
    pub tolerance: f32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            reference_db: DEFAULT_REFERENCE_DB,
            release_secs: DEFAULT_RELEASE_SECS,
            gain_low: DEFAULT_GAIN_LOW,
            gain_high: DEFAULT_GAIN_HIGH,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl NormalizeConfig {
    /// Validate parameters against their allowed ranges
    pub fn validate(&self) -> Result<()> {
        if !self.reference_db.is_finite() || self.reference_db < -60.0 || self.reference_db > 0.0 {
            return Err(VunormError::InvalidParameter {
                param: "reference_db".to_string(),
                value: self.reference_db.to_string(),
                expected: "-60 to 0 dBFS".to_string(),
            });
        }
        if !self.release_secs.is_finite() || self.release_secs <= 0.0 {
            return Err(VunormError::InvalidParameter {
                param: "release_secs".to_string(),
                value: self.release_secs.to_string(),
                expected: "> 0 seconds".to_string(),
            });
        }
        if !self.gain_low.is_finite() || self.gain_low <= 0.0 {
            return Err(VunormError::InvalidParameter {
                param: "gain_low".to_string(),
                value: self.gain_low.to_string(),
                expected: "> 0".to_string(),
            });
        }
        if !self.gain_high.is_finite() || self.gain_high <= self.gain_low {
            return Err(VunormError::InvalidParameter {
                param: "gain_high".to_string(),
                value: self.gain_high.to_string(),
                expected: format!("> gain_low ({})", self.gain_low),
            });
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(VunormError::InvalidParameter {
                param: "tolerance".to_string(),
                value: self.tolerance.to_string(),
                expected: "> 0".to_string(),
            });
        }
        Ok(())
    }

    /// Linear amplitude of the reference level (10^(reference_db / 20))
    pub fn reference_level(&self) -> f32 {
        10.0_f32.powf(self.reference_db / 20.0)
    }

    /// Load a configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults. The loaded configuration
    /// is validated before being returned.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VunormError::FileNotFound {
                    path: path.display().to_string(),
                    source: Some(e),
                }
            } else {
                VunormError::Io(e)
            }
        })?;
        let config: NormalizeConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
