//! CLI Module
//!
//! Command-line interface for the vunorm loudness normalizer.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::NormalizeConfig;
use crate::error::Result;

/// vunorm - VU-referenced loudness normalizer
#[derive(Parser, Debug)]
#[command(name = "vunorm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a WAV file to the reference level
    #[command(name = "normalize")]
    Normalize {
        /// Input WAV file
        input: PathBuf,

        /// Output path (default: input with "_vu" before the extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output sample width in bits (16, 24, or 32)
        #[arg(long, default_value_t = 16)]
        bit_depth: u16,

        #[command(flatten)]
        tuning: TuneArgs,
    },

    /// Measure a WAV file without writing anything
    #[command(name = "measure")]
    Measure {
        /// Input WAV file
        input: PathBuf,

        #[command(flatten)]
        tuning: TuneArgs,
    },
}

/// Tunables shared by the subcommands
///
/// Flags override values loaded from `--config`; anything left unset falls
/// back to the defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct TuneArgs {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Reference level offset in dBFS (where 0 VU sits)
    #[arg(long)]
    pub reference_db: Option<f32>,

    /// Envelope release time in seconds
    #[arg(long)]
    pub release: Option<f32>,

    /// Bisection convergence tolerance
    #[arg(long)]
    pub tolerance: Option<f32>,

    /// Lower edge of the gain search bracket
    #[arg(long)]
    pub gain_low: Option<f32>,

    /// Upper edge of the gain search bracket
    #[arg(long)]
    pub gain_high: Option<f32>,
}

impl TuneArgs {
    /// Resolve the effective configuration: file (if any), then flag
    /// overrides, then validation.
    pub fn resolve(&self) -> Result<NormalizeConfig> {
        let mut config = match &self.config {
            Some(path) => NormalizeConfig::from_file(path)?,
            None => NormalizeConfig::default(),
        };

        if let Some(reference_db) = self.reference_db {
            config.reference_db = reference_db;
        }
        if let Some(release) = self.release {
            config.release_secs = release;
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(gain_low) = self.gain_low {
            config.gain_low = gain_low;
        }
        if let Some(gain_high) = self.gain_high {
            config.gain_high = gain_high;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let config = TuneArgs::default().resolve().unwrap();
        assert_eq!(config, NormalizeConfig::default());
    }

    #[test]
    fn test_resolve_overrides() {
        let args = TuneArgs {
            reference_db: Some(-20.0),
            release: Some(0.5),
            ..TuneArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.reference_db, -20.0);
        assert_eq!(config.release_secs, 0.5);
        assert_eq!(config.tolerance, NormalizeConfig::default().tolerance);
    }

    #[test]
    fn test_resolve_rejects_invalid_override() {
        let args = TuneArgs {
            tolerance: Some(0.0),
            ..TuneArgs::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_resolve_flags_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"reference_db": -12.0, "release_secs": 0.4}"#).unwrap();

        let args = TuneArgs {
            config: Some(path),
            reference_db: Some(-24.0),
            ..TuneArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.reference_db, -24.0);
        assert_eq!(config.release_secs, 0.4);
    }
}
