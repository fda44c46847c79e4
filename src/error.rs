//! Error types for event generation

use std::path::PathBuf;
use thiserror::Error;

/// Result type for event generation
pub type Result<T> = std::result::Result<T, EesError>;

/// Errors raised while loading rate tables or generating events.
///
/// Nothing in the crate retries on error; the caller decides whether to
/// reseed, change thresholds or give up.
#[derive(Error, Debug)]
pub enum EesError {
    /// Rate table missing, unreadable or not in the expected layout
    #[error("data format error in {}: {reason}", .path.display())]
    DataFormat { path: PathBuf, reason: String },

    /// Flavor name outside the six known species
    #[error("flavor '{0}' not recognized (expected one of nue, nuebar, numu, numubar, nutau, nutaubar)")]
    InvalidFlavor(String),

    /// Rejection sampling gave up
    #[error("rejection sampling failed to converge after {attempts} rejections on [{x_min}, {x_max}] with bound {y_max}")]
    SamplingConvergence {
        attempts: usize,
        x_min: f64,
        x_max: f64,
        y_max: f64,
    },

    /// Sampling domain or bound cannot produce a sample at all
    #[error("invalid sampling domain [{x_min}, {x_max}] with bound {y_max}")]
    InvalidDomain { x_min: f64, x_max: f64, y_max: f64 },

    /// Recoil cosine outside [-1, 1]
    #[error("recoil cosine {cos_theta} outside [-1, 1] (T = {kinetic_energy} MeV, Ev = {neutrino_energy} MeV)")]
    Kinematic {
        cos_theta: f64,
        kinetic_energy: f64,
        neutrino_energy: f64,
    },

    /// Internal consistency check failed
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Supernova direction has zero length or non-finite components
    #[error("supernova direction {0:?} cannot be normalized")]
    InvalidDirection([f64; 3]),

    /// Every flavor has a zero total rate
    #[error("all flavors have zero total event rate")]
    NoEventRate,

    /// Configuration could not be read or is incomplete
    #[error("configuration error: {0}")]
    Config(String),
}

impl EesError {
    pub(crate) fn data_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        EesError::DataFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
