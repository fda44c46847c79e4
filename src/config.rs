// Generator configuration: rate-table locations, seed and default thresholds
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::direction::SupernovaDirection;
use crate::error::{EesError, Result};
use crate::flavor::Flavor;

/// Default electron kinetic-energy threshold in MeV
pub const DEFAULT_E_THRESHOLD: f64 = 1.0;
/// Default neutrino energy threshold in MeV
pub const DEFAULT_NU_THRESHOLD: f64 = 2.0;

// Process-wide configuration, holds file locations only (never the RNG)
pub static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::new()));

/// Configuration container for building an [`EventGenerator`](crate::EventGenerator).
///
/// The central piece is the mapping from flavor to the rate table on disk.
/// Applications can either build a `Config` directly, read one from JSON,
/// or fill the global instance returned by [`Config::global`].
///
/// ```json
/// {
///   "data_files": { "nue": "data/nue.dat", "nuebar": "data/nuebar.dat", ... },
///   "seed": 42,
///   "e_threshold": 1.0,
///   "nu_threshold": 2.0,
///   "sn_direction": "isotropic"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Rate table for each flavor
    #[serde(default)]
    pub data_files: BTreeMap<Flavor, PathBuf>,
    /// RNG seed; `None` draws from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_e_threshold")]
    pub e_threshold: f64,
    #[serde(default = "default_nu_threshold")]
    pub nu_threshold: f64,
    #[serde(default)]
    pub sn_direction: SupernovaDirection,
}

fn default_e_threshold() -> f64 {
    DEFAULT_E_THRESHOLD
}

fn default_nu_threshold() -> f64 {
    DEFAULT_NU_THRESHOLD
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            data_files: BTreeMap::new(),
            seed: None,
            e_threshold: DEFAULT_E_THRESHOLD,
            nu_threshold: DEFAULT_NU_THRESHOLD,
            sn_direction: SupernovaDirection::default(),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| EesError::Config(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EesError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Set the rate table for one flavor
    pub fn set_data_file(&mut self, flavor: Flavor, path: impl Into<PathBuf>) {
        self.data_files.insert(flavor, path.into());
    }

    pub fn get_data_file(&self, flavor: Flavor) -> Option<&Path> {
        self.data_files.get(&flavor).map(PathBuf::as_path)
    }

    /// Set several rate tables at once
    pub fn set_data_files<I, P>(&mut self, files: I)
    where
        I: IntoIterator<Item = (Flavor, P)>,
        P: Into<PathBuf>,
    {
        for (flavor, path) in files {
            self.set_data_file(flavor, path);
        }
    }

    /// Point every flavor at `<dir>/<flavor><suffix>`
    pub fn set_data_dir(&mut self, dir: impl AsRef<Path>, suffix: &str) {
        let dir = dir.as_ref();
        for flavor in Flavor::ALL {
            self.set_data_file(flavor, dir.join(format!("{}{}", flavor, suffix)));
        }
    }

    pub fn missing_flavors(&self) -> Vec<Flavor> {
        Flavor::ALL
            .iter()
            .copied()
            .filter(|f| !self.data_files.contains_key(f))
            .collect()
    }

    /// Rate-table paths in [`Flavor::ALL`] order
    pub fn data_file_paths(&self) -> Result<[PathBuf; 6]> {
        let missing = self.missing_flavors();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
            return Err(EesError::Config(format!(
                "no rate table configured for {}",
                names.join(", ")
            )));
        }
        Ok(Flavor::ALL.map(|f| self.data_files[&f].clone()))
    }

    /// Drop all data-file mappings and restore default settings
    pub fn clear(&mut self) {
        *self = Config::new();
    }
}

impl Config {
    /// Get the global configuration instance
    pub fn global() -> std::sync::MutexGuard<'static, Self> {
        CONFIG
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
