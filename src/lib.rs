//! Neutrino-electron elastic scattering (eES) event generator.
//!
//! Events are drawn from tabulated supernova-neutrino event rates (one table
//! per flavor): a flavor weighted by total rate, a neutrino energy from that
//! flavor's spectrum, an electron recoil energy from the dσ/dT shape, and a
//! recoil direction rotated into the detector frame around the supernova
//! direction.
//!
//! ```no_run
//! use ees_gen::{EventGenerator, EventOptions, Flavor};
//!
//! let paths = Flavor::ALL.map(|f| format!("data/{}.dat", f));
//! let mut gen = EventGenerator::from_files(&paths, Some(42))?;
//! let event = gen.generate_event(&EventOptions::default())?;
//! println!("{} {:.2} MeV -> e- {:.2} MeV", event.flavor, event.nu_energy, event.e_ke);
//! # Ok::<(), ees_gen::EesError>(())
//! ```

pub mod config;
pub mod cross_section;
pub mod direction;
pub mod error;
pub mod event;
pub mod flavor;
pub mod generator;
pub mod rate_table;
pub mod sampling;
pub mod spectrum;

pub use config::Config;
pub use cross_section::{max_kinetic_energy, recoil_cosine, Couplings, CrossSectionModel};
pub use direction::SupernovaDirection;
pub use error::{EesError, Result};
pub use event::Event;
pub use flavor::Flavor;
pub use generator::{EventGenerator, EventOptions};
pub use rate_table::RateTable;
pub use sampling::{rejection_sample, RejectionSampler};
pub use spectrum::{interpolate_linear, FlavorSpectrum};

// Import PyO3 items conditionally
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
mod python {
    pub mod generator_python;
    pub use generator_python::*;
}

#[cfg(feature = "pyo3")]
#[pymodule]
fn ees_gen(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    use crate::python::generator_python;

    m.add_class::<generator_python::PyEventGenerator>()?;
    m.add("FLAVORS", Flavor::ALL.map(|f| f.as_str()).to_vec())?;
    Ok(())
}
