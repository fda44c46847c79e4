use std::collections::HashMap;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::config::Config;
use crate::error::EesError;
use crate::flavor::Flavor;
use crate::generator::{EventGenerator, EventOptions};

fn to_py_err(err: EesError) -> PyErr {
    match err {
        EesError::InvalidFlavor(_)
        | EesError::InvalidDirection(_)
        | EesError::DataFormat { .. }
        | EesError::Config(_) => PyValueError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Python wrapper for the Rust EventGenerator
#[pyclass(name = "EventGenerator")]
pub struct PyEventGenerator {
    inner: EventGenerator,
}

#[pymethods]
impl PyEventGenerator {
    /// Build from a {flavor: path} mapping covering all six flavors
    #[new]
    #[pyo3(signature = (data_files, seed=None))]
    fn py_new(data_files: HashMap<String, String>, seed: Option<u64>) -> PyResult<Self> {
        let mut config = Config::new();
        for (name, path) in data_files {
            let flavor: Flavor = name.parse().map_err(to_py_err)?;
            config.set_data_file(flavor, path);
        }
        config.seed = seed;
        let inner = EventGenerator::from_config(&config).map_err(to_py_err)?;
        Ok(PyEventGenerator { inner })
    }

    fn get_event_rate(&self, flavor: &str, nu_energy: f64) -> PyResult<f64> {
        let flavor: Flavor = flavor.parse().map_err(to_py_err)?;
        Ok(self.inner.event_rate(flavor, nu_energy))
    }

    fn get_total_rate(&self, flavor: &str) -> PyResult<f64> {
        let flavor: Flavor = flavor.parse().map_err(to_py_err)?;
        Ok(self.inner.total_rate(flavor))
    }

    /// Generate one event as a dict with keys
    /// flavor, nuEnergy, sn_direction, eKE, eDir
    #[pyo3(signature = (sn_direction=None, flavor=None, e_threshold=1.0, nu_threshold=2.0))]
    fn gen_event<'py>(
        &mut self,
        py: Python<'py>,
        sn_direction: Option<[f64; 3]>,
        flavor: Option<&str>,
        e_threshold: f64,
        nu_threshold: f64,
    ) -> PyResult<&'py PyDict> {
        let mut options = EventOptions::default()
            .with_e_threshold(e_threshold)
            .with_nu_threshold(nu_threshold);
        if let Some(direction) = sn_direction {
            options = options.with_direction(direction);
        }
        if let Some(name) = flavor {
            options = options.with_flavor_name(name).map_err(to_py_err)?;
        }
        let event = self.inner.generate_event(&options).map_err(to_py_err)?;

        let dict = PyDict::new(py);
        dict.set_item("flavor", event.flavor.as_str())?;
        dict.set_item("nuEnergy", event.nu_energy)?;
        dict.set_item("sn_direction", event.sn_direction.to_vec())?;
        dict.set_item("eKE", event.e_ke)?;
        dict.set_item("eDir", event.e_dir.to_vec())?;
        Ok(dict)
    }
}
