//! Event composition: flavor and neutrino-energy selection, recoil sampling
//! and the rotation of the recoil direction into the detector frame.
//!
//! A generator owns its RNG and is not meant to be shared between threads;
//! run one generator per worker, each with its own seed.

use std::path::Path;

use nalgebra::{Rotation3, Unit, Vector3};
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::config::{Config, DEFAULT_E_THRESHOLD, DEFAULT_NU_THRESHOLD};
use crate::cross_section::CrossSectionModel;
use crate::direction::{check_alignment, polar_direction, rotation_from_z, SupernovaDirection};
use crate::error::{EesError, Result};
use crate::event::Event;
use crate::flavor::Flavor;
use crate::rate_table::RateTable;
use crate::sampling::RejectionSampler;
use crate::spectrum::FlavorSpectrum;

/// Per-call settings for [`EventGenerator::generate_event`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventOptions {
    pub sn_direction: SupernovaDirection,
    /// `None` draws a flavor weighted by total rate
    pub flavor: Option<Flavor>,
    /// Electron kinetic-energy threshold (MeV)
    pub e_threshold: f64,
    /// Neutrino energy threshold (MeV)
    pub nu_threshold: f64,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self {
            sn_direction: SupernovaDirection::default(),
            flavor: None,
            e_threshold: DEFAULT_E_THRESHOLD,
            nu_threshold: DEFAULT_NU_THRESHOLD,
        }
    }
}

impl EventOptions {
    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = Some(flavor);
        self
    }

    /// Same as [`with_flavor`](Self::with_flavor) for a flavor name
    pub fn with_flavor_name(self, name: &str) -> Result<Self> {
        Ok(self.with_flavor(name.parse()?))
    }

    pub fn with_direction(mut self, direction: [f64; 3]) -> Self {
        self.sn_direction = SupernovaDirection::Fixed(direction);
        self
    }

    pub fn with_direction_sampling(mut self, mode: SupernovaDirection) -> Self {
        self.sn_direction = mode;
        self
    }

    pub fn with_e_threshold(mut self, e_threshold: f64) -> Self {
        self.e_threshold = e_threshold;
        self
    }

    pub fn with_nu_threshold(mut self, nu_threshold: f64) -> Self {
        self.nu_threshold = nu_threshold;
        self
    }
}

/// Elastic-scattering event generator.
///
/// Holds one [`FlavorSpectrum`] per flavor (all on the same energy axis)
/// and the random number source. Apart from the RNG state the generator is
/// immutable once built.
#[derive(Debug, Clone)]
pub struct EventGenerator<R = ChaChaRng> {
    spectra: Vec<FlavorSpectrum>,
    flavor_weights: Option<WeightedIndex<f64>>,
    sampler: RejectionSampler,
    defaults: EventOptions,
    rng: R,
}

impl EventGenerator<ChaChaRng> {
    /// Build from six tables in [`Flavor::ALL`] order. `None` seeds from OS entropy.
    pub fn new(tables: [RateTable; 6], seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => ChaChaRng::seed_from_u64(seed),
            None => ChaChaRng::from_entropy(),
        };
        Self::with_rng(tables, rng)
    }

    /// Read the six rate files, given in [`Flavor::ALL`] order.
    pub fn from_files<P: AsRef<Path>>(paths: &[P; 6], seed: Option<u64>) -> Result<Self> {
        let tables = read_tables(paths)?;
        Self::new(tables, seed)
    }

    /// Build from a [`Config`], taking its seed, thresholds and direction mode
    /// as the defaults for [`generate`](Self::generate).
    pub fn from_config(config: &Config) -> Result<Self> {
        let paths = config.data_file_paths()?;
        let defaults = EventOptions {
            sn_direction: config.sn_direction,
            flavor: None,
            e_threshold: config.e_threshold,
            nu_threshold: config.nu_threshold,
        };
        Ok(Self::from_files(&paths, config.seed)?.with_defaults(defaults))
    }

    pub fn from_global_config() -> Result<Self> {
        let config = Config::global().clone();
        Self::from_config(&config)
    }
}

impl<R: Rng> EventGenerator<R> {
    /// Build from six tables in [`Flavor::ALL`] order with a caller-owned RNG.
    pub fn with_rng(tables: [RateTable; 6], rng: R) -> Result<Self> {
        let spectra: Vec<FlavorSpectrum> = Flavor::ALL
            .iter()
            .zip(tables)
            .map(|(&flavor, table)| FlavorSpectrum::new(flavor, table))
            .collect();

        let axis = spectra[0].energy_bins();
        for spectrum in &spectra[1..] {
            if spectrum.energy_bins() != axis {
                return Err(EesError::data_format(
                    spectrum.flavor.as_str(),
                    format!("energy bins differ from the {} table", spectra[0].flavor),
                ));
            }
        }

        let flavor_weights = WeightedIndex::new(spectra.iter().map(|s| s.total_rate())).ok();
        if flavor_weights.is_none() {
            tracing::warn!("every flavor has zero total rate, random flavor selection disabled");
        }

        tracing::info!(
            bins = axis.len(),
            e_min = axis[0],
            e_max = axis[axis.len() - 1],
            total_rates = ?spectra.iter().map(|s| s.total_rate()).collect::<Vec<_>>(),
            "event generator ready"
        );

        Ok(Self {
            spectra,
            flavor_weights,
            sampler: RejectionSampler::default(),
            defaults: EventOptions::default(),
            rng,
        })
    }

    /// Replace the rejection sampler, e.g. to enable the bound check
    pub fn with_sampler(mut self, sampler: RejectionSampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Replace the options used by [`generate`](Self::generate)
    pub fn with_defaults(mut self, defaults: EventOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &EventOptions {
        &self.defaults
    }

    pub fn spectrum(&self, flavor: Flavor) -> &FlavorSpectrum {
        &self.spectra[flavor.index()]
    }

    /// Common energy axis (MeV)
    pub fn energy_bins(&self) -> &[f64] {
        self.spectra[0].energy_bins()
    }

    /// Interpolated event rate of `flavor` at `nu_energy` (MeV)
    pub fn event_rate(&self, flavor: Flavor, nu_energy: f64) -> f64 {
        self.spectrum(flavor).rate_at(nu_energy)
    }

    pub fn total_rate(&self, flavor: Flavor) -> f64 {
        self.spectrum(flavor).total_rate()
    }

    /// Return `flavor` unchanged, or draw one weighted by total rate.
    pub fn select_flavor(&mut self, flavor: Option<Flavor>) -> Result<Flavor> {
        if let Some(flavor) = flavor {
            return Ok(flavor);
        }
        let weights = self.flavor_weights.as_ref().ok_or(EesError::NoEventRate)?;
        Ok(Flavor::ALL[weights.sample(&mut self.rng)])
    }

    /// [`select_flavor`](Self::select_flavor) for a flavor name
    pub fn select_flavor_named(&mut self, name: Option<&str>) -> Result<Flavor> {
        let flavor = name.map(str::parse::<Flavor>).transpose()?;
        self.select_flavor(flavor)
    }

    /// Select a flavor and draw a neutrino energy from its rate spectrum on
    /// `[max(E_min, nu_threshold), E_max]`.
    pub fn select_neutrino(
        &mut self,
        flavor: Option<Flavor>,
        nu_threshold: f64,
    ) -> Result<(Flavor, f64)> {
        let flavor = self.select_flavor(flavor)?;
        let spectrum = &self.spectra[flavor.index()];
        let (e_min, e_max) = spectrum.energy_domain(nu_threshold);
        let nu_energy = self.sampler.sample(
            |e| spectrum.rate_at(e),
            e_min,
            e_max,
            spectrum.max_rate(),
            &mut self.rng,
        )?;
        Ok((flavor, nu_energy))
    }

    /// Generate one event with the generator's default options.
    pub fn generate(&mut self) -> Result<Event> {
        let options = self.defaults;
        self.generate_event(&options)
    }

    pub fn generate_event(&mut self, options: &EventOptions) -> Result<Event> {
        let (flavor, nu_energy) = self.select_neutrino(options.flavor, options.nu_threshold)?;
        let sn_direction = options.sn_direction.sample(&mut self.rng)?;
        let rotation = rotation_from_z(&sn_direction);
        self.compose(flavor, nu_energy, &sn_direction, &rotation, options.e_threshold)
    }

    /// Generate an event at a fixed neutrino energy, skipping spectrum sampling.
    pub fn generate_event_at_energy(
        &mut self,
        flavor: Flavor,
        nu_energy: f64,
        sn_direction: &SupernovaDirection,
        e_threshold: f64,
    ) -> Result<Event> {
        let sn_direction = sn_direction.sample(&mut self.rng)?;
        let rotation = rotation_from_z(&sn_direction);
        self.compose(flavor, nu_energy, &sn_direction, &rotation, e_threshold)
    }

    /// Generate `n` events. With a fixed supernova direction the rotation is
    /// built once; the random stream is the same as `n` calls to
    /// [`generate_event`](Self::generate_event).
    pub fn generate_events(&mut self, n: usize, options: &EventOptions) -> Result<Vec<Event>> {
        let fixed = match options.sn_direction {
            SupernovaDirection::Fixed(v) => {
                let dir = crate::direction::normalize_direction(v)?;
                Some((dir, rotation_from_z(&dir)))
            }
            _ => None,
        };

        let mut events = Vec::with_capacity(n);
        for _ in 0..n {
            let event = match &fixed {
                Some((dir, rotation)) => {
                    let (flavor, nu_energy) =
                        self.select_neutrino(options.flavor, options.nu_threshold)?;
                    self.compose(flavor, nu_energy, dir, rotation, options.e_threshold)?
                }
                None => self.generate_event(options)?,
            };
            events.push(event);
        }
        tracing::debug!(n, "generated event batch");
        Ok(events)
    }

    fn compose(
        &mut self,
        flavor: Flavor,
        nu_energy: f64,
        sn_direction: &Unit<Vector3<f64>>,
        rotation: &Rotation3<f64>,
        e_threshold: f64,
    ) -> Result<Event> {
        let model = CrossSectionModel::new(flavor, nu_energy);
        let e_ke = self.sampler.sample(
            |t| model.differential(t),
            e_threshold,
            model.max_kinetic_energy(),
            model.max_differential(),
            &mut self.rng,
        )?;
        let cos_theta = model.recoil_cosine(e_ke)?;

        let phi = self.rng.gen_range(0.0..std::f64::consts::TAU);
        let e_dir = rotation * polar_direction(cos_theta, phi);
        check_alignment(&e_dir, sn_direction, cos_theta)?;

        tracing::trace!(%flavor, nu_energy, e_ke, cos_theta, "composed event");
        Ok(Event {
            flavor,
            nu_energy,
            sn_direction: [sn_direction.x, sn_direction.y, sn_direction.z],
            e_ke,
            e_dir: [e_dir.x, e_dir.y, e_dir.z],
        })
    }
}

fn read_tables<P: AsRef<Path>>(paths: &[P; 6]) -> Result<[RateTable; 6]> {
    let tables = paths
        .iter()
        .map(RateTable::from_file)
        .collect::<Result<Vec<_>>>()?;
    tables.try_into().map_err(|_: Vec<RateTable>| {
        EesError::Config("expected exactly six rate tables".to_string())
    })
}
