//! Neutrino-electron elastic scattering kinematics and dσ/dT shape.
//!
//! The overall normalization `G_F² m_e / 2π` is dropped; only the shape in
//! the recoil kinetic energy `T` matters for rejection sampling. All
//! energies are in MeV.

use crate::error::{EesError, Result};
use crate::flavor::Flavor;

/// Weak mixing angle, sin²θ_W
pub const SIN2_THETA_W: f64 = 0.23122;

/// Electron mass in MeV
pub const ELECTRON_MASS_MEV: f64 = 0.510998910;

/// Axial and vector weak couplings of a flavor to the electron.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Couplings {
    pub g_a: f64,
    pub g_v: f64,
}

impl Couplings {
    pub fn for_flavor(flavor: Flavor) -> Self {
        // nu_e picks up the charged-current contribution
        let (g_a, g_v) = match flavor {
            Flavor::Nue => (0.5, 2.0 * SIN2_THETA_W + 0.5),
            Flavor::Nuebar => (-0.5, 2.0 * SIN2_THETA_W + 0.5),
            Flavor::Numu | Flavor::Nutau => (-0.5, 2.0 * SIN2_THETA_W - 0.5),
            Flavor::Numubar | Flavor::Nutaubar => (0.5, 2.0 * SIN2_THETA_W - 0.5),
        };
        Self { g_a, g_v }
    }
}

/// Un-normalized dσ/dT for one flavor at a fixed neutrino energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossSectionModel {
    pub couplings: Couplings,
    pub neutrino_energy: f64,
}

impl CrossSectionModel {
    pub fn new(flavor: Flavor, neutrino_energy: f64) -> Self {
        Self {
            couplings: Couplings::for_flavor(flavor),
            neutrino_energy,
        }
    }

    /// dσ/dT at recoil kinetic energy `t`, up to a constant factor.
    ///
    /// `(g_v+g_a)² + (g_v-g_a)²(1-T/E)² + (g_a²-g_v²) m_e T / E²`
    #[inline]
    pub fn differential(&self, t: f64) -> f64 {
        let Couplings { g_a, g_v } = self.couplings;
        let e = self.neutrino_energy;
        let y = 1.0 - t / e;
        (g_v + g_a).powi(2)
            + (g_v - g_a).powi(2) * y * y
            + (g_a * g_a - g_v * g_v) * (ELECTRON_MASS_MEV * t / (e * e))
    }

    /// Value at `T = 0`, used as the rejection-sampling bound.
    ///
    /// It dominates the whole kinematic range once `E` is above roughly
    /// 0.6 MeV for every flavor.
    pub fn max_differential(&self) -> f64 {
        self.differential(0.0)
    }

    pub fn max_kinetic_energy(&self) -> f64 {
        max_kinetic_energy(self.neutrino_energy)
    }

    pub fn recoil_cosine(&self, t: f64) -> Result<f64> {
        recoil_cosine(t, self.neutrino_energy)
    }
}

/// Largest electron recoil kinetic energy, `2E² / (m_e + 2E)`.
#[inline]
pub fn max_kinetic_energy(neutrino_energy: f64) -> f64 {
    2.0 * neutrino_energy * neutrino_energy / (ELECTRON_MASS_MEV + 2.0 * neutrino_energy)
}

/// Cosine of the electron recoil angle relative to the neutrino direction.
///
/// `cos θ = (E + m_e)/E · sqrt(T / (T + 2 m_e))`. Values outside `[-1, 1]`
/// (a kinetic energy beyond the kinematic limit, or non-finite input) are an
/// error and are never clamped.
pub fn recoil_cosine(kinetic_energy: f64, neutrino_energy: f64) -> Result<f64> {
    let cos_theta = (neutrino_energy + ELECTRON_MASS_MEV) / neutrino_energy
        * (kinetic_energy / (kinetic_energy + 2.0 * ELECTRON_MASS_MEV)).sqrt();
    if !(-1.0..=1.0).contains(&cos_theta) {
        return Err(EesError::Kinematic {
            cos_theta,
            kinetic_energy,
            neutrino_energy,
        });
    }
    Ok(cos_theta)
}
