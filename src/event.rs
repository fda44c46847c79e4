use serde::{Deserialize, Serialize};

use crate::flavor::Flavor;

/// True (pre-detector) kinematics of one elastic scattering event.
///
/// Energies are in MeV; both directions are unit vectors in the detector
/// frame. Field names on the wire follow the established event dictionaries
/// (`nuEnergy`, `sn_direction`, `eKE`, `eDir`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub flavor: Flavor,
    #[serde(rename = "nuEnergy")]
    pub nu_energy: f64,
    pub sn_direction: [f64; 3],
    /// Recoil electron kinetic energy
    #[serde(rename = "eKE")]
    pub e_ke: f64,
    /// Recoil electron direction
    #[serde(rename = "eDir")]
    pub e_dir: [f64; 3],
}

impl Event {
    /// Cosine of the angle between the electron and the supernova direction
    pub fn cos_theta(&self) -> f64 {
        self.e_dir
            .iter()
            .zip(self.sn_direction.iter())
            .map(|(a, b)| a * b)
            .sum()
    }
}
