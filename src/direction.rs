// Supernova directions and the rotation from the neutrino frame to the detector frame

use nalgebra::{Rotation3, Unit, Vector3};
use rand::Rng;
use rand_distr::{Distribution, UnitSphere};
use serde::{Deserialize, Serialize};

use crate::error::{EesError, Result};

/// Tolerance for `dot(e_dir, sn_direction) == cos θ`
pub const ALIGNMENT_TOLERANCE: f64 = 1e-9;

/// How the supernova direction of an event is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SupernovaDirection {
    /// Caller-supplied direction, normalized before use
    Fixed([f64; 3]),
    /// Three U(-1, 1) components, normalized. Over-populates the cube
    /// diagonals slightly; kept as the default for compatibility with
    /// existing event samples.
    #[default]
    CubeNormalized,
    /// Uniform on the unit sphere
    Isotropic,
}

impl SupernovaDirection {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Unit<Vector3<f64>>> {
        match self {
            SupernovaDirection::Fixed(v) => normalize_direction(*v),
            SupernovaDirection::CubeNormalized => Ok(cube_normalized_direction(rng)),
            SupernovaDirection::Isotropic => Ok(isotropic_direction(rng)),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, SupernovaDirection::Fixed(_))
    }
}

/// Normalize a caller-supplied direction.
pub fn normalize_direction(v: [f64; 3]) -> Result<Unit<Vector3<f64>>> {
    let vec = Vector3::from(v);
    if !vec.iter().all(|c| c.is_finite()) {
        return Err(EesError::InvalidDirection(v));
    }
    Unit::try_new(vec, 0.0).ok_or(EesError::InvalidDirection(v))
}

pub fn cube_normalized_direction<R: Rng + ?Sized>(rng: &mut R) -> Unit<Vector3<f64>> {
    loop {
        let v = Vector3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if let Some(dir) = Unit::try_new(v, 0.0) {
            return dir;
        }
    }
}

pub fn isotropic_direction<R: Rng + ?Sized>(rng: &mut R) -> Unit<Vector3<f64>> {
    let [x, y, z]: [f64; 3] = UnitSphere.sample(rng);
    Unit::new_normalize(Vector3::new(x, y, z))
}

/// Rotation carrying +z onto `target`.
///
/// The axis is `z × target` and the angle the one between them. For
/// `target == +z` the axis vanishes and the identity is returned; for
/// `target == -z` a half turn about +x is used.
pub fn rotation_from_z(target: &Unit<Vector3<f64>>) -> Rotation3<f64> {
    let target = target.into_inner();
    let z = Vector3::z();
    let cross = z.cross(&target);
    let cos = target.dot(&z);
    match Unit::try_new(cross, 0.0) {
        Some(axis) => {
            // atan2 keeps precision for nearly (anti)parallel targets
            let angle = cross.norm().atan2(cos);
            Rotation3::from_axis_angle(&axis, angle)
        }
        None if cos > 0.0 => Rotation3::identity(),
        None => Rotation3::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI),
    }
}

/// Unit vector at polar cosine `cos_theta` and azimuth `phi` about +z.
pub fn polar_direction(cos_theta: f64, phi: f64) -> Vector3<f64> {
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    Vector3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Check that a rotated recoil direction still makes angle `cos_theta` with
/// the supernova direction.
pub fn check_alignment(
    e_dir: &Vector3<f64>,
    sn_direction: &Unit<Vector3<f64>>,
    cos_theta: f64,
) -> Result<()> {
    let dot = e_dir.dot(&sn_direction.into_inner());
    if (dot - cos_theta).abs() > ALIGNMENT_TOLERANCE {
        return Err(EesError::InvariantViolation(format!(
            "recoil direction has cosine {} to the supernova direction, expected {}",
            dot, cos_theta
        )));
    }
    Ok(())
}
