//! Accept/reject sampling of a scalar from a bounded, non-negative function.
//!
//! The caller supplies the bound `y_max` and is responsible for
//! `f(x) <= y_max` on `[x_min, x_max]`. A too-small bound biases the samples
//! towards the flat top; nothing here can detect that unless the bound check
//! is switched on with [`RejectionSampler::with_bound_check`].

use rand::Rng;

use crate::error::{EesError, Result};

/// Rejections tolerated before sampling is declared non-convergent
pub const MAX_REJECTIONS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectionSampler {
    max_rejections: usize,
    check_bound: bool,
}

impl Default for RejectionSampler {
    fn default() -> Self {
        Self {
            max_rejections: MAX_REJECTIONS,
            check_bound: false,
        }
    }
}

impl RejectionSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rejections(mut self, max_rejections: usize) -> Self {
        self.max_rejections = max_rejections.max(1);
        self
    }

    /// Fail with [`EesError::InvariantViolation`] whenever a candidate
    /// evaluates above `y_max`.
    pub fn with_bound_check(mut self, check_bound: bool) -> Self {
        self.check_bound = check_bound;
        self
    }

    pub fn max_rejections(&self) -> usize {
        self.max_rejections
    }

    pub fn checks_bound(&self) -> bool {
        self.check_bound
    }

    /// Draw `x ~ U(x_min, x_max)` and `y ~ U(0, y_max)` until `y < f(x)`,
    /// returning the first accepted `x`.
    pub fn sample<R, F>(&self, f: F, x_min: f64, x_max: f64, y_max: f64, rng: &mut R) -> Result<f64>
    where
        R: Rng + ?Sized,
        F: Fn(f64) -> f64,
    {
        let domain_ok = x_min.is_finite() && x_max.is_finite() && x_min <= x_max;
        if !domain_ok || !y_max.is_finite() || y_max < 0.0 {
            return Err(EesError::InvalidDomain {
                x_min,
                x_max,
                y_max,
            });
        }

        let mut rejections = 0usize;
        loop {
            let x = if x_min < x_max {
                rng.gen_range(x_min..x_max)
            } else {
                x_min
            };
            // a zero bound accepts only where f(x) > 0
            let y = if y_max > 0.0 {
                rng.gen_range(0.0..y_max)
            } else {
                0.0
            };
            let fx = f(x);

            if self.check_bound && fx > y_max {
                return Err(EesError::InvariantViolation(format!(
                    "f({}) = {} exceeds sampling bound {}",
                    x, fx, y_max
                )));
            }
            if y < fx {
                return Ok(x);
            }

            rejections += 1;
            if rejections >= self.max_rejections {
                tracing::debug!(x_min, x_max, y_max, rejections, "rejection sampling gave up");
                return Err(EesError::SamplingConvergence {
                    attempts: rejections,
                    x_min,
                    x_max,
                    y_max,
                });
            }
        }
    }
}

/// [`RejectionSampler::sample`] with the default rejection cap and no bound check.
pub fn rejection_sample<R, F>(f: F, x_min: f64, x_max: f64, y_max: f64, rng: &mut R) -> Result<f64>
where
    R: Rng + ?Sized,
    F: Fn(f64) -> f64,
{
    RejectionSampler::default().sample(f, x_min, x_max, y_max, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_stay_in_domain() {
        let mut rng = StdRng::seed_from_u64(42);
        let f = |x: f64| (x - 2.0).powi(2);
        for _ in 0..1000 {
            let x = rejection_sample(f, 1.0, 4.0, 4.0, &mut rng).unwrap();
            assert!((1.0..4.0).contains(&x), "x = {}", x);
            assert!(f(x) > 0.0);
        }
    }

    #[test]
    fn test_triangle_distribution_mean() {
        // p(x) = 2x on [0, 1] has mean 2/3
        let mut rng = StdRng::seed_from_u64(7);
        let n = 20_000;
        let sum: f64 = (0..n)
            .map(|_| rejection_sample(|x| x, 0.0, 1.0, 1.0, &mut rng).unwrap())
            .sum();
        assert_abs_diff_eq!(sum / n as f64, 2.0 / 3.0, epsilon = 0.01);
    }

    #[test]
    fn test_zero_function_fails_after_cap() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = rejection_sample(|_| 0.0, 0.0, 1.0, 1.0, &mut rng).unwrap_err();
        match err {
            EesError::SamplingConvergence { attempts, .. } => assert_eq!(attempts, MAX_REJECTIONS),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_custom_cap() {
        let mut rng = StdRng::seed_from_u64(1);
        let sampler = RejectionSampler::new().with_max_rejections(5);
        let err = sampler.sample(|_| 0.0, 0.0, 1.0, 1.0, &mut rng).unwrap_err();
        assert!(matches!(err, EesError::SamplingConvergence { attempts: 5, .. }));
    }

    #[test]
    fn test_invalid_domains() {
        let mut rng = StdRng::seed_from_u64(1);
        for (lo, hi, ymax) in [
            (2.0, 1.0, 1.0),
            (0.0, 1.0, -1.0),
            (f64::NAN, 1.0, 1.0),
            (0.0, f64::INFINITY, 1.0),
        ] {
            let err = rejection_sample(|_| 1.0, lo, hi, ymax, &mut rng).unwrap_err();
            assert!(matches!(err, EesError::InvalidDomain { .. }), "{:?}", err);
        }
    }

    #[test]
    fn test_zero_bound_exhausts_rejections() {
        // all-zero per-bin rates give a zero bound over a valid domain
        let mut rng = StdRng::seed_from_u64(1);
        let err = rejection_sample(|_| 0.0, 2.0, 50.0, 0.0, &mut rng).unwrap_err();
        match err {
            EesError::SamplingConvergence { attempts, y_max, .. } => {
                assert_eq!(attempts, MAX_REJECTIONS);
                assert_eq!(y_max, 0.0);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_point_domain() {
        let mut rng = StdRng::seed_from_u64(3);
        let x = rejection_sample(|_| 1.0, 2.5, 2.5, 1.0, &mut rng).unwrap();
        assert_eq!(x, 2.5);
    }

    #[test]
    fn test_bound_check_catches_undersized_bound() {
        let mut rng = StdRng::seed_from_u64(5);
        let sampler = RejectionSampler::new().with_bound_check(true);
        let err = sampler.sample(|x| 10.0 * x, 0.5, 1.0, 1.0, &mut rng).unwrap_err();
        assert!(matches!(err, EesError::InvariantViolation(_)));
        // same call without the check silently accepts
        assert!(rejection_sample(|x| 10.0 * x, 0.5, 1.0, 1.0, &mut rng).is_ok());
    }
}
