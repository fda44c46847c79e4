use crate::flavor::Flavor;
use crate::rate_table::RateTable;

/// Piecewise-linear interpolation of `y(x)` at `x_new`.
///
/// `x` must be strictly increasing and the same length as `y`. Outside
/// `[x[0], x[n-1]]` the nearest end value is returned.
pub fn interpolate_linear(x: &[f64], y: &[f64], x_new: f64) -> f64 {
    let n = x.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 || x_new <= x[0] {
        return y[0];
    }
    if x_new >= x[n - 1] {
        return y[n - 1];
    }

    // first index with x[hi] > x_new; 1 <= hi <= n - 1 here
    let hi = x.partition_point(|&xi| xi <= x_new);
    let lo = hi - 1;
    let t = (x_new - x[lo]) / (x[hi] - x[lo]);
    y[lo] + t * (y[hi] - y[lo])
}

/// Event-rate spectrum of one flavor.
#[derive(Debug, Clone, PartialEq)]
pub struct FlavorSpectrum {
    pub flavor: Flavor,
    pub table: RateTable,
}

impl FlavorSpectrum {
    pub fn new(flavor: Flavor, table: RateTable) -> Self {
        Self { flavor, table }
    }

    /// Interpolated event rate at `energy` (MeV), flat beyond the table ends.
    #[inline]
    pub fn rate_at(&self, energy: f64) -> f64 {
        interpolate_linear(self.table.energy_bins(), self.table.rates(), energy)
    }

    #[inline]
    pub fn total_rate(&self) -> f64 {
        self.table.total_rate()
    }

    pub fn energy_bins(&self) -> &[f64] {
        self.table.energy_bins()
    }

    /// Upper bound of `rate_at` over the whole axis
    pub fn max_rate(&self) -> f64 {
        self.table.max_rate()
    }

    /// Neutrino-energy sampling domain for a given threshold (MeV).
    pub fn energy_domain(&self, nu_threshold: f64) -> (f64, f64) {
        (
            self.table.min_energy().max(nu_threshold),
            self.table.max_energy(),
        )
    }
}
