//! Reader for tabulated differential event-rate files.
//!
//! The files are whitespace-delimited text produced by the upstream rate tool:
//! one `(energy_GeV, rate)` row per energy bin in ascending energy, comments
//! introduced by `--` (anywhere on a line), and a final summary row whose
//! first field is not a number and whose second field is the total rate.
//!
//! ```text
//! -- eES events, scint20kt
//!  0.0005   0.000e+00
//!  0.0015   3.118e-01
//!  ...
//! ---------------------
//!  Total    1.732e+02
//! ```

use std::path::Path;

use crate::error::{EesError, Result};

/// GeV to MeV
const GEV_TO_MEV: f64 = 1.0e3;

/// Marker appended to a comment; everything after it on a line is ignored.
const COMMENT_MARKER: &str = "--";

/// Parsed rate table for a single flavor.
///
/// `energy_bins` are in MeV and strictly increasing; `rates` has the same
/// length. `total_rate` is taken verbatim from the summary row and is not
/// recomputed from the bins.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    energy_bins: Vec<f64>,
    rates: Vec<f64>,
    total_rate: f64,
}

impl RateTable {
    /// Build a table from values already in MeV, validating the layout.
    pub fn new(energy_bins: Vec<f64>, rates: Vec<f64>, total_rate: f64) -> Result<Self> {
        let table = RateTable {
            energy_bins,
            rates,
            total_rate,
        };
        table.validate(Path::new("<memory>"))?;
        Ok(table)
    }

    /// Read and parse a rate file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(EesError::data_format(path, "file does not exist"));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| EesError::data_format(path, format!("cannot read file: {}", e)))?;
        let table = Self::parse(&text, path)?;
        tracing::debug!(
            path = %path.display(),
            bins = table.energy_bins.len(),
            total_rate = table.total_rate,
            "loaded rate table"
        );
        Ok(table)
    }

    /// Parse the text of a rate file. `source` is only used in error messages.
    pub fn parse(text: &str, source: impl AsRef<Path>) -> Result<Self> {
        let source = source.as_ref();
        let mut rows: Vec<Vec<Option<f64>>> = Vec::new();

        for line in text.lines() {
            let content = match line.find(COMMENT_MARKER) {
                Some(pos) => &line[..pos],
                None => line,
            };
            let content = content.trim();
            if content.is_empty() {
                continue;
            }
            rows.push(content.split_whitespace().map(parse_field).collect());
        }

        let width = match rows.first() {
            Some(row) => row.len(),
            None => return Err(EesError::data_format(source, "no data rows")),
        };
        if width < 2 {
            return Err(EesError::data_format(
                source,
                format!("expected at least 2 columns, found {}", width),
            ));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(EesError::data_format(
                source,
                format!(
                    "inconsistent row length: row {} has {} fields, expected {}",
                    i + 1,
                    row.len(),
                    width
                ),
            ));
        }

        let (summary, data) = match rows.split_last() {
            Some((summary, data)) if !data.is_empty() => (summary, data),
            _ => {
                return Err(EesError::data_format(
                    source,
                    "table needs at least one data row and a summary row",
                ))
            }
        };

        if summary[0].is_some() {
            return Err(EesError::data_format(
                source,
                "last line does not have the expected format, data could be lost or corrupted",
            ));
        }
        let total_rate = summary[1].ok_or_else(|| {
            EesError::data_format(source, "summary row does not hold a numeric total rate")
        })?;

        let mut energy_bins = Vec::with_capacity(data.len());
        let mut rates = Vec::with_capacity(data.len());
        for (i, row) in data.iter().enumerate() {
            match (row[0], row[1]) {
                (Some(energy_gev), Some(rate)) if row.iter().all(Option::is_some) => {
                    energy_bins.push(energy_gev * GEV_TO_MEV);
                    rates.push(rate);
                }
                _ => {
                    return Err(EesError::data_format(
                        source,
                        format!("non-numeric field in data row {}", i + 1),
                    ))
                }
            }
        }

        let table = RateTable {
            energy_bins,
            rates,
            total_rate,
        };
        table.validate(source)?;
        Ok(table)
    }

    fn validate(&self, source: &Path) -> Result<()> {
        if self.energy_bins.is_empty() {
            return Err(EesError::data_format(source, "no energy bins"));
        }
        if self.energy_bins.len() != self.rates.len() {
            return Err(EesError::data_format(
                source,
                format!(
                    "{} energy bins but {} rates",
                    self.energy_bins.len(),
                    self.rates.len()
                ),
            ));
        }
        if self.energy_bins.iter().any(|e| !e.is_finite()) {
            return Err(EesError::data_format(source, "non-finite energy bin"));
        }
        if let Some(i) = self
            .energy_bins
            .windows(2)
            .position(|pair| pair[1] <= pair[0])
        {
            return Err(EesError::data_format(
                source,
                format!("energy bins not strictly increasing at row {}", i + 2),
            ));
        }
        if self.rates.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(EesError::data_format(source, "rates must be finite and non-negative"));
        }
        if !self.total_rate.is_finite() || self.total_rate < 0.0 {
            return Err(EesError::data_format(
                source,
                format!("total rate {} must be finite and non-negative", self.total_rate),
            ));
        }

        let bin_sum = self.bin_sum();
        if bin_sum > 0.0 && (self.total_rate - bin_sum).abs() > 0.5 * bin_sum {
            tracing::warn!(
                source = %source.display(),
                total_rate = self.total_rate,
                bin_sum,
                "total rate disagrees with the sum of per-bin rates"
            );
        }
        Ok(())
    }

    /// Bin energies in MeV, never empty
    pub fn energy_bins(&self) -> &[f64] {
        &self.energy_bins
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Total rate from the summary row
    pub fn total_rate(&self) -> f64 {
        self.total_rate
    }

    /// Sum of the per-bin rates (not necessarily equal to `total_rate`)
    pub fn bin_sum(&self) -> f64 {
        self.rates.iter().sum()
    }

    /// Largest per-bin rate
    pub fn max_rate(&self) -> f64 {
        self.rates.iter().copied().fold(0.0, f64::max)
    }

    pub fn min_energy(&self) -> f64 {
        self.energy_bins[0]
    }

    pub fn max_energy(&self) -> f64 {
        self.energy_bins[self.energy_bins.len() - 1]
    }
}

/// A field counts as numeric only if it parses to a non-NaN float.
fn parse_field(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| !v.is_nan())
}
