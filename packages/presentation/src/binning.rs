//! Equal-frequency (quantile) binning for choropleth coloring.
//!
//! A [`QuantileScale`] is fitted to the strictly positive, reported values
//! of a sample and then classifies any input, in or out of that domain,
//! into an ordered bin index. Bins cover `[q_i, q_{i+1})`; the last bin is
//! closed at the top so the sample maximum lands in it.

use serde::Serialize;

use crate::PresentationError;

/// Largest bin count a scale can be fitted with.
pub const MAX_BIN_COUNT: usize = 64;

/// A fitted quantile classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantileScale {
    requested: usize,
    thresholds: Vec<f64>,
    min: Option<f64>,
    max: Option<f64>,
    domain_len: usize,
}

impl QuantileScale {
    /// Fits a scale with `bin_count` bins to `samples`.
    ///
    /// Null, non-finite, zero, and negative samples are left out of the
    /// fitting domain. When the domain has fewer distinct values than
    /// `bin_count`, the scale collapses to one bin per distinct value; an
    /// empty or single-valued domain yields a single bin.
    ///
    /// # Errors
    ///
    /// Returns [`PresentationError::InvalidBinCount`] if `bin_count` is
    /// zero or exceeds [`MAX_BIN_COUNT`].
    pub fn fit<I>(samples: I, bin_count: usize) -> Result<Self, PresentationError>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        if bin_count == 0 || bin_count > MAX_BIN_COUNT {
            return Err(PresentationError::InvalidBinCount {
                requested: bin_count,
                max: MAX_BIN_COUNT,
            });
        }

        let mut domain: Vec<f64> = samples
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect();
        domain.sort_by(f64::total_cmp);

        let mut distinct = domain.clone();
        distinct.dedup();

        let thresholds = if distinct.len() < bin_count {
            distinct.iter().skip(1).copied().collect()
        } else {
            let m = domain.len();
            (1..bin_count).map(|i| domain[i * m / bin_count]).collect()
        };

        log::trace!(
            "Fitted quantile scale: {} sample(s), {} distinct, {} bin(s) requested, thresholds={thresholds:?}",
            domain.len(),
            distinct.len(),
            bin_count,
        );

        Ok(Self {
            requested: bin_count,
            thresholds,
            min: domain.first().copied(),
            max: domain.last().copied(),
            domain_len: domain.len(),
        })
    }

    /// Classifies `value` into a bin index in `0..self.bin_count()`.
    ///
    /// Null and `NaN` map to bin 0, as does anything below the first
    /// threshold; anything at or above the last threshold maps to the last
    /// bin. Never panics.
    #[must_use]
    pub fn classify(&self, value: Option<f64>) -> usize {
        match value {
            Some(v) if !v.is_nan() => self.thresholds.partition_point(|t| *t <= v),
            _ => 0,
        }
    }

    /// Number of bins the scale can actually produce.
    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.thresholds.len() + 1
    }

    /// Number of bins the scale was fitted with before any collapse.
    #[must_use]
    pub const fn requested_bins(&self) -> usize {
        self.requested
    }

    /// Interior bin boundaries, ascending. Bin `i` starts at
    /// `thresholds()[i - 1]`.
    #[must_use]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Number of samples in the fitting domain.
    #[must_use]
    pub const fn domain_len(&self) -> usize {
        self.domain_len
    }

    /// Returns `true` when no sample was usable for fitting.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.domain_len == 0
    }

    /// Lower and upper bound of `bin`, using the domain extremes for the
    /// outer edges. `None` for an out-of-range bin or an empty domain.
    #[must_use]
    pub fn bounds(&self, bin: usize) -> Option<(f64, f64)> {
        if bin >= self.bin_count() {
            return None;
        }
        let lower = if bin == 0 {
            self.min?
        } else {
            self.thresholds[bin - 1]
        };
        let upper = self.thresholds.get(bin).copied().or(self.max)?;
        Some((lower, upper))
    }
}
