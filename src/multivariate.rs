//! Multivariate signals and dimension shuffling.
//!
//! A [`PointSeries`] is an ordered collection of points, each a fixed-arity
//! tuple of reals. The only surrogate construction defined on it is
//! dimension shuffling: permute the components *within* each point
//! independently, leaving the temporal sequence of points untouched. This
//! destroys cross-dimension (state-space) structure while preserving, at
//! every time index, the multiset of component values observed there.

use crate::errors::{validate_all_finite, SurrogateError, SurrogateResult};
use crate::rng::SurrogateRng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered sequence of fixed-arity points.
///
/// Construction validates that every row carries the same number of
/// components; the series is immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointSeries {
    rows: Vec<Vec<f64>>,
    dimension: usize,
}

impl PointSeries {
    /// Build a series from per-point rows.
    ///
    /// # Errors
    /// * [`SurrogateError::InsufficientData`] - no rows
    /// * [`SurrogateError::DimensionalityMismatch`] - ragged rows or
    ///   zero-component points
    /// * [`SurrogateError::NumericalError`] - non-finite components
    pub fn from_rows(rows: Vec<Vec<f64>>) -> SurrogateResult<Self> {
        let first = rows.first().ok_or(SurrogateError::InsufficientData {
            required: 1,
            actual: 0,
        })?;

        let dimension = first.len();
        if dimension == 0 {
            return Err(SurrogateError::DimensionalityMismatch {
                required: 1,
                actual: 0,
            });
        }

        for row in &rows {
            if row.len() != dimension {
                return Err(SurrogateError::DimensionalityMismatch {
                    required: dimension,
                    actual: row.len(),
                });
            }
            validate_all_finite(row, "point")?;
        }

        Ok(Self { rows, dimension })
    }

    /// Number of points in the series.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false: construction rejects empty series.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of components per point.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// All points, in temporal order.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// One point by time index.
    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    /// Consume the series, yielding its rows.
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }
}

/// Stateful generator permuting components within each point per draw.
///
/// The multivariate counterpart of
/// [`SurrogateGenerator`](crate::generator::SurrogateGenerator); same
/// contract: validation at build, infallible repeatable draws, RNG owned
/// by the generator.
pub struct DimensionShuffleGenerator {
    series: PointSeries,
    rng: SurrogateRng,
}

impl DimensionShuffleGenerator {
    /// Validate that `series` is genuinely multidimensional.
    ///
    /// Dimension shuffling is meaningless on scalar points, so arity 1 is
    /// rejected with [`SurrogateError::DimensionalityMismatch`].
    pub fn build(series: &PointSeries, rng: SurrogateRng) -> SurrogateResult<Self> {
        if series.dimension() < 2 {
            return Err(SurrogateError::DimensionalityMismatch {
                required: 2,
                actual: series.dimension(),
            });
        }

        Ok(Self {
            series: series.clone(),
            rng,
        })
    }

    /// Draw one surrogate series.
    ///
    /// Each point's components are shuffled independently; the row order
    /// never changes.
    pub fn generate(&mut self) -> PointSeries {
        let mut rows = self.series.rows.clone();
        for row in &mut rows {
            self.rng.shuffle(row);
        }

        PointSeries {
            rows,
            dimension: self.series.dimension,
        }
    }

    /// Draw an ensemble of `count` independent surrogate series.
    pub fn generate_ensemble(&mut self, count: usize) -> Vec<PointSeries> {
        (0..count).map(|_| self.generate()).collect()
    }

    /// The series this generator was built against.
    pub fn series(&self) -> &PointSeries {
        &self.series
    }
}
