//! Numerical solution container
//!
//! A [`Solution`] pairs the sampled values with the physical extent of
//! every axis. Sample coordinates are never stored: axis `k` with extent
//! `(a, b)` and `n` samples has coordinates `a + i·(b − a)/(n − 1)`.
//!
//! - ODE solutions are a [`SolutionValues::Series`], one value per time sample,
//!   with a single `(0, T)` dimension.
//! - PDE solutions are a [`SolutionValues::Grid`] whose rows are time samples
//!   and whose columns are space samples, with dimensions `[(0, T), (0, L)]`.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};

/// Sampled values of a solution
#[derive(Debug, Clone, PartialEq)]
pub enum SolutionValues {
    /// x(tᵢ) for an ordinary differential equation
    Series(DVector<f64>),

    /// u(tᵢ, xⱼ), row i is time sample i
    Grid(DMatrix<f64>),
}

/// Result of a successful solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// `(start, end)` of each axis, time first
    pub dimensions: Vec<(f64, f64)>,

    /// Sampled values
    pub values: SolutionValues,

    /// Solver diagnostics (dt, dx, stability ratio, ...)
    pub metadata: HashMap<String, String>,
}

impl Solution {
    /// Solution of an ODE over `[0, time_period]`
    pub fn series(time_period: f64, values: Vec<f64>) -> Self {
        Self {
            dimensions: vec![(0.0, time_period)],
            values: SolutionValues::Series(DVector::from_vec(values)),
            metadata: HashMap::new(),
        }
    }

    /// Solution of a PDE over `[0, time_period] × [0, length]`
    ///
    /// `rows` is row-major: `time_samples` rows of `space_samples` values.
    pub fn grid(time_period: f64, length: f64, time_samples: usize, space_samples: usize, rows: &[f64]) -> Self {
        Self {
            dimensions: vec![(0.0, time_period), (0.0, length)],
            values: SolutionValues::Grid(DMatrix::from_row_slice(time_samples, space_samples, rows)),
            metadata: HashMap::new(),
        }
    }

    /// Number of time samples
    pub fn time_samples(&self) -> usize {
        match &self.values {
            SolutionValues::Series(values) => values.len(),
            SolutionValues::Grid(values) => values.nrows(),
        }
    }

    /// Number of space samples (`None` for ODE solutions)
    pub fn space_samples(&self) -> Option<usize> {
        match &self.values {
            SolutionValues::Series(_) => None,
            SolutionValues::Grid(values) => Some(values.ncols()),
        }
    }

    /// Number of samples along axis `axis` (0 = time, 1 = space)
    pub fn samples_along(&self, axis: usize) -> Option<usize> {
        match axis {
            0 => Some(self.time_samples()),
            1 => self.space_samples(),
            _ => None,
        }
    }

    /// Coordinates of the samples along `axis`
    pub fn axis(&self, axis: usize) -> Option<Vec<f64>> {
        let (start, end) = *self.dimensions.get(axis)?;
        let samples = self.samples_along(axis)?;
        Some(linspace(start, end, samples))
    }

    /// Values of time sample `k`
    ///
    /// For an ODE solution this is the single value x(t_k).
    pub fn row(&self, k: usize) -> Option<Vec<f64>> {
        match &self.values {
            SolutionValues::Series(values) => values.get(k).map(|value| vec![*value]),
            SolutionValues::Grid(values) => {
                (k < values.nrows()).then(|| values.row(k).iter().copied().collect())
            }
        }
    }

    /// Value at time sample `k` and space sample `j` (`j` ignored for ODEs)
    pub fn value(&self, k: usize, j: usize) -> Option<f64> {
        match &self.values {
            SolutionValues::Series(values) => values.get(k).copied(),
            SolutionValues::Grid(values) => values.get((k, j)).copied(),
        }
    }

    /// Series values, if this is an ODE solution
    pub fn as_series(&self) -> Option<&DVector<f64>> {
        match &self.values {
            SolutionValues::Series(values) => Some(values),
            SolutionValues::Grid(_) => None,
        }
    }

    /// Grid values, if this is a PDE solution
    pub fn as_grid(&self) -> Option<&DMatrix<f64>> {
        match &self.values {
            SolutionValues::Series(_) => None,
            SolutionValues::Grid(values) => Some(values),
        }
    }

    /// Attach a diagnostic key/value pair
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Look up a diagnostic value
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// `samples` evenly spaced points from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (samples - 1) as f64;
            (0..samples).map(|i| start + i as f64 * step).collect()
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
