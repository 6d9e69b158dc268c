// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Regular-Grid Interpolation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Multilinear interpolation on rectilinear grids.
//!
//! A [`RegularGridInterpolator`] maps coordinates on an axis-aligned mesh
//! (R, Z) or (R, Z, φ) to samples stored on that mesh. Any coordinate outside
//! its axis range yields the configured fill value instead of an error.

use magfield_types::error::{FieldError, FieldResult};
use ndarray::{Array1, ArrayD, ArrayViewD, IxDyn};

/// Highest supported grid dimension.
const MAX_DIMS: usize = 4;

#[derive(Debug, Clone)]
pub struct RegularGridInterpolator {
    axes: Vec<Array1<f64>>,
    shape: Vec<usize>,
    strides: Vec<usize>,
    data: Vec<f64>,
    fill_value: f64,
}

impl RegularGridInterpolator {
    /// `values` must have one dimension per axis, with matching lengths.
    pub fn new(axes: Vec<Array1<f64>>, values: ArrayD<f64>, fill_value: f64) -> FieldResult<Self> {
        if axes.is_empty() || axes.len() > MAX_DIMS {
            return Err(FieldError::ShapeMismatch(format!(
                "regular grid supports 1 to {MAX_DIMS} axes, got {}",
                axes.len()
            )));
        }
        if values.ndim() != axes.len() {
            return Err(FieldError::ShapeMismatch(format!(
                "regular grid has {} axes but values have {} dimensions",
                axes.len(),
                values.ndim()
            )));
        }
        for (k, axis) in axes.iter().enumerate() {
            if axis.len() < 2 {
                return Err(FieldError::ShapeMismatch(format!(
                    "regular grid axis {k} needs at least 2 points, got {}",
                    axis.len()
                )));
            }
            if axis.len() != values.shape()[k] {
                return Err(FieldError::ShapeMismatch(format!(
                    "regular grid axis {k} has {} points but values have {} along it",
                    axis.len(),
                    values.shape()[k]
                )));
            }
            if axis.iter().any(|v| !v.is_finite())
                || axis.iter().zip(axis.iter().skip(1)).any(|(a, b)| b <= a)
            {
                return Err(FieldError::PhysicsViolation(format!(
                    "regular grid axis {k} must be finite and strictly increasing"
                )));
            }
        }

        let shape = values.shape().to_vec();
        let mut strides = vec![1usize; shape.len()];
        for k in (0..shape.len() - 1).rev() {
            strides[k] = strides[k + 1] * shape[k + 1];
        }
        let data = values.iter().copied().collect();

        Ok(RegularGridInterpolator {
            axes,
            shape,
            strides,
            data,
            fill_value,
        })
    }

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    pub fn axis(&self, k: usize) -> &Array1<f64> {
        &self.axes[k]
    }

    pub fn fill_value(&self) -> f64 {
        self.fill_value
    }

    /// Interpolated value at a single point with `ndim()` coordinates.
    pub fn eval(&self, point: &[f64]) -> f64 {
        debug_assert_eq!(point.len(), self.ndim());
        let nd = self.ndim();
        let mut base = 0usize;
        let mut t = [0.0f64; MAX_DIMS];
        for k in 0..nd {
            let axis = &self.axes[k];
            let n = axis.len();
            let v = point[k];
            if !(axis[0]..=axis[n - 1]).contains(&v) {
                return self.fill_value;
            }
            let idx = axis
                .as_slice()
                .map(|s| s.partition_point(|&a| a <= v))
                .unwrap_or_else(|| axis.iter().take_while(|&&a| a <= v).count());
            let i = idx.saturating_sub(1).min(n - 2);
            t[k] = (v - axis[i]) / (axis[i + 1] - axis[i]);
            base += i * self.strides[k];
        }

        let mut acc = 0.0;
        for corner in 0..(1usize << nd) {
            let mut weight = 1.0;
            let mut offset = base;
            for k in 0..nd {
                if corner & (1 << k) != 0 {
                    weight *= t[k];
                    offset += self.strides[k];
                } else {
                    weight *= 1.0 - t[k];
                }
            }
            if weight != 0.0 {
                acc += weight * self.data[offset];
            }
        }
        acc
    }

    /// Evaluate at a batch of points given as one coordinate array per axis.
    /// All coordinate arrays must share a shape; the result has that shape.
    pub fn eval_batch(&self, coords: &[ArrayViewD<f64>]) -> FieldResult<ArrayD<f64>> {
        if coords.len() != self.ndim() {
            return Err(FieldError::ShapeMismatch(format!(
                "expected {} coordinate arrays, got {}",
                self.ndim(),
                coords.len()
            )));
        }
        let shape = coords[0].shape().to_vec();
        if coords.iter().any(|c| c.shape() != shape.as_slice()) {
            return Err(FieldError::ShapeMismatch(
                "coordinate arrays must share a shape".to_string(),
            ));
        }

        let len: usize = shape.iter().product();
        let mut iters: Vec<_> = coords.iter().map(|c| c.iter()).collect();
        let mut point = vec![0.0; self.ndim()];
        let out: Vec<f64> = (0..len)
            .map(|_| {
                for (p, it) in point.iter_mut().zip(iters.iter_mut()) {
                    *p = it.next().copied().unwrap_or(f64::NAN);
                }
                self.eval(&point)
            })
            .collect();
        ArrayD::from_shape_vec(IxDyn(&shape), out)
            .map_err(|e| FieldError::ShapeMismatch(format!("batch result: {e}")))
    }

    /// Samples the interpolator was built from, in row-major order.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }
}
