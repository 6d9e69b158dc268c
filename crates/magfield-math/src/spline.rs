// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Splines
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Interpolating cubic splines.
//!
//! [`CubicSpline`] is a natural cubic spline in one variable with constant
//! extrapolation: queries beyond the knot range return the end value.
//! [`BicubicSpline`] is the tensor product of natural splines on a
//! rectilinear (x, y) grid. Knot derivatives come from 1D spline solves and
//! each cell is evaluated as a bicubic Hermite patch, which reproduces the
//! tensor-product spline exactly. Queries outside the rectangle are clamped
//! to its edge.

use crate::tridiag::thomas_solve;
use magfield_types::error::{FieldError, FieldResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

fn check_knots(name: &str, x: ArrayView1<f64>) -> FieldResult<()> {
    if x.len() < 2 {
        return Err(FieldError::ShapeMismatch(format!(
            "{name} spline requires at least 2 knots, got {}",
            x.len()
        )));
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(FieldError::PhysicsViolation(format!(
            "{name} spline knots must be finite"
        )));
    }
    if x.iter().zip(x.iter().skip(1)).any(|(a, b)| b <= a) {
        return Err(FieldError::PhysicsViolation(format!(
            "{name} spline knots must be strictly increasing"
        )));
    }
    Ok(())
}

/// Second derivatives of the natural cubic spline through (x, y).
fn natural_second_derivatives(x: ArrayView1<f64>, y: ArrayView1<f64>) -> FieldResult<Vec<f64>> {
    let n = x.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return Ok(m);
    }

    let k = n - 2;
    let mut a = vec![0.0; k];
    let mut b = vec![0.0; k];
    let mut c = vec![0.0; k];
    let mut d = vec![0.0; k];
    for row in 0..k {
        let i = row + 1;
        let h0 = x[i] - x[i - 1];
        let h1 = x[i + 1] - x[i];
        a[row] = h0;
        b[row] = 2.0 * (h0 + h1);
        c[row] = h1;
        d[row] = 6.0 * ((y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0);
    }
    let interior = thomas_solve(&a, &b, &c, &d)?;
    m[1..n - 1].copy_from_slice(&interior);
    Ok(m)
}

/// First derivative of the spline at every knot.
fn knot_slopes(x: ArrayView1<f64>, y: ArrayView1<f64>) -> FieldResult<Vec<f64>> {
    let n = x.len();
    let m = natural_second_derivatives(x, y)?;
    let mut slopes = vec![0.0; n];
    for i in 0..n - 1 {
        let h = x[i + 1] - x[i];
        slopes[i] = (y[i + 1] - y[i]) / h - h * (2.0 * m[i] + m[i + 1]) / 6.0;
    }
    let h = x[n - 1] - x[n - 2];
    slopes[n - 1] = (y[n - 1] - y[n - 2]) / h + h * (m[n - 2] + 2.0 * m[n - 1]) / 6.0;
    Ok(slopes)
}

/// Index of the knot interval containing `v`, for `v` already clamped to the knot range.
#[inline]
fn interval(knots: &Array1<f64>, v: f64) -> usize {
    let n = knots.len();
    let idx = knots
        .as_slice()
        .map(|s| s.partition_point(|&k| k <= v))
        .unwrap_or_else(|| knots.iter().take_while(|&&k| k <= v).count());
    idx.saturating_sub(1).min(n - 2)
}

/// Natural cubic spline with constant extrapolation.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Array1<f64>,
    y: Array1<f64>,
    m: Array1<f64>,
}

impl CubicSpline {
    pub fn new(x: ArrayView1<f64>, y: ArrayView1<f64>) -> FieldResult<Self> {
        check_knots("1D", x)?;
        if y.len() != x.len() {
            return Err(FieldError::ShapeMismatch(format!(
                "spline values length {} does not match knots length {}",
                y.len(),
                x.len()
            )));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(FieldError::PhysicsViolation(
                "spline values must be finite".to_string(),
            ));
        }
        let m = natural_second_derivatives(x, y)?;
        Ok(CubicSpline {
            x: x.to_owned(),
            y: y.to_owned(),
            m: Array1::from(m),
        })
    }

    pub fn x_min(&self) -> f64 {
        self.x[0]
    }

    pub fn x_max(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    pub fn eval(&self, v: f64) -> f64 {
        let v = v.clamp(self.x_min(), self.x_max());
        let i = interval(&self.x, v);
        let h = self.x[i + 1] - self.x[i];
        let a = self.x[i + 1] - v;
        let b = v - self.x[i];
        self.m[i] * a.powi(3) / (6.0 * h)
            + self.m[i + 1] * b.powi(3) / (6.0 * h)
            + (self.y[i] / h - self.m[i] * h / 6.0) * a
            + (self.y[i + 1] / h - self.m[i + 1] * h / 6.0) * b
    }

    /// First derivative; zero outside the knot range where the spline is constant.
    pub fn derivative(&self, v: f64) -> f64 {
        if v < self.x_min() || v > self.x_max() {
            return 0.0;
        }
        let i = interval(&self.x, v);
        let h = self.x[i + 1] - self.x[i];
        let a = self.x[i + 1] - v;
        let b = v - self.x[i];
        -self.m[i] * a * a / (2.0 * h) + self.m[i + 1] * b * b / (2.0 * h)
            + (self.y[i + 1] - self.y[i]) / h
            - (self.m[i + 1] - self.m[i]) * h / 6.0
    }

    pub fn eval_many(&self, v: ArrayView1<f64>) -> Array1<f64> {
        v.mapv(|q: f64| self.eval(q))
    }
}

/// Tensor-product natural cubic spline on a rectilinear grid.
///
/// Values are laid out `[ny, nx]` (rows follow `y`), matching
/// [`magfield_types::state::Grid2D`].
#[derive(Debug, Clone)]
pub struct BicubicSpline {
    x: Array1<f64>,
    y: Array1<f64>,
    f: Array2<f64>,
    fx: Array2<f64>,
    fy: Array2<f64>,
    fxy: Array2<f64>,
}

#[derive(Clone, Copy)]
enum Deriv {
    Value,
    X,
    Y,
}

#[inline]
fn hermite(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        2.0 * t3 - 3.0 * t2 + 1.0,
        t3 - 2.0 * t2 + t,
        -2.0 * t3 + 3.0 * t2,
        t3 - t2,
    ]
}

#[inline]
fn hermite_deriv(t: f64) -> [f64; 4] {
    let t2 = t * t;
    [
        6.0 * t2 - 6.0 * t,
        3.0 * t2 - 4.0 * t + 1.0,
        -6.0 * t2 + 6.0 * t,
        3.0 * t2 - 2.0 * t,
    ]
}

impl BicubicSpline {
    pub fn new(x: ArrayView1<f64>, y: ArrayView1<f64>, f: ArrayView2<f64>) -> FieldResult<Self> {
        check_knots("bicubic x", x)?;
        check_knots("bicubic y", y)?;
        let (ny, nx) = f.dim();
        if nx != x.len() || ny != y.len() {
            return Err(FieldError::ShapeMismatch(format!(
                "bicubic values must be [{}, {}], got [{ny}, {nx}]",
                y.len(),
                x.len()
            )));
        }
        if f.iter().any(|v| !v.is_finite()) {
            return Err(FieldError::PhysicsViolation(
                "bicubic values must be finite".to_string(),
            ));
        }

        let mut fx = Array2::zeros((ny, nx));
        for iy in 0..ny {
            let slopes = knot_slopes(x, f.row(iy))?;
            fx.row_mut(iy).assign(&Array1::from(slopes));
        }

        let mut fy = Array2::zeros((ny, nx));
        let mut fxy = Array2::zeros((ny, nx));
        for ix in 0..nx {
            let slopes = knot_slopes(y, f.column(ix))?;
            fy.column_mut(ix).assign(&Array1::from(slopes));
            let mixed = knot_slopes(y, fx.column(ix))?;
            fxy.column_mut(ix).assign(&Array1::from(mixed));
        }

        Ok(BicubicSpline {
            x: x.to_owned(),
            y: y.to_owned(),
            f: f.to_owned(),
            fx,
            fy,
            fxy,
        })
    }

    fn eval(&self, xq: f64, yq: f64, deriv: Deriv) -> f64 {
        let nx = self.x.len();
        let ny = self.y.len();
        let xq = xq.clamp(self.x[0], self.x[nx - 1]);
        let yq = yq.clamp(self.y[0], self.y[ny - 1]);
        let i = interval(&self.x, xq);
        let j = interval(&self.y, yq);
        let hx = self.x[i + 1] - self.x[i];
        let hy = self.y[j + 1] - self.y[j];
        let t = (xq - self.x[i]) / hx;
        let u = (yq - self.y[j]) / hy;

        let (bx, scale_x) = match deriv {
            Deriv::X => (hermite_deriv(t), 1.0 / hx),
            _ => (hermite(t), 1.0),
        };
        let (by, scale_y) = match deriv {
            Deriv::Y => (hermite_deriv(u), 1.0 / hy),
            _ => (hermite(u), 1.0),
        };

        let mut acc = 0.0;
        for (cy, jj) in [(0usize, j), (1usize, j + 1)] {
            let (wy_val, wy_slope) = (by[2 * cy], by[2 * cy + 1] * hy);
            for (cx, ii) in [(0usize, i), (1usize, i + 1)] {
                let (wx_val, wx_slope) = (bx[2 * cx], bx[2 * cx + 1] * hx);
                acc += self.f[[jj, ii]] * wx_val * wy_val
                    + self.fx[[jj, ii]] * wx_slope * wy_val
                    + self.fy[[jj, ii]] * wx_val * wy_slope
                    + self.fxy[[jj, ii]] * wx_slope * wy_slope;
            }
        }
        acc * scale_x * scale_y
    }

    pub fn value(&self, x: f64, y: f64) -> f64 {
        self.eval(x, y, Deriv::Value)
    }

    /// ∂f/∂x
    pub fn deriv_x(&self, x: f64, y: f64) -> f64 {
        self.eval(x, y, Deriv::X)
    }

    /// ∂f/∂y
    pub fn deriv_y(&self, x: f64, y: f64) -> f64 {
        self.eval(x, y, Deriv::Y)
    }
}
