// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Spectral Synthesis
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Inverse Fourier synthesis on (θ, ζ) grids for equilibrium mode spectra.
//!
//! A quantity is given as coefficients `a[s, k]` for modes `(m_k, n_k)` on
//! `ns` radial surfaces. Synthesis evaluates
//! `Σ_k a[s, k] · cos(m_k θ + n_k ζ)` (or `sin`) on every grid point and
//! returns an array shaped `[ns, nθ, nζ]`.

use magfield_types::error::{FieldError, FieldResult};
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, Axis};

/// Mode numbers and angular grid with precomputed trigonometric tables.
#[derive(Debug, Clone)]
pub struct SpectralBasis {
    xm: Array1<f64>,
    xn: Array1<f64>,
    theta: Array1<f64>,
    zeta: Array1<f64>,
    /// `[nθ, mn]` tables of cos(mθ), sin(mθ).
    cos_mt: Array2<f64>,
    sin_mt: Array2<f64>,
    /// `[mn, nζ]` tables of cos(nζ), sin(nζ).
    cos_nz: Array2<f64>,
    sin_nz: Array2<f64>,
}

impl SpectralBasis {
    pub fn new(
        xm: ArrayView1<f64>,
        xn: ArrayView1<f64>,
        theta: ArrayView1<f64>,
        zeta: ArrayView1<f64>,
    ) -> FieldResult<Self> {
        if xm.len() != xn.len() {
            return Err(FieldError::ShapeMismatch(format!(
                "mode arrays differ in length: xm={}, xn={}",
                xm.len(),
                xn.len()
            )));
        }
        if xm.is_empty() || theta.is_empty() || zeta.is_empty() {
            return Err(FieldError::ShapeMismatch(
                "spectral basis needs at least one mode and one grid point per angle".to_string(),
            ));
        }

        let mn = xm.len();
        let cos_mt = Array2::from_shape_fn((theta.len(), mn), |(i, k)| (xm[k] * theta[i]).cos());
        let sin_mt = Array2::from_shape_fn((theta.len(), mn), |(i, k)| (xm[k] * theta[i]).sin());
        let cos_nz = Array2::from_shape_fn((mn, zeta.len()), |(k, j)| (xn[k] * zeta[j]).cos());
        let sin_nz = Array2::from_shape_fn((mn, zeta.len()), |(k, j)| (xn[k] * zeta[j]).sin());

        Ok(SpectralBasis {
            xm: xm.to_owned(),
            xn: xn.to_owned(),
            theta: theta.to_owned(),
            zeta: zeta.to_owned(),
            cos_mt,
            sin_mt,
            cos_nz,
            sin_nz,
        })
    }

    /// Basis on `ntheta × nzeta` points spanning [0, 2π] inclusive in both angles.
    pub fn on_uniform_grid(
        xm: ArrayView1<f64>,
        xn: ArrayView1<f64>,
        ntheta: usize,
        nzeta: usize,
    ) -> FieldResult<Self> {
        let theta = closed_angle_grid(ntheta);
        let zeta = closed_angle_grid(nzeta);
        Self::new(xm, xn, theta.view(), zeta.view())
    }

    pub fn n_modes(&self) -> usize {
        self.xm.len()
    }

    pub fn xm(&self) -> ArrayView1<'_, f64> {
        self.xm.view()
    }

    pub fn xn(&self) -> ArrayView1<'_, f64> {
        self.xn.view()
    }

    pub fn theta(&self) -> ArrayView1<'_, f64> {
        self.theta.view()
    }

    pub fn zeta(&self) -> ArrayView1<'_, f64> {
        self.zeta.view()
    }

    /// Cosine synthesis: Σ a·cos(mθ + nζ).
    pub fn cfunct(&self, coeffs: ArrayView2<f64>) -> FieldResult<Array3<f64>> {
        // cos(mθ + nζ) = cos(mθ)cos(nζ) − sin(mθ)sin(nζ)
        self.synthesize(coeffs, |cm, sm| cm.dot(&self.cos_nz) - sm.dot(&self.sin_nz))
    }

    /// Sine synthesis: Σ a·sin(mθ + nζ).
    pub fn sfunct(&self, coeffs: ArrayView2<f64>) -> FieldResult<Array3<f64>> {
        // sin(mθ + nζ) = sin(mθ)cos(nζ) + cos(mθ)sin(nζ)
        self.synthesize(coeffs, |cm, sm| sm.dot(&self.cos_nz) + cm.dot(&self.sin_nz))
    }

    /// Multiply every surface's coefficients by a per-mode factor (e.g. `-xm`).
    pub fn scale_modes(coeffs: ArrayView2<f64>, factor: ArrayView1<f64>) -> Array2<f64> {
        let mut out = coeffs.to_owned();
        for mut row in out.axis_iter_mut(Axis(0)) {
            row *= &factor;
        }
        out
    }

    fn synthesize<F>(&self, coeffs: ArrayView2<f64>, combine: F) -> FieldResult<Array3<f64>>
    where
        F: Fn(Array2<f64>, Array2<f64>) -> Array2<f64>,
    {
        let (ns, mn) = coeffs.dim();
        if mn != self.n_modes() {
            return Err(FieldError::ShapeMismatch(format!(
                "coefficient array has {mn} modes, basis has {}",
                self.n_modes()
            )));
        }

        let mut out = Array3::zeros((ns, self.theta.len(), self.zeta.len()));
        for (s, row) in coeffs.axis_iter(Axis(0)).enumerate() {
            // [nθ, mn] tables weighted by this surface's coefficients.
            let cm = &self.cos_mt * &row;
            let sm = &self.sin_mt * &row;
            out.index_axis_mut(Axis(0), s).assign(&combine(cm, sm));
        }
        Ok(out)
    }
}

/// `n` points spanning [0, 2π] with both endpoints included.
pub fn closed_angle_grid(n: usize) -> Array1<f64> {
    if n == 1 {
        return Array1::zeros(1);
    }
    Array1::<f64>::linspace(0.0, 2.0 * std::f64::consts::PI, n)
}
