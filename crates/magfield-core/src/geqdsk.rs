// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — GEQDSK Flux-Function Field
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Axisymmetric field from a G-EQDSK equilibrium.
//!
//! In cylindrical (R, φ, Z) coordinates with poloidal flux ψ(R, Z):
//!   B_R = −(1/R) ∂ψ/∂Z
//!   B_Z =  (1/R) ∂ψ/∂R
//!   B_φ = f(ψ_N) / R
//! where f = R·B_φ and ψ_N = (ψ − ψ_axis)/(ψ_bndry − ψ_axis).

use crate::boundary::{Boundary, NoBoundary, PolygonBoundary};
use crate::field::{Coords, MagneticField};
use magfield_math::spline::{BicubicSpline, CubicSpline};
use magfield_types::constants::PSI_NORM_EDGE;
use magfield_types::error::{FieldError, FieldResult};
use magfield_types::state::{Grid2D, NamedArrays};
use ndarray::{Array1, Array2, ArrayD};

/// Raw G-EQDSK quantities. `psirz` is `[nz, nr]`, as written in the file.
#[derive(Debug, Clone)]
pub struct GeqdskInput {
    pub rleft: f64,
    pub rdim: f64,
    pub zmid: f64,
    pub zdim: f64,
    pub psirz: Array2<f64>,
    pub simag: f64,
    pub sibry: f64,
    pub fpol: Array1<f64>,
    pub pres: Array1<f64>,
    pub rbbbs: Array1<f64>,
    pub zbbbs: Array1<f64>,
    pub rlim: Option<Array1<f64>>,
    pub zlim: Option<Array1<f64>>,
}

impl GeqdskInput {
    pub fn from_named(arrays: &NamedArrays) -> FieldResult<Self> {
        Ok(GeqdskInput {
            rleft: arrays.scalar("rleft")?,
            rdim: arrays.scalar("rdim")?,
            zmid: arrays.scalar("zmid")?,
            zdim: arrays.scalar("zdim")?,
            psirz: arrays.array2("psirz")?,
            simag: arrays.scalar("simag")?,
            sibry: arrays.scalar("sibry")?,
            fpol: arrays.array1("fpol")?,
            pres: arrays.array1("pres")?,
            rbbbs: arrays.array1("rbbbs")?,
            zbbbs: arrays.array1("zbbbs")?,
            rlim: arrays.optional_array1("rlim")?,
            zlim: arrays.optional_array1("zlim")?,
        })
    }
}

/// Field from poloidal-flux and f(ψ_N), p(ψ_N) profiles.
#[derive(Debug, Clone)]
pub struct GeqdskField {
    grid: Grid2D,
    psi: BicubicSpline,
    psinorm: BicubicSpline,
    fpol: CubicSpline,
    pressure: CubicSpline,
    /// Limiter polygon; the domain is unbounded without one.
    limiter: Option<PolygonBoundary>,
}

const GEQDSK_ATTRIBUTES: [&str; 2] = ["psi", "psinorm"];

impl GeqdskField {
    pub fn from_named(arrays: &NamedArrays) -> FieldResult<Self> {
        Self::new(&GeqdskInput::from_named(arrays)?)
    }

    pub fn new(input: &GeqdskInput) -> FieldResult<Self> {
        let (nz, nr) = input.psirz.dim();
        let grid = Grid2D::from_extents(nr, nz, input.rleft, input.rdim, input.zmid, input.zdim)?;
        log::info!("Major radius: {} -> {} m", grid.r_min(), grid.r_max());
        log::info!("Height: {} -> {} m", grid.z_min(), grid.z_max());

        let span = input.sibry - input.simag;
        if !span.is_finite() || span == 0.0 {
            return Err(FieldError::PhysicsViolation(format!(
                "axis and boundary flux must differ, got simag={}, sibry={}",
                input.simag, input.sibry
            )));
        }
        for (name, profile) in [("fpol", &input.fpol), ("pres", &input.pres)] {
            if profile.len() != nr {
                return Err(FieldError::ShapeMismatch(format!(
                    "'{name}' has {} samples, expected one per radial point ({nr})",
                    profile.len()
                )));
            }
        }

        let psi = BicubicSpline::new(grid.r.view(), grid.z.view(), input.psirz.view())?;

        let core = PolygonBoundary::new(input.rbbbs.view(), input.zbbbs.view())?;
        let mut psinorm = input.psirz.mapv(|p| (p - input.simag) / span);
        let mut n_outside = 0usize;
        for ((iz, ir), value) in psinorm.indexed_iter_mut() {
            if !core.contains(grid.r[ir], grid.z[iz]) {
                *value = PSI_NORM_EDGE;
                n_outside += 1;
            }
        }
        log::debug!(
            "GEQDSK psinorm: {n_outside} of {} grid points outside the core boundary",
            nr * nz
        );
        let psinorm = BicubicSpline::new(grid.r.view(), grid.z.view(), psinorm.view())?;

        let psin_1d = Array1::<f64>::linspace(0.0, 1.0, nr);
        let fpol = CubicSpline::new(psin_1d.view(), input.fpol.view())?;
        let pressure = CubicSpline::new(psin_1d.view(), input.pres.view())?;

        let limiter = match (&input.rlim, &input.zlim) {
            (Some(r), Some(z)) if !r.is_empty() => Some(PolygonBoundary::new(r.view(), z.view())?),
            (Some(_), Some(_)) | (None, None) => None,
            (Some(_), None) | (None, Some(_)) => {
                return Err(FieldError::ShapeMismatch(
                    "limiter needs both 'rlim' and 'zlim'".to_string(),
                ))
            }
        };

        Ok(GeqdskField {
            grid,
            psi,
            psinorm,
            fpol,
            pressure,
            limiter,
        })
    }

    pub fn grid(&self) -> &Grid2D {
        &self.grid
    }

    pub fn psi(&self, c: &Coords) -> ArrayD<f64> {
        c.map(|x, z, _| self.psi.value(x, z))
    }

    pub fn psinorm(&self, c: &Coords) -> ArrayD<f64> {
        c.map(|x, z, _| self.psinorm.value(x, z))
    }

    /// f = R·B_φ at a normalized flux.
    pub fn fpol_at(&self, psin: f64) -> f64 {
        self.fpol.eval(psin)
    }

    pub fn pressure_at(&self, psin: f64) -> f64 {
        self.pressure.eval(psin)
    }
}

impl MagneticField for GeqdskField {
    fn bx(&self, c: &Coords) -> ArrayD<f64> {
        c.map(|x, z, _| -self.psi.deriv_y(x, z) / x)
    }

    fn by(&self, c: &Coords) -> ArrayD<f64> {
        c.map(|x, z, _| self.fpol.eval(self.psinorm.value(x, z)) / x)
    }

    fn bz(&self, c: &Coords) -> ArrayD<f64> {
        c.map(|x, z, _| self.psi.deriv_x(x, z) / x)
    }

    fn major_radius(&self, c: &Coords) -> Option<ArrayD<f64>> {
        Some(c.x().to_owned())
    }

    fn pressure(&self, c: &Coords) -> ArrayD<f64> {
        c.map(|x, z, _| self.pressure.eval(self.psinorm.value(x, z)))
    }

    fn boundary(&self) -> &dyn Boundary {
        if let Some(polygon) = &self.limiter {
            return polygon;
        }
        &NoBoundary
    }

    fn attributes(&self) -> &[&'static str] {
        &GEQDSK_ATTRIBUTES
    }

    fn attribute(&self, name: &str, c: &Coords) -> Option<ArrayD<f64>> {
        match name {
            "psi" => Some(self.psi(c)),
            "psinorm" => Some(self.psinorm(c)),
            _ => None,
        }
    }
}
