// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Edge Smoothing
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Wrapper that damps the in-plane field near the edges of a finite box so
//! that traced field lines turn parallel to the walls instead of leaving.
//!
//! The damping factor P is 1 inside the box interior, falls linearly to 0
//! across a buffer of `xboundary` / `zboundary` grid cells on each side, and
//! takes the smaller factor in corners. With [`SmoothingMode::PassThrough`]
//! the in-plane components are returned untouched.

use crate::boundary::Boundary;
use crate::field::{Coords, MagneticField};
use magfield_types::config::{SmoothingConfig, SmoothingMode};
use magfield_types::error::{FieldError, FieldResult};
use magfield_types::state::Grid2D;
use ndarray::{ArrayD, Zip};

#[derive(Debug, Clone, Copy)]
struct Edge {
    inner: f64,
    outer: f64,
}

impl Edge {
    /// 1 at the inner line, 0 at the outer line, linear in between and beyond.
    fn factor(&self, v: f64) -> f64 {
        if self.inner == self.outer {
            return 1.0;
        }
        (v - self.inner) / (self.inner - self.outer) + 1.0
    }
}

#[derive(Debug, Clone)]
pub struct SmoothedField<F> {
    inner: F,
    mode: SmoothingMode,
    left: Edge,
    right: Edge,
    bottom: Edge,
    top: Edge,
}

impl<F: MagneticField> SmoothedField<F> {
    pub fn new(inner: F, grid: &Grid2D, cfg: &SmoothingConfig) -> FieldResult<Self> {
        if 2 * cfg.xboundary >= grid.nr || 2 * cfg.zboundary >= grid.nz {
            return Err(FieldError::ConfigError(format!(
                "smoothing buffers ({} x, {} z cells) overlap on a {}x{} grid",
                cfg.xboundary, cfg.zboundary, grid.nr, grid.nz
            )));
        }
        let bx = cfg.xboundary as f64 * grid.dr;
        let bz = cfg.zboundary as f64 * grid.dz;
        Ok(SmoothedField {
            inner,
            mode: cfg.mode,
            left: Edge {
                inner: grid.r_min() + bx,
                outer: grid.r_min(),
            },
            right: Edge {
                inner: grid.r_max() - bx,
                outer: grid.r_max(),
            },
            bottom: Edge {
                inner: grid.z_min() + bz,
                outer: grid.z_min(),
            },
            top: Edge {
                inner: grid.z_max() - bz,
                outer: grid.z_max(),
            },
        })
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    pub fn mode(&self) -> SmoothingMode {
        self.mode
    }

    /// Damping factor P ∈ [0, 1] at one point.
    pub fn damping(&self, x: f64, z: f64) -> f64 {
        let mut p = 1.0f64;
        if x < self.left.inner {
            p = p.min(self.left.factor(x));
        } else if x >= self.right.inner {
            p = p.min(self.right.factor(x));
        }
        if z < self.bottom.inner {
            p = p.min(self.bottom.factor(z));
        } else if z >= self.top.inner {
            p = p.min(self.top.factor(z));
        }
        p.max(0.0)
    }

    fn damped(&self, component: ArrayD<f64>, c: &Coords) -> ArrayD<f64> {
        match self.mode {
            SmoothingMode::PassThrough => component,
            SmoothingMode::Damped => {
                let mut out = component;
                Zip::from(&mut out)
                    .and(c.x())
                    .and(c.z())
                    .for_each(|b, &x, &z| *b *= self.damping(x, z));
                out
            }
        }
    }
}

impl<F: MagneticField> MagneticField for SmoothedField<F> {
    fn bx(&self, c: &Coords) -> ArrayD<f64> {
        self.damped(self.inner.bx(c), c)
    }

    fn by(&self, c: &Coords) -> ArrayD<f64> {
        self.inner.by(c)
    }

    fn bz(&self, c: &Coords) -> ArrayD<f64> {
        self.damped(self.inner.bz(c), c)
    }

    fn major_radius(&self, c: &Coords) -> Option<ArrayD<f64>> {
        self.inner.major_radius(c)
    }

    fn pressure(&self, c: &Coords) -> ArrayD<f64> {
        self.inner.pressure(c)
    }

    fn boundary(&self) -> &dyn Boundary {
        self.inner.boundary()
    }

    fn attributes(&self) -> &[&'static str] {
        self.inner.attributes()
    }

    fn attribute(&self, name: &str, c: &Coords) -> Option<ArrayD<f64>> {
        self.inner.attribute(name, c)
    }
}
