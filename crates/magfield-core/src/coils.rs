// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Analytic Coil Fields
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fields of infinitely long line currents whose positions rotate with φ.
//!
//! Each coil contributes the 2D potential `A = −0.1·I·ln(r²)`; the in-plane
//! field is derived from the summed potential by forward-mode
//! differentiation: `Bx = −∂A/∂z`, `Bz = ∂A/∂x`, which gives the familiar
//! `|B| = 0.2·I/r` circling each coil. Derivation needs the `autodiff`
//! feature; without it every constructor here returns
//! [`FieldError::FeatureUnavailable`].

use crate::field::{Coords, MagneticField};
use magfield_types::config::StellaratorConfig;
use magfield_types::error::{FieldError, FieldResult};
use ndarray::ArrayD;
use std::f64::consts::PI;

#[cfg(feature = "autodiff")]
use magfield_math::autodiff::Dual2;
#[cfg(feature = "autodiff")]
use magfield_types::constants::LINE_CURRENT_POTENTIAL;

/// Straight line current at `centre + radius·(cos, sin)(angle + iota·φ)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatingLineCurrent {
    pub xcentre: f64,
    pub zcentre: f64,
    pub radius: f64,
    pub angle: f64,
    pub iota: f64,
    pub current: f64,
}

impl RotatingLineCurrent {
    pub fn position(&self, phi: f64) -> (f64, f64) {
        let a = self.angle + self.iota * phi;
        (
            self.xcentre + self.radius * a.cos(),
            self.zcentre + self.radius * a.sin(),
        )
    }
}

/// Four coils spaced by 90° with alternating current sign.
pub fn four_coil_set(cfg: &StellaratorConfig) -> Vec<RotatingLineCurrent> {
    let iota = cfg.iota();
    (0..4)
        .map(|i| RotatingLineCurrent {
            xcentre: cfg.xcentre,
            zcentre: cfg.zcentre,
            radius: cfg.radius,
            angle: 0.5 * PI * i as f64,
            iota,
            current: if i % 2 == 0 { cfg.i_coil } else { -cfg.i_coil },
        })
        .collect()
}

const POTENTIAL_ATTRIBUTES: [&str; 1] = ["A"];

/// Summed field of a set of rotating line currents, Cartesian geometry.
#[derive(Debug, Clone)]
pub struct LineCurrentField {
    coils: Vec<RotatingLineCurrent>,
    #[cfg(not(feature = "autodiff"))]
    unavailable: std::convert::Infallible,
}

impl LineCurrentField {
    #[cfg(feature = "autodiff")]
    pub fn new(coils: Vec<RotatingLineCurrent>) -> FieldResult<Self> {
        let finite = coils.iter().all(|c| {
            [c.xcentre, c.zcentre, c.radius, c.angle, c.iota, c.current]
                .iter()
                .all(|v| v.is_finite())
        });
        if !finite {
            return Err(FieldError::ConfigError(
                "line current parameters must be finite".to_string(),
            ));
        }
        log::debug!("line current field with {} coil(s)", coils.len());
        Ok(LineCurrentField { coils })
    }

    #[cfg(not(feature = "autodiff"))]
    pub fn new(_coils: Vec<RotatingLineCurrent>) -> FieldResult<Self> {
        Err(FieldError::FeatureUnavailable(
            "line current fields require the `autodiff` feature".to_string(),
        ))
    }

    pub fn coils(&self) -> &[RotatingLineCurrent] {
        &self.coils
    }

    /// Potential with its (x, z) gradient at one point.
    #[cfg(feature = "autodiff")]
    fn potential(&self, x: f64, z: f64, phi: f64) -> Dual2 {
        let xd = Dual2::var_x(x);
        let zd = Dual2::var_z(z);
        let mut a = Dual2::constant(0.0);
        for coil in &self.coils {
            let (xc, zc) = coil.position(phi);
            let r2 = (xd - xc).powi(2) + (zd - zc).powi(2);
            a -= r2.ln() * (coil.current * LINE_CURRENT_POTENTIAL);
        }
        a
    }

    #[cfg(feature = "autodiff")]
    fn potential_parts(&self, x: f64, z: f64, phi: f64) -> (f64, f64, f64) {
        let a = self.potential(x, z, phi);
        (a.value, -a.dz(), a.dx())
    }

    #[cfg(not(feature = "autodiff"))]
    fn potential_parts(&self, _x: f64, _z: f64, _phi: f64) -> (f64, f64, f64) {
        match self.unavailable {}
    }

    pub fn potential_a(&self, c: &Coords) -> ArrayD<f64> {
        c.map(|x, z, phi| self.potential_parts(x, z, phi).0)
    }
}

impl MagneticField for LineCurrentField {
    fn bx(&self, c: &Coords) -> ArrayD<f64> {
        c.map(|x, z, phi| self.potential_parts(x, z, phi).1)
    }

    fn bz(&self, c: &Coords) -> ArrayD<f64> {
        c.map(|x, z, phi| self.potential_parts(x, z, phi).2)
    }

    fn attributes(&self) -> &[&'static str] {
        &POTENTIAL_ATTRIBUTES
    }

    fn attribute(&self, name: &str, c: &Coords) -> Option<ArrayD<f64>> {
        (name == "A").then(|| self.potential_a(c))
    }
}

/// Rotating-ellipse stellarator without curvature (Cartesian, By = 1).
#[derive(Debug, Clone)]
pub struct StraightStellarator {
    coils: LineCurrentField,
}

impl StraightStellarator {
    pub fn new(cfg: &StellaratorConfig) -> FieldResult<Self> {
        cfg.validate()?;
        Ok(StraightStellarator {
            coils: LineCurrentField::new(four_coil_set(cfg))?,
        })
    }

    pub fn coils(&self) -> &[RotatingLineCurrent] {
        self.coils.coils()
    }
}

impl MagneticField for StraightStellarator {
    fn bx(&self, c: &Coords) -> ArrayD<f64> {
        self.coils.bx(c)
    }

    fn bz(&self, c: &Coords) -> ArrayD<f64> {
        self.coils.bz(c)
    }

    fn attributes(&self) -> &[&'static str] {
        self.coils.attributes()
    }

    fn attribute(&self, name: &str, c: &Coords) -> Option<ArrayD<f64>> {
        self.coils.attribute(name, c)
    }
}

/// Rotating-ellipse stellarator with a 1/x toroidal field; cylindrical.
#[derive(Debug, Clone)]
pub struct RotatingEllipse {
    coils: LineCurrentField,
    btor: f64,
}

impl RotatingEllipse {
    pub fn new(cfg: &StellaratorConfig) -> FieldResult<Self> {
        cfg.validate()?;
        Ok(RotatingEllipse {
            coils: LineCurrentField::new(four_coil_set(cfg))?,
            btor: cfg.btor,
        })
    }

    pub fn coils(&self) -> &[RotatingLineCurrent] {
        self.coils.coils()
    }
}

impl MagneticField for RotatingEllipse {
    fn bx(&self, c: &Coords) -> ArrayD<f64> {
        self.coils.bx(c)
    }

    fn by(&self, c: &Coords) -> ArrayD<f64> {
        c.x().mapv(|x| self.btor / x)
    }

    fn bz(&self, c: &Coords) -> ArrayD<f64> {
        self.coils.bz(c)
    }

    fn major_radius(&self, c: &Coords) -> Option<ArrayD<f64>> {
        Some(c.x().to_owned())
    }

    fn attributes(&self) -> &[&'static str] {
        self.coils.attributes()
    }

    fn attribute(&self, name: &str, c: &Coords) -> Option<ArrayD<f64>> {
        self.coils.attribute(name, c)
    }
}
