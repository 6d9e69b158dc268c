// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Slab Fields
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Sheared slab fields: Bx = 0, By = const, Bz = bz + (x − xcentre)·bzprime.

use crate::field::{Coords, MagneticField};
use magfield_types::config::{CurvedSlabConfig, SlabConfig};
use magfield_types::error::FieldResult;
use ndarray::ArrayD;

/// Infinite flat slab in Cartesian coordinates.
#[derive(Debug, Clone)]
pub struct Slab {
    cfg: SlabConfig,
}

impl Slab {
    pub fn new(cfg: SlabConfig) -> FieldResult<Self> {
        cfg.validate()?;
        Ok(Slab { cfg })
    }
}

fn sheared_bz(c: &Coords, bz: f64, xcentre: f64, bzprime: f64) -> ArrayD<f64> {
    c.x().mapv(|x| bz + (x - xcentre) * bzprime)
}

impl MagneticField for Slab {
    fn by(&self, c: &Coords) -> ArrayD<f64> {
        c.constant(self.cfg.by)
    }

    fn bz(&self, c: &Coords) -> ArrayD<f64> {
        sheared_bz(c, self.cfg.bz, self.cfg.xcentre, self.cfg.bzprime)
    }
}

/// Slab bent around a fixed major radius; `y` is the toroidal angle.
#[derive(Debug, Clone)]
pub struct CurvedSlab {
    cfg: CurvedSlabConfig,
}

impl CurvedSlab {
    pub fn new(cfg: CurvedSlabConfig) -> FieldResult<Self> {
        cfg.validate()?;
        Ok(CurvedSlab { cfg })
    }
}

impl MagneticField for CurvedSlab {
    fn by(&self, c: &Coords) -> ArrayD<f64> {
        c.constant(self.cfg.by)
    }

    fn bz(&self, c: &Coords) -> ArrayD<f64> {
        sheared_bz(c, self.cfg.bz, self.cfg.xcentre, self.cfg.bzprime)
    }

    fn major_radius(&self, c: &Coords) -> Option<ArrayD<f64>> {
        Some(c.constant(self.cfg.rmaj))
    }
}
