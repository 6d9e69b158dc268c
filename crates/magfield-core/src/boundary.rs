// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Boundaries
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Poloidal cross-section boundaries.

use geo::{Contains, Coord, LineString, Point, Polygon};
use magfield_types::error::{FieldError, FieldResult};
use ndarray::{ArrayD, ArrayView1, ArrayViewD, Zip};
use std::fmt::Debug;

pub trait Boundary: Send + Sync + Debug {
    fn contains(&self, x: f64, z: f64) -> bool;

    /// `true` wherever `(x, z)` lies outside the boundary.
    fn outside(&self, x: &ArrayViewD<f64>, z: &ArrayViewD<f64>) -> FieldResult<ArrayD<bool>> {
        if x.shape() != z.shape() {
            return Err(FieldError::ShapeMismatch(format!(
                "boundary query shapes differ: x={:?}, z={:?}",
                x.shape(),
                z.shape()
            )));
        }
        Ok(Zip::from(x)
            .and(z)
            .map_collect(|&xv, &zv| !self.contains(xv, zv)))
    }
}

/// Unbounded domain: every point is inside.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBoundary;

impl Boundary for NoBoundary {
    fn contains(&self, _x: f64, _z: f64) -> bool {
        true
    }
}

/// Closed polygon in the (x, z) plane. Points on an edge count as outside.
#[derive(Debug, Clone)]
pub struct PolygonBoundary {
    polygon: Polygon<f64>,
}

impl PolygonBoundary {
    pub fn new(xs: ArrayView1<f64>, zs: ArrayView1<f64>) -> FieldResult<Self> {
        if xs.len() != zs.len() {
            return Err(FieldError::ShapeMismatch(format!(
                "polygon coordinate lengths differ: x={}, z={}",
                xs.len(),
                zs.len()
            )));
        }
        if xs.len() < 3 {
            return Err(FieldError::ShapeMismatch(format!(
                "polygon needs at least 3 vertices, got {}",
                xs.len()
            )));
        }
        if xs.iter().chain(zs.iter()).any(|v| !v.is_finite()) {
            return Err(FieldError::PhysicsViolation(
                "polygon vertices must be finite".to_string(),
            ));
        }

        let ring: Vec<Coord<f64>> = xs
            .iter()
            .zip(zs.iter())
            .map(|(&x, &y)| Coord { x, y })
            .collect();
        Ok(PolygonBoundary {
            polygon: Polygon::new(LineString::from(ring), vec![]),
        })
    }

    /// Number of vertices in the closed ring (the closing vertex included).
    pub fn n_vertices(&self) -> usize {
        self.polygon.exterior().0.len()
    }
}

impl Boundary for PolygonBoundary {
    fn contains(&self, x: f64, z: f64) -> bool {
        self.polygon.contains(&Point::new(x, z))
    }
}
