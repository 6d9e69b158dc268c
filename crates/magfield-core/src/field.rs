// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Field Interface
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Uniform evaluation contract shared by every field representation.
//!
//! Coordinates are `(x, z, φ)`: `x` is the radial (or Cartesian x) position,
//! `z` the height and `φ` the toroidal angle in radians (or the axial
//! coordinate `y` in metres for Cartesian fields). All evaluators are
//! element-wise and return arrays shaped like their input.

use crate::boundary::{Boundary, NoBoundary};
use magfield_types::constants::BY_DEGENERACY_THRESHOLD;
use magfield_types::error::{FieldError, FieldResult};
use ndarray::{s, Array1, ArrayD, ArrayView1, ArrayViewD, Axis, Zip};

/// Batch of evaluation points with identically shaped coordinate arrays.
#[derive(Debug, Clone)]
pub struct Coords<'a> {
    x: ArrayViewD<'a, f64>,
    z: ArrayViewD<'a, f64>,
    phi: ArrayViewD<'a, f64>,
}

impl<'a> Coords<'a> {
    pub fn new(
        x: ArrayViewD<'a, f64>,
        z: ArrayViewD<'a, f64>,
        phi: ArrayViewD<'a, f64>,
    ) -> FieldResult<Self> {
        if x.shape() != z.shape() || x.shape() != phi.shape() {
            return Err(FieldError::ShapeMismatch(format!(
                "coordinate shapes differ: x={:?}, z={:?}, phi={:?}",
                x.shape(),
                z.shape(),
                phi.shape()
            )));
        }
        Ok(Coords { x, z, phi })
    }

    pub fn x(&self) -> &ArrayViewD<'a, f64> {
        &self.x
    }

    pub fn z(&self) -> &ArrayViewD<'a, f64> {
        &self.z
    }

    pub fn phi(&self) -> &ArrayViewD<'a, f64> {
        &self.phi
    }

    pub fn shape(&self) -> &[usize] {
        self.x.shape()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Array of the batch shape filled with `value`.
    pub fn constant(&self, value: f64) -> ArrayD<f64> {
        ArrayD::from_elem(self.x.raw_dim(), value)
    }

    /// Element-wise evaluation of `f(x, z, φ)`.
    pub fn map<F>(&self, f: F) -> ArrayD<f64>
    where
        F: Fn(f64, f64, f64) -> f64,
    {
        Zip::from(&self.x)
            .and(&self.z)
            .and(&self.phi)
            .map_collect(|&x, &z, &phi| f(x, z, phi))
    }
}

/// A magnetic field in Cartesian or cylindrical geometry.
///
/// Only the components a representation actually defines need overriding;
/// the rest fall back to a uniform unit field along `y`.
pub trait MagneticField: Send + Sync {
    fn bx(&self, c: &Coords) -> ArrayD<f64> {
        c.constant(0.0)
    }

    fn by(&self, c: &Coords) -> ArrayD<f64> {
        c.constant(1.0)
    }

    fn bz(&self, c: &Coords) -> ArrayD<f64> {
        c.constant(0.0)
    }

    /// Major radius [m], or `None` when `y` is a Cartesian coordinate.
    fn major_radius(&self, _c: &Coords) -> Option<ArrayD<f64>> {
        None
    }

    /// Plasma pressure [Pa].
    fn pressure(&self, c: &Coords) -> ArrayD<f64> {
        c.constant(0.0)
    }

    fn b_mag(&self, c: &Coords) -> ArrayD<f64> {
        let bx = self.bx(c);
        let by = self.by(c);
        let bz = self.bz(c);
        Zip::from(&bx)
            .and(&by)
            .and(&bz)
            .map_collect(|&x, &y, &z| (x * x + y * y + z * z).sqrt())
    }

    fn boundary(&self) -> &dyn Boundary {
        &NoBoundary
    }

    /// Names of auxiliary quantities available through [`Self::attribute`].
    fn attributes(&self) -> &[&'static str] {
        &[]
    }

    fn attribute(&self, _name: &str, _c: &Coords) -> Option<ArrayD<f64>> {
        None
    }

    /// Field-line tangent `(dx/dy, dz/dy)`, failing on a degenerate `By`.
    fn field_direction(&self, pos: PositionBatch, ycoord: f64) -> FieldResult<FieldDirection> {
        field_direction_with(self, pos, ycoord, DegeneracyPolicy::Error)
    }
}

/// The base field: Bx = 0, By = 1, Bz = 0 in Cartesian geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformField;

impl MagneticField for UniformField {}

impl<F: MagneticField + ?Sized> MagneticField for Box<F> {
    fn bx(&self, c: &Coords) -> ArrayD<f64> {
        (**self).bx(c)
    }

    fn by(&self, c: &Coords) -> ArrayD<f64> {
        (**self).by(c)
    }

    fn bz(&self, c: &Coords) -> ArrayD<f64> {
        (**self).bz(c)
    }

    fn major_radius(&self, c: &Coords) -> Option<ArrayD<f64>> {
        (**self).major_radius(c)
    }

    fn pressure(&self, c: &Coords) -> ArrayD<f64> {
        (**self).pressure(c)
    }

    fn b_mag(&self, c: &Coords) -> ArrayD<f64> {
        (**self).b_mag(c)
    }

    fn boundary(&self) -> &dyn Boundary {
        (**self).boundary()
    }

    fn attributes(&self) -> &[&'static str] {
        (**self).attributes()
    }

    fn attribute(&self, name: &str, c: &Coords) -> Option<ArrayD<f64>> {
        (**self).attribute(name, c)
    }
}

/// Positions handed to [`field_direction_with`].
#[derive(Debug, Clone)]
pub enum PositionBatch<'a> {
    /// Interleaved pairs `[x0, z0, x1, z1, ...]`.
    Flat(ArrayView1<'a, f64>),
    /// Leading axis of length 2 holding `x` then `z`; any trailing shape.
    Stacked(ArrayViewD<'a, f64>),
}

/// Tangent vectors, in the same layout as the positions they came from.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDirection {
    Flat(Array1<f64>),
    Split { dx: ArrayD<f64>, dz: ArrayD<f64> },
}

impl FieldDirection {
    pub fn into_flat(self) -> Option<Array1<f64>> {
        match self {
            FieldDirection::Flat(v) => Some(v),
            FieldDirection::Split { .. } => None,
        }
    }

    pub fn into_split(self) -> Option<(ArrayD<f64>, ArrayD<f64>)> {
        match self {
            FieldDirection::Split { dx, dz } => Some((dx, dz)),
            FieldDirection::Flat(_) => None,
        }
    }
}

/// What to do when |By| falls below [`BY_DEGENERACY_THRESHOLD`] in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneracyPolicy {
    /// Return [`FieldError::DegenerateField`].
    #[default]
    Error,
    /// Log one warning for the batch and return the (large) tangents.
    Warn,
}

/// Count of points whose |By| is below the threshold (NaN counts), and the smallest |By|.
fn degenerate_by(by: &ArrayD<f64>) -> (usize, f64) {
    by.iter().fold((0, f64::INFINITY), |(count, min_abs), &b| {
        let a = b.abs();
        let bad = !(a >= BY_DEGENERACY_THRESHOLD);
        (count + usize::from(bad), if a < min_abs { a } else { min_abs })
    })
}

pub fn field_direction_with<F: MagneticField + ?Sized>(
    field: &F,
    pos: PositionBatch,
    ycoord: f64,
    policy: DegeneracyPolicy,
) -> FieldResult<FieldDirection> {
    let flat = matches!(pos, PositionBatch::Flat(_));
    let (x, z) = match pos {
        PositionBatch::Flat(p) => {
            if p.len() % 2 != 0 {
                return Err(FieldError::ShapeMismatch(format!(
                    "flattened positions need an even length, got {}",
                    p.len()
                )));
            }
            (
                p.slice(s![..;2]).into_dyn().to_owned(),
                p.slice(s![1..;2]).into_dyn().to_owned(),
            )
        }
        PositionBatch::Stacked(p) => {
            if p.ndim() == 0 || p.shape()[0] != 2 {
                return Err(FieldError::ShapeMismatch(format!(
                    "stacked positions need a leading axis of length 2, got shape {:?}",
                    p.shape()
                )));
            }
            (
                p.index_axis(Axis(0), 0).to_owned(),
                p.index_axis(Axis(0), 1).to_owned(),
            )
        }
    };

    let phi = ArrayD::from_elem(x.raw_dim(), ycoord);
    let coords = Coords::new(x.view(), z.view(), phi.view())?;

    let by = field.by(&coords);
    let (count, min_abs) = degenerate_by(&by);
    if count > 0 {
        match policy {
            DegeneracyPolicy::Error => {
                return Err(FieldError::DegenerateField {
                    count,
                    min_abs,
                    threshold: BY_DEGENERACY_THRESHOLD,
                })
            }
            DegeneracyPolicy::Warn => log::warn!(
                "field_direction at y={ycoord}: {count} of {} point(s) have |By| < {BY_DEGENERACY_THRESHOLD:e} (min {min_abs:e})",
                by.len()
            ),
        }
    }

    // dx/dy = R·Bx/By (cylindrical) or Bx/By (Cartesian)
    let scale = match field.major_radius(&coords) {
        Some(r) => r / &by,
        None => by.mapv(|b| 1.0 / b),
    };
    let dx = field.bx(&coords) * &scale;
    let dz = field.bz(&coords) * &scale;

    if flat {
        let mut out = Array1::zeros(2 * dx.len());
        for (k, (&a, &b)) in dx.iter().zip(dz.iter()).enumerate() {
            out[2 * k] = a;
            out[2 * k + 1] = b;
        }
        Ok(FieldDirection::Flat(out))
    } else {
        Ok(FieldDirection::Split { dx, dz })
    }
}

/// Interleaved-slice form used by field-line integrators.
pub fn field_direction_flat<F: MagneticField + ?Sized>(
    field: &F,
    pos: &[f64],
    ycoord: f64,
    policy: DegeneracyPolicy,
) -> FieldResult<Vec<f64>> {
    let view = ArrayView1::from(pos);
    match field_direction_with(field, PositionBatch::Flat(view), ycoord, policy)? {
        FieldDirection::Flat(v) => Ok(v.to_vec()),
        FieldDirection::Split { .. } => Err(FieldError::ShapeMismatch(
            "flat positions produced split output".to_string(),
        )),
    }
}
