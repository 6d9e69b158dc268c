// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{FieldError, FieldResult};
use ndarray::{Array1, Array2, ArrayD, Ix1, Ix2};
use std::collections::HashMap;

/// Rectangular (R, Z) grid with precomputed coordinates.
///
/// Sample arrays on this grid are laid out `[nz, nr]`: rows are Z, columns are R.
#[derive(Debug, Clone)]
pub struct Grid2D {
    pub nr: usize,
    pub nz: usize,
    pub r: Array1<f64>,  // R coordinates [nr] - linspace(r_min, r_max, nr)
    pub z: Array1<f64>,  // Z coordinates [nz] - linspace(z_min, z_max, nz)
    pub dr: f64,         // R spacing
    pub dz: f64,         // Z spacing
    pub rr: Array2<f64>, // Meshgrid R [nz, nr]
    pub zz: Array2<f64>, // Meshgrid Z [nz, nr]
}

impl Grid2D {
    pub fn new(nr: usize, nz: usize, r_min: f64, r_max: f64, z_min: f64, z_max: f64) -> Self {
        let r = Array1::<f64>::linspace(r_min, r_max, nr);
        let z = Array1::<f64>::linspace(z_min, z_max, nz);
        let dr = if nr > 1 { r[1] - r[0] } else { r_max - r_min };
        let dz = if nz > 1 { z[1] - z[0] } else { z_max - z_min };

        let rr = Array2::from_shape_fn((nz, nr), |(_, ir)| r[ir]);
        let zz = Array2::from_shape_fn((nz, nr), |(iz, _)| z[iz]);

        Grid2D {
            nr,
            nz,
            r,
            z,
            dr,
            dz,
            rr,
            zz,
        }
    }

    /// Grid described the way equilibrium files describe it: left edge and
    /// width in R, midplane and height in Z.
    pub fn from_extents(
        nr: usize,
        nz: usize,
        r_left: f64,
        r_dim: f64,
        z_mid: f64,
        z_dim: f64,
    ) -> FieldResult<Self> {
        if nr < 2 || nz < 2 {
            return Err(FieldError::ShapeMismatch(format!(
                "grid requires nr,nz >= 2, got nr={nr}, nz={nz}"
            )));
        }
        if ![r_left, r_dim, z_mid, z_dim].iter().all(|v| v.is_finite()) {
            return Err(FieldError::ConfigError(
                "grid extents must be finite".to_string(),
            ));
        }
        if r_dim <= 0.0 || z_dim <= 0.0 {
            return Err(FieldError::ConfigError(format!(
                "grid extents must be positive, got rdim={r_dim}, zdim={z_dim}"
            )));
        }
        Ok(Self::new(
            nr,
            nz,
            r_left,
            r_left + r_dim,
            z_mid - 0.5 * z_dim,
            z_mid + 0.5 * z_dim,
        ))
    }

    pub fn r_min(&self) -> f64 {
        self.r[0]
    }

    pub fn r_max(&self) -> f64 {
        self.r[self.nr - 1]
    }

    pub fn z_min(&self) -> f64 {
        self.z[0]
    }

    pub fn z_max(&self) -> f64 {
        self.z[self.nz - 1]
    }
}

/// Named numeric arrays handed over by an external file reader.
///
/// Scalars are stored as 0-d (or single-element) arrays.
#[derive(Debug, Clone, Default)]
pub struct NamedArrays {
    arrays: HashMap<String, ArrayD<f64>>,
}

impl NamedArrays {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, array: ArrayD<f64>) -> &mut Self {
        self.arrays.insert(name.into(), array);
        self
    }

    pub fn insert_scalar(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.insert(name, ArrayD::from_elem(ndarray::IxDyn(&[]), value))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ArrayD<f64>> {
        self.arrays.get(name)
    }

    pub fn require(&self, name: &str) -> FieldResult<&ArrayD<f64>> {
        self.arrays
            .get(name)
            .ok_or_else(|| FieldError::MissingArray(name.to_string()))
    }

    pub fn scalar(&self, name: &str) -> FieldResult<f64> {
        let arr = self.require(name)?;
        if arr.len() != 1 {
            return Err(FieldError::ShapeMismatch(format!(
                "'{name}' must be a scalar, got shape {:?}",
                arr.shape()
            )));
        }
        arr.iter()
            .next()
            .copied()
            .ok_or_else(|| FieldError::MissingArray(name.to_string()))
    }

    /// Absent keys read as `None`; present but malformed keys are still errors.
    pub fn optional_scalar(&self, name: &str) -> FieldResult<Option<f64>> {
        if self.contains(name) {
            self.scalar(name).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn array1(&self, name: &str) -> FieldResult<Array1<f64>> {
        let arr = self.require(name)?;
        arr.clone().into_dimensionality::<Ix1>().map_err(|_| {
            FieldError::ShapeMismatch(format!(
                "'{name}' must be 1-D, got shape {:?}",
                arr.shape()
            ))
        })
    }

    pub fn array2(&self, name: &str) -> FieldResult<Array2<f64>> {
        let arr = self.require(name)?;
        arr.clone().into_dimensionality::<Ix2>().map_err(|_| {
            FieldError::ShapeMismatch(format!(
                "'{name}' must be 2-D, got shape {:?}",
                arr.shape()
            ))
        })
    }

    pub fn optional_array1(&self, name: &str) -> FieldResult<Option<Array1<f64>>> {
        if self.contains(name) {
            self.array1(name).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn optional_array2(&self, name: &str) -> FieldResult<Option<Array2<f64>>> {
        if self.contains(name) {
            self.array2(name).map(Some)
        } else {
            Ok(None)
        }
    }
}
