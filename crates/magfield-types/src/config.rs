// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{FieldError, FieldResult};
use serde::{Deserialize, Serialize};

/// Analytic field selected from a JSON document.
///
/// ```json
/// { "kind": "rotating_ellipse", "radius": 0.8, "i_coil": 0.05, "btor": 1.0 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldConfig {
    Uniform,
    Slab(SlabConfig),
    CurvedSlab(CurvedSlabConfig),
    StraightStellarator(StellaratorConfig),
    RotatingEllipse(StellaratorConfig),
}

impl FieldConfig {
    pub fn from_json(text: &str) -> FieldResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> FieldResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> FieldResult<()> {
        match self {
            FieldConfig::Uniform => Ok(()),
            FieldConfig::Slab(cfg) => cfg.validate(),
            FieldConfig::CurvedSlab(cfg) => cfg.validate(),
            FieldConfig::StraightStellarator(cfg) | FieldConfig::RotatingEllipse(cfg) => {
                cfg.validate()
            }
        }
    }
}

fn require_finite(name: &str, values: &[f64]) -> FieldResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(FieldError::ConfigError(format!(
            "{name} parameters must be finite"
        )))
    }
}

/// Straight field in Cartesian coordinates: Bz = bz + (x - xcentre) * bzprime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlabConfig {
    pub by: f64,
    pub bz: f64,
    pub xcentre: f64,
    pub bzprime: f64,
}

impl Default for SlabConfig {
    fn default() -> Self {
        SlabConfig {
            by: 1.0,
            bz: 0.1,
            xcentre: 0.0,
            bzprime: 1.0,
        }
    }
}

impl SlabConfig {
    pub fn validate(&self) -> FieldResult<()> {
        require_finite("slab", &[self.by, self.bz, self.xcentre, self.bzprime])
    }
}

/// Slab field bent around a constant major radius.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurvedSlabConfig {
    pub by: f64,
    pub bz: f64,
    pub xcentre: f64,
    pub bzprime: f64,
    pub rmaj: f64,
}

impl Default for CurvedSlabConfig {
    fn default() -> Self {
        CurvedSlabConfig {
            by: 1.0,
            bz: 0.1,
            xcentre: 0.0,
            bzprime: 1.0,
            rmaj: 1.0,
        }
    }
}

impl CurvedSlabConfig {
    pub fn validate(&self) -> FieldResult<()> {
        require_finite(
            "curved slab",
            &[self.by, self.bz, self.xcentre, self.bzprime, self.rmaj],
        )?;
        if self.rmaj <= 0.0 {
            return Err(FieldError::ConfigError(format!(
                "curved slab requires rmaj > 0, got {}",
                self.rmaj
            )));
        }
        Ok(())
    }
}

/// Four rotating coils spaced by 90° with alternating current.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StellaratorConfig {
    /// Middle of the domain in x [m]
    pub xcentre: f64,
    /// Middle of the domain in z [m]
    pub zcentre: f64,
    /// Distance of each coil from the centre [m]
    pub radius: f64,
    /// Toroidal period over which the coils return to their start position
    pub yperiod: f64,
    /// Current in each coil
    pub i_coil: f64,
    /// Toroidal field strength, only used by the rotating ellipse
    pub btor: f64,
}

impl Default for StellaratorConfig {
    fn default() -> Self {
        StellaratorConfig {
            xcentre: 0.0,
            zcentre: 0.0,
            radius: 0.8,
            yperiod: std::f64::consts::PI,
            i_coil: 0.05,
            btor: 1.0,
        }
    }
}

impl StellaratorConfig {
    pub fn validate(&self) -> FieldResult<()> {
        require_finite(
            "stellarator",
            &[
                self.xcentre,
                self.zcentre,
                self.radius,
                self.yperiod,
                self.i_coil,
                self.btor,
            ],
        )?;
        if self.radius <= 0.0 {
            return Err(FieldError::ConfigError(format!(
                "stellarator requires radius > 0, got {}",
                self.radius
            )));
        }
        if self.yperiod == 0.0 {
            return Err(FieldError::ConfigError(
                "stellarator requires a non-zero yperiod".to_string(),
            ));
        }
        Ok(())
    }

    /// Rotational rate of the coils in radians per unit y.
    pub fn iota(&self) -> f64 {
        2.0 * std::f64::consts::PI / self.yperiod
    }
}

/// Resolution of the spectral synthesis and of the regular (R, Z) regrid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VmecGridConfig {
    /// Poloidal samples; `None` uses `mpol` from the equilibrium.
    pub ntheta: Option<usize>,
    /// Toroidal samples; `None` uses `ntor + 1` from the equilibrium.
    pub nzeta: Option<usize>,
    /// Regular grid points in R
    pub nr: usize,
    /// Regular grid points in Z
    pub nz: usize,
    /// Keep the (s, θ, ζ) arrays after the regular grid is built.
    pub retain_mesh: bool,
}

impl Default for VmecGridConfig {
    fn default() -> Self {
        VmecGridConfig {
            ntheta: None,
            nzeta: None,
            nr: 32,
            nz: 32,
            retain_mesh: false,
        }
    }
}

impl VmecGridConfig {
    pub fn validate(&self) -> FieldResult<()> {
        if self.nr < 2 || self.nz < 2 {
            return Err(FieldError::ConfigError(format!(
                "VMEC regrid requires nr,nz >= 2, got nr={}, nz={}",
                self.nr, self.nz
            )));
        }
        if matches!(self.ntheta, Some(n) if n < 2) {
            return Err(FieldError::ConfigError(
                "VMEC synthesis requires ntheta >= 2".to_string(),
            ));
        }
        // nzeta = 1 is an axisymmetric equilibrium sampled on a single slice.
        if self.nzeta == Some(0) {
            return Err(FieldError::ConfigError(
                "VMEC synthesis requires nzeta >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// How the smoothing wrapper treats the in-plane field components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    /// In-plane components returned untouched.
    PassThrough,
    /// In-plane components scaled by the edge damping factor P ∈ [0, 1].
    #[default]
    Damped,
}

/// Buffer widths, in grid cells, over which the in-plane field is damped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub xboundary: usize,
    pub zboundary: usize,
    pub mode: SmoothingMode,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        SmoothingConfig {
            xboundary: 4,
            zboundary: 4,
            mode: SmoothingMode::Damped,
        }
    }
}
