// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Magnetic field representations behind one query interface.
//!
//! Analytic fields: uniform, slab, curved slab, four-coil stellarators
//! Reconstructed fields: VMEC spectral output, GEQDSK flux functions
//! Wrappers: edge smoothing

pub mod boundary;
pub mod coils;
pub mod field;
pub mod geqdsk;
pub mod slab;
pub mod smoothing;
pub mod vmec;

pub use boundary::{Boundary, NoBoundary, PolygonBoundary};
pub use field::{
    field_direction_flat, field_direction_with, Coords, DegeneracyPolicy, FieldDirection,
    MagneticField, PositionBatch, UniformField,
};
pub use geqdsk::GeqdskField;
pub use smoothing::SmoothedField;
pub use vmec::VmecField;

use magfield_types::config::FieldConfig;
use magfield_types::error::FieldResult;

/// Build an analytic field from its configuration.
pub fn build_field(config: &FieldConfig) -> FieldResult<Box<dyn MagneticField>> {
    config.validate()?;
    let field: Box<dyn MagneticField> = match config {
        FieldConfig::Uniform => Box::new(UniformField),
        FieldConfig::Slab(cfg) => Box::new(slab::Slab::new(cfg.clone())?),
        FieldConfig::CurvedSlab(cfg) => Box::new(slab::CurvedSlab::new(cfg.clone())?),
        FieldConfig::StraightStellarator(cfg) => {
            Box::new(coils::StraightStellarator::new(cfg)?)
        }
        FieldConfig::RotatingEllipse(cfg) => Box::new(coils::RotatingEllipse::new(cfg)?),
    };
    log::debug!("built field from {config:?}");
    Ok(field)
}
