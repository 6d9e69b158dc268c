// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// |By| below this value makes the field-line tangent singular.
pub const BY_DEGENERACY_THRESHOLD: f64 = 1e-8;

/// Off-grid value for in-plane components (B_R, B_Z).
pub const FILL_IN_PLANE: f64 = 0.0;

/// Off-grid value for the toroidal component. Keeps the tangent denominator non-zero.
pub const FILL_TOROIDAL: f64 = 1.0;

/// Normalised flux assigned outside the last closed flux surface.
pub const PSI_NORM_EDGE: f64 = 1.0;

/// Coefficient of the 2D line-current potential, A = -LINE_CURRENT_POTENTIAL * I * ln(r²).
/// The corresponding field magnitude is 2 * LINE_CURRENT_POTENTIAL * I / r.
pub const LINE_CURRENT_POTENTIAL: f64 = 0.1;

/// One full toroidal turn.
pub const TWO_PI: f64 = 2.0 * std::f64::consts::PI;
