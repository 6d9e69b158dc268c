// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Numerical Kernels
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Numerical primitives for the SCPN magnetic field library.

#[cfg(feature = "autodiff")]
pub mod autodiff;
pub mod fourier;
pub mod interp;
pub mod scatter;
pub mod spline;
pub mod tridiag;
