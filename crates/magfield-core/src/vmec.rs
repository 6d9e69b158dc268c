// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — VMEC Spectral Field
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Field reconstructed from a VMEC-style Fourier equilibrium.
//!
//! Construction runs in three stages:
//! 1. spectral synthesis of R, Z, their angular derivatives and the
//!    contravariant field components on a (s, θ, ζ) mesh,
//! 2. per-ζ scattered interpolation of (bR, bZ, bφ) onto a regular (R, Z)
//!    rectangle,
//! 3. trilinear interpolators over (R, Z, φ) used for every later query.
//!
//! Input arrays are laid out `[ns, mn]` (one row per flux surface).

use crate::field::{Coords, MagneticField};
use magfield_math::fourier::SpectralBasis;
use magfield_math::interp::RegularGridInterpolator;
use magfield_math::scatter::ScatterInterpolator;
use magfield_types::config::VmecGridConfig;
use magfield_types::constants::{FILL_IN_PLANE, FILL_TOROIDAL, TWO_PI};
use magfield_types::error::{FieldError, FieldResult};
use magfield_types::state::NamedArrays;
use ndarray::{Array1, Array2, Array3, ArrayD, ArrayView2, Axis};
use rayon::prelude::*;

/// Raw equilibrium arrays, validated for consistent shapes.
#[derive(Debug, Clone)]
pub struct VmecInput {
    pub xm: Array1<f64>,
    pub xn: Array1<f64>,
    /// Mode numbers of the field coefficients, when they differ from `xm`/`xn`.
    pub xm_nyq: Option<Array1<f64>>,
    pub xn_nyq: Option<Array1<f64>>,
    pub rmnc: Array2<f64>,
    pub zmns: Array2<f64>,
    pub bsupumnc: Array2<f64>,
    pub bsupvmnc: Array2<f64>,
    /// Non-stellarator-symmetric terms; `None` when the equilibrium is symmetric.
    pub asymmetric: Option<AsymmetricTerms>,
    pub mpol: Option<usize>,
    pub ntor: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct AsymmetricTerms {
    pub rmns: Array2<f64>,
    pub zmnc: Array2<f64>,
}

fn count_scalar(arrays: &NamedArrays, name: &str) -> FieldResult<Option<usize>> {
    match arrays.optional_scalar(name)? {
        None => Ok(None),
        Some(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(Some(v as usize)),
        Some(v) => Err(FieldError::ConfigError(format!(
            "'{name}' must be a non-negative integer, got {v}"
        ))),
    }
}

fn check_coeffs(name: &str, arr: &Array2<f64>, ns: usize, mn: usize) -> FieldResult<()> {
    if arr.dim() != (ns, mn) {
        return Err(FieldError::ShapeMismatch(format!(
            "'{name}' must be [ns={ns}, mn={mn}], got {:?}",
            arr.shape()
        )));
    }
    if arr.iter().any(|v| !v.is_finite()) {
        return Err(FieldError::PhysicsViolation(format!(
            "'{name}' contains non-finite coefficients"
        )));
    }
    Ok(())
}

impl VmecInput {
    pub fn from_named(arrays: &NamedArrays) -> FieldResult<Self> {
        let xm = arrays.array1("xm")?;
        let xn = arrays.array1("xn")?;
        if xm.len() != xn.len() {
            return Err(FieldError::ShapeMismatch(format!(
                "'xm' and 'xn' differ in length: {} vs {}",
                xm.len(),
                xn.len()
            )));
        }
        let mn = xm.len();

        let rmnc = arrays.array2("rmnc")?;
        let ns = match count_scalar(arrays, "ns")? {
            Some(ns) => ns,
            None => rmnc.nrows(),
        };
        if ns < 3 {
            return Err(FieldError::ShapeMismatch(format!(
                "VMEC input needs at least 3 flux surfaces, got {ns}"
            )));
        }
        check_coeffs("rmnc", &rmnc, ns, mn)?;
        let zmns = arrays.array2("zmns")?;
        check_coeffs("zmns", &zmns, ns, mn)?;

        let xm_nyq = arrays.optional_array1("xm_nyq")?;
        let xn_nyq = arrays.optional_array1("xn_nyq")?;
        let mn_field = match (&xm_nyq, &xn_nyq) {
            (Some(m), Some(n)) if m.len() == n.len() => m.len(),
            (None, None) => mn,
            _ => {
                return Err(FieldError::ShapeMismatch(
                    "'xm_nyq' and 'xn_nyq' must be given together with equal lengths".to_string(),
                ))
            }
        };
        let bsupumnc = arrays.array2("bsupumnc")?;
        check_coeffs("bsupumnc", &bsupumnc, ns, mn_field)?;
        let bsupvmnc = arrays.array2("bsupvmnc")?;
        check_coeffs("bsupvmnc", &bsupvmnc, ns, mn_field)?;

        let iasym = arrays.optional_scalar("iasym")?.unwrap_or(0.0);
        let asymmetric = if iasym != 0.0 {
            let take = |name: &str| -> FieldResult<Array2<f64>> {
                match arrays.optional_array2(name)? {
                    Some(a) => {
                        check_coeffs(name, &a, ns, mn)?;
                        Ok(a)
                    }
                    None => {
                        log::warn!("iasym set but '{name}' is absent; treating it as zero");
                        Ok(Array2::zeros((ns, mn)))
                    }
                }
            };
            Some(AsymmetricTerms {
                rmns: take("rmns")?,
                zmnc: take("zmnc")?,
            })
        } else {
            None
        };

        Ok(VmecInput {
            xm,
            xn,
            xm_nyq,
            xn_nyq,
            rmnc,
            zmns,
            bsupumnc,
            bsupvmnc,
            asymmetric,
            mpol: count_scalar(arrays, "mpol")?,
            ntor: count_scalar(arrays, "ntor")?,
        })
    }

    pub fn ns(&self) -> usize {
        self.rmnc.nrows()
    }

    /// Poloidal and toroidal sample counts, from the grid config or `mpol` / `ntor + 1`.
    pub fn resolution(&self, grid: &VmecGridConfig) -> FieldResult<(usize, usize)> {
        let ntheta = match (grid.ntheta, self.mpol) {
            (Some(n), _) | (None, Some(n)) => n,
            (None, None) => return Err(FieldError::MissingArray("mpol".to_string())),
        };
        let nzeta = match (grid.nzeta, self.ntor) {
            (Some(n), _) => n,
            (None, Some(ntor)) => ntor + 1,
            (None, None) => return Err(FieldError::MissingArray("ntor".to_string())),
        };
        if ntheta < 2 || nzeta < 1 {
            return Err(FieldError::ConfigError(format!(
                "VMEC synthesis needs ntheta >= 2 and nzeta >= 1, got {ntheta}, {nzeta}"
            )));
        }
        Ok((ntheta, nzeta))
    }
}

/// Shift half-grid field profiles onto the full radial grid.
///
/// `out[0] = f[1] − ½f[2]`, `out[i] = ½(f[i] + f[i+1])` for every
/// `1 ≤ i ≤ ns−2` (the surfaces next to both ends included, none are left
/// at zero), and only the outermost point is extrapolated:
/// `out[ns−1] = 2f[ns−2] − f[ns−3]`. Applied to every mode column.
pub fn radial_smooth(field: ArrayView2<f64>) -> FieldResult<Array2<f64>> {
    let ns = field.nrows();
    if ns < 3 {
        return Err(FieldError::ShapeMismatch(format!(
            "radial smoothing needs at least 3 surfaces, got {ns}"
        )));
    }
    let mut out = Array2::zeros(field.raw_dim());
    for (mut dst, src) in out
        .axis_iter_mut(Axis(1))
        .zip(field.axis_iter(Axis(1)))
    {
        dst[0] = src[1] - 0.5 * src[2];
        for i in 1..ns - 1 {
            dst[i] = 0.5 * (src[i] + src[i + 1]);
        }
        dst[ns - 1] = 2.0 * src[ns - 2] - src[ns - 3];
    }
    Ok(out)
}

/// Real-space arrays on the (s, θ, ζ) mesh, each `[ns, nθ, nζ]`.
#[derive(Debug, Clone)]
pub struct SpectralMesh {
    pub theta: Array1<f64>,
    pub zeta: Array1<f64>,
    pub r: Array3<f64>,
    pub z: Array3<f64>,
    pub br: Array3<f64>,
    pub bz: Array3<f64>,
    pub bphi: Array3<f64>,
}

impl SpectralMesh {
    pub fn synthesize(input: &VmecInput, ntheta: usize, nzeta: usize) -> FieldResult<Self> {
        let geo = SpectralBasis::on_uniform_grid(input.xm.view(), input.xn.view(), ntheta, nzeta)?;
        let fld = match (&input.xm_nyq, &input.xn_nyq) {
            (Some(m), Some(n)) => {
                SpectralBasis::on_uniform_grid(m.view(), n.view(), ntheta, nzeta)?
            }
            _ => geo.clone(),
        };

        let neg_xm = input.xm.mapv(|m| -m);
        let neg_xn = input.xn.mapv(|n| -n);
        let scale = SpectralBasis::scale_modes;

        let mut r = geo.cfunct(input.rmnc.view())?;
        let mut z = geo.sfunct(input.zmns.view())?;
        let mut drdu = geo.sfunct(scale(input.rmnc.view(), neg_xm.view()).view())?;
        let mut drdv = geo.sfunct(scale(input.rmnc.view(), neg_xn.view()).view())?;
        let mut dzdu = geo.cfunct(scale(input.zmns.view(), input.xm.view()).view())?;
        let mut dzdv = geo.cfunct(scale(input.zmns.view(), input.xn.view()).view())?;

        if let Some(asym) = &input.asymmetric {
            r += &geo.sfunct(asym.rmns.view())?;
            drdu += &geo.cfunct(scale(asym.rmns.view(), input.xm.view()).view())?;
            drdv += &geo.cfunct(scale(asym.rmns.view(), input.xn.view()).view())?;
            z += &geo.cfunct(asym.zmnc.view())?;
            dzdu += &geo.sfunct(scale(asym.zmnc.view(), neg_xm.view()).view())?;
            dzdv += &geo.sfunct(scale(asym.zmnc.view(), neg_xn.view()).view())?;
        }

        let bu = fld.cfunct(radial_smooth(input.bsupumnc.view())?.view())?;
        let bv = fld.cfunct(radial_smooth(input.bsupvmnc.view())?.view())?;

        let br = &bu * &drdu + &bv * &drdv;
        let bz = &bu * &dzdu + &bv * &dzdv;
        let bphi = &r * &bv;

        Ok(SpectralMesh {
            theta: geo.theta().to_owned(),
            zeta: geo.zeta().to_owned(),
            r,
            z,
            br,
            bz,
            bphi,
        })
    }
}

/// [bR, bZ, bφ] on the regular grid, each `[nr, nz]`, for one ζ slice.
type RegridSlice = [Array2<f64>; 3];

fn regrid_slice(
    mesh: &SpectralMesh,
    k: usize,
    r_1d: &Array1<f64>,
    z_1d: &Array1<f64>,
) -> FieldResult<RegridSlice> {
    let r = mesh.r.index_axis(Axis(2), k);
    let z = mesh.z.index_axis(Axis(2), k);
    let points: Vec<(f64, f64)> = r.iter().zip(z.iter()).map(|(&a, &b)| (a, b)).collect();
    let scatter = ScatterInterpolator::new(&points)?;

    let (nr, nz) = (r_1d.len(), z_1d.len());
    let targets: Vec<(f64, f64)> = r_1d
        .iter()
        .flat_map(|&rv| z_1d.iter().map(move |&zv| (rv, zv)))
        .collect();
    let stencil = scatter.stencil(&targets);

    let regrid = |values: &Array3<f64>, fill: f64| -> FieldResult<Array2<f64>> {
        let slice: Vec<f64> = values.index_axis(Axis(2), k).iter().copied().collect();
        let out = scatter.apply(&stencil, &slice, fill)?;
        Array2::from_shape_vec((nr, nz), out).map_err(|e| FieldError::ShapeMismatch(e.to_string()))
    };

    Ok([
        regrid(&mesh.br, FILL_IN_PLANE)?,
        regrid(&mesh.bz, FILL_IN_PLANE)?,
        regrid(&mesh.bphi, FILL_TOROIDAL)?,
    ])
}

/// Field from a VMEC equilibrium, evaluated by trilinear lookup on (R, Z, φ).
#[derive(Debug, Clone)]
pub struct VmecField {
    br: RegularGridInterpolator,
    bz: RegularGridInterpolator,
    bphi: RegularGridInterpolator,
    mesh: Option<SpectralMesh>,
}

impl VmecField {
    pub fn from_named(arrays: &NamedArrays, grid: &VmecGridConfig) -> FieldResult<Self> {
        Self::new(&VmecInput::from_named(arrays)?, grid)
    }

    pub fn new(input: &VmecInput, grid: &VmecGridConfig) -> FieldResult<Self> {
        grid.validate()?;
        let (ntheta, nzeta) = input.resolution(grid)?;
        let mesh = SpectralMesh::synthesize(input, ntheta, nzeta)?;
        log::debug!(
            "VMEC synthesis: ns={}, modes={}, ntheta={ntheta}, nzeta={nzeta}",
            input.ns(),
            input.xm.len()
        );

        let (r_min, r_max) = min_max(&mesh.r);
        let (z_min, z_max) = min_max(&mesh.z);
        if !(r_max > r_min) || !(z_max > z_min) {
            return Err(FieldError::PhysicsViolation(format!(
                "VMEC mesh has no extent: R in [{r_min}, {r_max}], Z in [{z_min}, {z_max}]"
            )));
        }
        let r_1d = Array1::<f64>::linspace(r_min, r_max, grid.nr);
        let z_1d = Array1::<f64>::linspace(z_min, z_max, grid.nz);

        let slices = (0..nzeta)
            .into_par_iter()
            .map(|k| regrid_slice(&mesh, k, &r_1d, &z_1d))
            .collect::<FieldResult<Vec<_>>>()?;

        // A single toroidal slice is axisymmetric: span [0, 2π] with two copies.
        let (zeta, slices) = if nzeta == 1 {
            let s = slices.into_iter().next().ok_or_else(|| {
                FieldError::ShapeMismatch("VMEC regrid produced no slices".to_string())
            })?;
            (Array1::from(vec![0.0, TWO_PI]), vec![s.clone(), s])
        } else {
            (mesh.zeta.clone(), slices)
        };

        let stack = |component: usize| {
            let mut out = Array3::<f64>::zeros((grid.nr, grid.nz, zeta.len()));
            for (k, s) in slices.iter().enumerate() {
                out.index_axis_mut(Axis(2), k).assign(&s[component]);
            }
            out.into_dyn()
        };
        let axes = vec![r_1d.clone(), z_1d.clone(), zeta.clone()];
        let br = RegularGridInterpolator::new(axes.clone(), stack(0), FILL_IN_PLANE)?;
        let bz = RegularGridInterpolator::new(axes.clone(), stack(1), FILL_IN_PLANE)?;
        let bphi = RegularGridInterpolator::new(axes, stack(2), FILL_TOROIDAL)?;

        log::debug!(
            "VMEC regular grid: R in [{r_min:.4}, {r_max:.4}] ({} pts), Z in [{z_min:.4}, {z_max:.4}] ({} pts)",
            grid.nr,
            grid.nz
        );

        Ok(VmecField {
            br,
            bz,
            bphi,
            mesh: grid.retain_mesh.then_some(mesh),
        })
    }

    /// The synthesized (s, θ, ζ) mesh, when retained.
    pub fn mesh(&self) -> Option<&SpectralMesh> {
        self.mesh.as_ref()
    }

    pub fn r_axis(&self) -> &Array1<f64> {
        self.br.axis(0)
    }

    pub fn z_axis(&self) -> &Array1<f64> {
        self.br.axis(1)
    }

    pub fn zeta_axis(&self) -> &Array1<f64> {
        self.br.axis(2)
    }

    fn lookup(interp: &RegularGridInterpolator, c: &Coords) -> ArrayD<f64> {
        c.map(|x, z, phi| interp.eval(&[x, z, phi.rem_euclid(TWO_PI)]))
    }
}

fn min_max(a: &Array3<f64>) -> (f64, f64) {
    a.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

impl MagneticField for VmecField {
    fn bx(&self, c: &Coords) -> ArrayD<f64> {
        Self::lookup(&self.br, c)
    }

    fn by(&self, c: &Coords) -> ArrayD<f64> {
        Self::lookup(&self.bphi, c)
    }

    fn bz(&self, c: &Coords) -> ArrayD<f64> {
        Self::lookup(&self.bz, c)
    }

    fn major_radius(&self, c: &Coords) -> Option<ArrayD<f64>> {
        Some(c.x().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{field_direction_flat, DegeneracyPolicy};
    use ndarray::{array, IxDyn};

    const R0: f64 = 3.0;
    const A: f64 = 1.0;
    const BU: f64 = 0.2;
    const BV: f64 = 0.5;

    /// Circular torus with ρ ∝ s and constant contravariant field.
    fn circular_torus(ns: usize) -> NamedArrays {
        let rho = Array1::from_shape_fn(ns, |s| A * s as f64 / (ns - 1) as f64);
        let rmnc = Array2::from_shape_fn((ns, 2), |(s, k)| if k == 0 { R0 } else { rho[s] });
        let zmns = Array2::from_shape_fn((ns, 2), |(s, k)| if k == 0 { 0.0 } else { rho[s] });
        let bsupu = Array2::from_shape_fn((ns, 2), |(_, k)| if k == 0 { BU } else { 0.0 });
        let bsupv = Array2::from_shape_fn((ns, 2), |(_, k)| if k == 0 { BV } else { 0.0 });

        let mut arrays = NamedArrays::new();
        arrays
            .insert("xm", array![0.0, 1.0].into_dyn())
            .insert("xn", array![0.0, 0.0].into_dyn())
            .insert("rmnc", rmnc.into_dyn())
            .insert("zmns", zmns.into_dyn())
            .insert("bsupumnc", bsupu.into_dyn())
            .insert("bsupvmnc", bsupv.into_dyn())
            .insert_scalar("ns", ns as f64)
            .insert_scalar("mpol", 33.0)
            .insert_scalar("ntor", 3.0);
        arrays
    }

    fn grid(nr: usize) -> VmecGridConfig {
        VmecGridConfig {
            nr,
            nz: nr,
            retain_mesh: true,
            ..VmecGridConfig::default()
        }
    }

    #[test]
    fn test_radial_smooth_stencil() {
        let f = array![[1.0], [2.0], [4.0], [8.0]];
        let out = radial_smooth(f.view()).unwrap();
        assert_eq!(out.column(0).to_vec(), vec![2.0 - 2.0, 3.0, 6.0, 8.0 - 2.0]);
        assert!(radial_smooth(array![[1.0], [2.0]].view()).is_err());
    }

    #[test]
    fn test_radial_smooth_end_values() {
        let f = array![[1.0, 0.0], [3.0, 1.0], [5.0, 4.0], [7.0, 9.0], [11.0, 16.0]];
        let out = radial_smooth(f.view()).unwrap();
        // Axis: f[1] − ½f[2]
        assert_eq!(out[[0, 0]], 0.5);
        assert_eq!(out[[0, 1]], -1.0);
        // Neighbours of both ends are forward averages, not zero.
        assert_eq!(out[[1, 0]], 4.0);
        assert_eq!(out[[3, 0]], 9.0);
        assert_eq!(out[[3, 1]], 12.5);
        // Edge: 2f[ns−2] − f[ns−3]
        assert_eq!(out[[4, 0]], 9.0);
        assert_eq!(out[[4, 1]], 14.0);
    }

    #[test]
    fn test_synthesis_of_circular_torus() {
        let input = VmecInput::from_named(&circular_torus(6)).unwrap();
        let mesh = SpectralMesh::synthesize(&input, 9, 3).unwrap();
        assert_eq!(mesh.r.dim(), (6, 9, 3));
        for s in 0..6 {
            let rho = A * s as f64 / 5.0;
            for (i, &th) in mesh.theta.iter().enumerate() {
                let (r, z) = (mesh.r[[s, i, 1]], mesh.z[[s, i, 1]]);
                assert!((r - (R0 + rho * th.cos())).abs() < 1e-12);
                assert!((z - rho * th.sin()).abs() < 1e-12);
                if s > 0 {
                    // bR = −bu·Z, bZ = bu·(R − R0), bφ = R·bv away from the axis
                    assert!((mesh.br[[s, i, 1]] + BU * z).abs() < 1e-12);
                    assert!((mesh.bz[[s, i, 1]] - BU * (r - R0)).abs() < 1e-12);
                    assert!((mesh.bphi[[s, i, 1]] - BV * r).abs() < 1e-12);
                }
            }
        }
    }

    /// Circular torus whose magnetic axis circles `(R0, 0)` five times per
    /// toroidal turn: `R += D cos 5ζ`, `Z += D sin 5ζ`.
    fn rotating_torus(ns: usize) -> NamedArrays {
        let rho = Array1::from_shape_fn(ns, |s| A * s as f64 / (ns - 1) as f64);
        let rmnc = Array2::from_shape_fn((ns, 3), |(s, k)| [R0, rho[s], D][k]);
        let zmns = Array2::from_shape_fn((ns, 3), |(s, k)| [0.0, rho[s], D][k]);
        let bsupu = Array2::from_shape_fn((ns, 3), |(_, k)| if k == 0 { BU } else { 0.0 });
        let bsupv = Array2::from_shape_fn((ns, 3), |(_, k)| if k == 0 { BV } else { 0.0 });

        let mut arrays = NamedArrays::new();
        arrays
            .insert("xm", array![0.0, 1.0, 0.0].into_dyn())
            .insert("xn", array![0.0, 0.0, 5.0].into_dyn())
            .insert("rmnc", rmnc.into_dyn())
            .insert("zmns", zmns.into_dyn())
            .insert("bsupumnc", bsupu.into_dyn())
            .insert("bsupvmnc", bsupv.into_dyn())
            .insert_scalar("ns", ns as f64)
            .insert_scalar("mpol", 33.0)
            .insert_scalar("ntor", 6.0);
        arrays
    }

    const D: f64 = 0.1;

    fn rel_err(got: f64, want: f64) -> f64 {
        (got - want).abs() / want.abs().max(1e-2)
    }

    /// Lookup at mesh node `(s, i, k)` against the synthesized values.
    /// Only surfaces well inside the last closed one are compared: bilinear
    /// cells that touch the hull mix in the fill value.
    fn assert_interior_nodes_match(
        field: &VmecField,
        surfaces: std::ops::RangeInclusive<usize>,
        slices: &[usize],
    ) {
        let mesh = field.mesh().unwrap();
        let ntheta = mesh.theta.len();
        for s in surfaces {
            for i in 0..ntheta {
                for &k in slices {
                    let x = ArrayD::from_elem(IxDyn(&[1]), mesh.r[[s, i, k]]);
                    let z = ArrayD::from_elem(IxDyn(&[1]), mesh.z[[s, i, k]]);
                    let phi = ArrayD::from_elem(IxDyn(&[1]), mesh.zeta[k]);
                    let c = Coords::new(x.view(), z.view(), phi.view()).unwrap();
                    for (got, want, name) in [
                        (field.bx(&c)[[0]], mesh.br[[s, i, k]], "bR"),
                        (field.bz(&c)[[0]], mesh.bz[[s, i, k]], "bZ"),
                        (field.by(&c)[[0]], mesh.bphi[[s, i, k]], "bphi"),
                    ] {
                        assert!(
                            rel_err(got, want) < 1e-3,
                            "{name} at (s={s}, i={i}, k={k}): {got} vs {want}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_regular_grid_matches_mesh_nodes() {
        let field = VmecField::from_named(&circular_torus(10), &grid(48)).unwrap();
        assert_eq!(field.zeta_axis().len(), 4);
        assert_interior_nodes_match(&field, 3..=7, &[0, 1, 2]);
    }

    #[test]
    fn test_rotating_mode_synthesis() {
        let field = VmecField::from_named(
            &rotating_torus(10),
            &VmecGridConfig {
                nzeta: Some(7),
                ..grid(48)
            },
        )
        .unwrap();
        let mesh = field.mesh().unwrap();
        assert_eq!(field.zeta_axis().len(), 7);

        for s in 1..10 {
            for (i, &th) in mesh.theta.iter().enumerate() {
                for (k, &ze) in mesh.zeta.iter().enumerate() {
                    let rho = A * s as f64 / 9.0;
                    let (sin5, cos5) = (5.0 * ze).sin_cos();
                    let r = R0 + rho * th.cos() + D * cos5;
                    let z = rho * th.sin() + D * sin5;
                    assert!((mesh.r[[s, i, k]] - r).abs() < 1e-12);
                    assert!((mesh.z[[s, i, k]] - z).abs() < 1e-12);
                    let br = -BU * rho * th.sin() - 5.0 * BV * D * sin5;
                    let bz = BU * rho * th.cos() + 5.0 * BV * D * cos5;
                    assert!((mesh.br[[s, i, k]] - br).abs() < 1e-12);
                    assert!((mesh.bz[[s, i, k]] - bz).abs() < 1e-12);
                    assert!((mesh.bphi[[s, i, k]] - BV * r).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_rotating_mode_regrid_matches_mesh_nodes() {
        let field = VmecField::from_named(
            &rotating_torus(10),
            &VmecGridConfig {
                nzeta: Some(7),
                ..grid(48)
            },
        )
        .unwrap();
        // The last node sits at 2π, which the lookup wraps onto ζ = 0.
        assert_interior_nodes_match(&field, 3..=7, &[0, 1, 2, 3, 4, 5]);

        // Slices differ: the axis has moved between ζ = 0 and the next node.
        let x = ArrayD::from_elem(IxDyn(&[1]), R0 + 0.5);
        let z = ArrayD::from_elem(IxDyn(&[1]), 0.0);
        let phi0 = ArrayD::from_elem(IxDyn(&[1]), 0.0);
        let phi1 = ArrayD::from_elem(IxDyn(&[1]), field.zeta_axis()[1]);
        let b0 = field.bz(&Coords::new(x.view(), z.view(), phi0.view()).unwrap())[[0]];
        let b1 = field.bz(&Coords::new(x.view(), z.view(), phi1.view()).unwrap())[[0]];
        assert!((b0 - b1).abs() > 0.05);
    }

    #[test]
    fn test_single_toroidal_slice_is_axisymmetric() {
        let field = VmecField::from_named(
            &circular_torus(8),
            &VmecGridConfig {
                nzeta: Some(1),
                ..grid(32)
            },
        )
        .unwrap();
        assert_eq!(field.zeta_axis().to_vec(), vec![0.0, TWO_PI]);
        let x = ArrayD::from_elem(IxDyn(&[3]), R0 + 0.4);
        let z = ArrayD::from_elem(IxDyn(&[3]), 0.3);
        let phi = ArrayD::from_shape_vec(IxDyn(&[3]), vec![0.0, 1.7, 5.2]).unwrap();
        let b = field.by(&Coords::new(x.view(), z.view(), phi.view()).unwrap());
        assert!((b[[0]] - b[[1]]).abs() < 1e-12 && (b[[1]] - b[[2]]).abs() < 1e-12);
        assert!(rel_err(b[[0]], BV * (R0 + 0.4)) < 1e-3);
    }

    #[test]
    fn test_fill_values_and_phi_wrap() {
        let field = VmecField::from_named(&circular_torus(6), &grid(24)).unwrap();
        assert!(field.mesh().is_some());
        let x = array![10.0, R0 + 0.5, R0 + 0.5].into_dyn();
        let z = array![0.0, 0.0, 0.0].into_dyn();
        let phi = array![0.0, 0.3, 0.3 + 4.0 * std::f64::consts::PI].into_dyn();
        let c = Coords::new(x.view(), z.view(), phi.view()).unwrap();
        let bx = field.bx(&c);
        let by = field.by(&c);
        assert_eq!(bx[[0]], FILL_IN_PLANE);
        assert_eq!(by[[0]], FILL_TOROIDAL);
        assert!((by[[1]] - by[[2]]).abs() < 1e-12);
        assert_eq!(field.major_radius(&c).unwrap(), x);

        let dir = field_direction_flat(&field, &[R0 + 0.5, 0.0], -0.2, DegeneracyPolicy::Error);
        assert!(dir.is_ok());
    }

    #[test]
    fn test_axisymmetric_single_slice() {
        let mut arrays = circular_torus(6);
        arrays.insert_scalar("ntor", 0.0);
        let field = VmecField::from_named(
            &arrays,
            &VmecGridConfig {
                nr: 16,
                nz: 16,
                ..VmecGridConfig::default()
            },
        )
        .unwrap();
        assert_eq!(field.zeta_axis().to_vec(), vec![0.0, TWO_PI]);
        assert!(field.mesh().is_none());
    }

    #[test]
    fn test_missing_asymmetric_terms_read_as_zero() {
        let mut arrays = circular_torus(6);
        let sym = VmecField::from_named(&arrays, &grid(16)).unwrap();
        arrays.insert_scalar("iasym", 1.0);
        let input = VmecInput::from_named(&arrays).unwrap();
        assert!(input.asymmetric.is_some());
        let asym = VmecField::new(&input, &grid(16)).unwrap();
        assert_eq!(sym.mesh().unwrap().r, asym.mesh().unwrap().r);
        assert_eq!(sym.mesh().unwrap().bphi, asym.mesh().unwrap().bphi);
    }

    #[test]
    fn test_asymmetric_shift_moves_surfaces() {
        let mut arrays = circular_torus(6);
        arrays.insert_scalar("iasym", 1.0);
        // m = 0 cosine term in Z lifts every surface.
        arrays.insert(
            "zmnc",
            Array2::from_shape_fn((6, 2), |(_, k)| if k == 0 { 0.25 } else { 0.0 }).into_dyn(),
        );
        let input = VmecInput::from_named(&arrays).unwrap();
        let mesh = SpectralMesh::synthesize(&input, 9, 2).unwrap();
        assert!((mesh.z[[0, 3, 0]] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_input_errors() {
        let mut arrays = circular_torus(6);
        arrays.insert("zmns", Array2::<f64>::zeros((5, 2)).into_dyn());
        match VmecInput::from_named(&arrays).expect_err("bad shape must fail") {
            FieldError::ShapeMismatch(msg) => assert!(msg.contains("zmns")),
            other => panic!("Unexpected error: {other:?}"),
        }

        let mut arrays = NamedArrays::new();
        arrays.insert("xm", array![0.0].into_dyn());
        match VmecInput::from_named(&arrays).expect_err("missing xn must fail") {
            FieldError::MissingArray(name) => assert_eq!(name, "xn"),
            other => panic!("Unexpected error: {other:?}"),
        }

        let input = VmecInput {
            mpol: None,
            ..VmecInput::from_named(&circular_torus(4)).unwrap()
        };
        assert!(input.resolution(&VmecGridConfig::default()).is_err());
    }
}
