// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Property-Based Tests (proptest) for magfield-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for the field interface and its wrappers.

use magfield_core::boundary::{Boundary, PolygonBoundary};
use magfield_core::field::{
    field_direction_with, Coords, DegeneracyPolicy, FieldDirection, MagneticField, PositionBatch,
};
use magfield_core::geqdsk::GeqdskField;
use magfield_core::slab::{CurvedSlab, Slab};
use magfield_core::smoothing::SmoothedField;
use magfield_core::vmec::VmecField;
use magfield_types::config::{
    CurvedSlabConfig, SlabConfig, SmoothingConfig, SmoothingMode, VmecGridConfig,
};
use magfield_types::state::{Grid2D, NamedArrays};
use ndarray::{array, Array1, Array2, ArrayD};
use proptest::prelude::*;

fn slab(by: f64, bz: f64, bzprime: f64) -> Slab {
    Slab::new(SlabConfig {
        by,
        bz,
        xcentre: 0.0,
        bzprime,
    })
    .unwrap()
}

/// Nested circular ψ surfaces centred on (2, 0) with a boundary of radius 0.8.
fn circular_geqdsk() -> NamedArrays {
    let (nr, nz) = (33, 33);
    let r = Array1::<f64>::linspace(1.0, 3.0, nr);
    let z = Array1::<f64>::linspace(-1.5, 1.5, nz);
    let psi = Array2::from_shape_fn((nz, nr), |(j, i)| (r[i] - 2.0).powi(2) + z[j].powi(2));
    let theta = Array1::<f64>::linspace(0.0, std::f64::consts::TAU, 33);

    let mut named = NamedArrays::new();
    named
        .insert_scalar("rleft", 1.0)
        .insert_scalar("rdim", 2.0)
        .insert_scalar("zmid", 0.0)
        .insert_scalar("zdim", 3.0)
        .insert_scalar("simag", 0.0)
        .insert_scalar("sibry", 0.64)
        .insert("psirz", psi.into_dyn())
        .insert("fpol", Array1::from_elem(nr, 4.0).into_dyn())
        .insert("pres", Array1::<f64>::linspace(1e4, 0.0, nr).into_dyn())
        .insert("rbbbs", theta.mapv(|t: f64| 2.0 + 0.8 * t.cos()).into_dyn())
        .insert("zbbbs", theta.mapv(|t: f64| 0.8 * t.sin()).into_dyn());
    named
}

/// Circular torus (R0 = 3, a = 1) with constant contravariant field.
fn circular_vmec(ns: usize) -> NamedArrays {
    let rho = Array1::from_shape_fn(ns, |s| s as f64 / (ns - 1) as f64);
    let mut named = NamedArrays::new();
    named
        .insert("xm", array![0.0, 1.0].into_dyn())
        .insert("xn", array![0.0, 0.0].into_dyn())
        .insert(
            "rmnc",
            Array2::from_shape_fn((ns, 2), |(s, k)| if k == 0 { 3.0 } else { rho[s] }).into_dyn(),
        )
        .insert(
            "zmns",
            Array2::from_shape_fn((ns, 2), |(s, k)| if k == 0 { 0.0 } else { rho[s] }).into_dyn(),
        )
        .insert(
            "bsupumnc",
            Array2::from_shape_fn((ns, 2), |(_, k)| if k == 0 { 0.2 } else { 0.0 }).into_dyn(),
        )
        .insert(
            "bsupvmnc",
            Array2::from_shape_fn((ns, 2), |(_, k)| if k == 0 { 0.5 } else { 0.0 }).into_dyn(),
        )
        .insert_scalar("ns", ns as f64)
        .insert_scalar("mpol", 17.0)
        .insert_scalar("ntor", 2.0);
    named
}

/// `b_mag` agrees with the norm of the components the field reports.
fn check_b_mag_norm(f: &dyn MagneticField, pts: &[(f64, f64, f64)]) -> Result<(), TestCaseError> {
    let x: Array1<f64> = pts.iter().map(|p| p.0).collect();
    let z: Array1<f64> = pts.iter().map(|p| p.1).collect();
    let phi: Array1<f64> = pts.iter().map(|p| p.2).collect();
    let (x, z, phi) = (x.into_dyn(), z.into_dyn(), phi.into_dyn());
    let c = Coords::new(x.view(), z.view(), phi.view()).unwrap();
    let (bx, by, bz) = (f.bx(&c), f.by(&c), f.bz(&c));
    for (k, &m) in f.b_mag(&c).iter().enumerate() {
        let expect = (bx[[k]].powi(2) + by[[k]].powi(2) + bz[[k]].powi(2)).sqrt();
        prop_assert!((m - expect).abs() <= 1e-12 * expect.max(1.0), "{m} vs {expect}");
    }
    Ok(())
}

// ── Interface Properties ─────────────────────────────────────────────

proptest! {
    /// |B| is the Euclidean norm of the three components.
    #[test]
    fn b_mag_is_component_norm(
        by in 0.1f64..5.0,
        bz in -2.0f64..2.0,
        bzprime in -1.0f64..1.0,
        xs in prop::collection::vec(-3.0f64..3.0, 1..20),
    ) {
        let f = slab(by, bz, bzprime);
        let x = Array1::from(xs).into_dyn();
        let c = Coords::new(x.view(), x.view(), x.view()).unwrap();
        let bmag = f.b_mag(&c);
        let bzs = f.bz(&c);
        for (k, &m) in bmag.iter().enumerate() {
            let expect = (by * by + bzs[k] * bzs[k]).sqrt();
            prop_assert!((m - expect).abs() < 1e-12);
        }
    }

    /// Flat and stacked batches give the same tangents, point by point.
    #[test]
    fn flat_and_stacked_directions_agree(
        by in 0.5f64..3.0,
        rmaj in 0.5f64..4.0,
        pts in prop::collection::vec((-2.0f64..2.0, -2.0f64..2.0), 1..16),
    ) {
        let cfg = CurvedSlabConfig {
            by,
            rmaj,
            ..CurvedSlabConfig::default()
        };
        let f = CurvedSlab::new(cfg.clone()).unwrap();
        let n = pts.len();
        let flat: Array1<f64> = pts.iter().flat_map(|&(x, z)| [x, z]).collect();
        let stacked = Array2::from_shape_fn((2, n), |(k, i)| if k == 0 { pts[i].0 } else { pts[i].1 });

        let a = field_direction_with(&f, PositionBatch::Flat(flat.view()), 0.3, DegeneracyPolicy::Error)
            .unwrap()
            .into_flat()
            .unwrap();
        let (dx, dz) = field_direction_with(
            &f,
            PositionBatch::Stacked(stacked.view().into_dyn()),
            0.3,
            DegeneracyPolicy::Error,
        )
        .unwrap()
        .into_split()
        .unwrap();

        prop_assert_eq!(dx.shape(), &[n]);
        for i in 0..n {
            prop_assert!((a[2 * i] - dx[[i]]).abs() < 1e-14);
            prop_assert!((a[2 * i + 1] - dz[[i]]).abs() < 1e-14);
            // Cylindrical scaling: dz/dy = Rmaj·Bz/By
            let bz = cfg.bz + (pts[i].0 - cfg.xcentre) * cfg.bzprime;
            prop_assert!((dz[[i]] - rmaj * bz / by).abs() < 1e-12);
        }
    }

    /// Stacked input of any trailing shape comes back in that shape.
    #[test]
    fn stacked_shape_preserved(rows in 1usize..5, cols in 1usize..5) {
        let f = slab(1.0, 0.2, 0.5);
        let pos = ArrayD::from_shape_fn(vec![2, rows, cols], |ix| ix[1] as f64 - ix[2] as f64);
        match field_direction_with(&f, PositionBatch::Stacked(pos.view()), 0.0, DegeneracyPolicy::Error).unwrap() {
            FieldDirection::Split { dx, dz } => {
                prop_assert_eq!(dx.shape(), &[rows, cols]);
                prop_assert_eq!(dz.shape(), &[rows, cols]);
            }
            FieldDirection::Flat(_) => prop_assert!(false, "stacked input produced flat output"),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// The norm identity holds for the equilibrium-backed fields and the
    /// smoothing wrapper, inside and outside their domains.
    #[test]
    fn b_mag_is_component_norm_for_every_field(
        pts in prop::collection::vec((0.5f64..4.5, -1.6f64..1.6, -1.0f64..7.0), 1..12),
    ) {
        let geqdsk = GeqdskField::from_named(&circular_geqdsk()).unwrap();
        check_b_mag_norm(&geqdsk, &pts)?;

        let vmec = VmecField::from_named(
            &circular_vmec(6),
            &VmecGridConfig { nr: 20, nz: 20, ..VmecGridConfig::default() },
        )
        .unwrap();
        check_b_mag_norm(&vmec, &pts)?;

        let grid = Grid2D::new(16, 16, 0.5, 4.5, -1.6, 1.6);
        let curved = CurvedSlab::new(CurvedSlabConfig { by: 1.5, bzprime: 0.4, ..CurvedSlabConfig::default() }).unwrap();
        let smoothed = SmoothedField::new(curved, &grid, &SmoothingConfig::default()).unwrap();
        check_b_mag_norm(&smoothed, &pts)?;

        let boxed: Box<dyn MagneticField> = Box::new(smoothed);
        check_b_mag_norm(&boxed, &pts)?;
    }
}

// ── Smoothing Properties ─────────────────────────────────────────────

proptest! {
    /// Damping stays in [0, 1] and never grows the in-plane field.
    #[test]
    fn damping_bounded(x in -1.0f64..2.0, z in -1.0f64..2.0, nb in 0usize..5) {
        let grid = Grid2D::new(16, 16, 0.0, 1.0, 0.0, 1.0);
        let cfg = SmoothingConfig { xboundary: nb, zboundary: nb, mode: SmoothingMode::Damped };
        let f = SmoothedField::new(slab(1.0, 0.7, 0.0), &grid, &cfg).unwrap();
        let p = f.damping(x, z);
        prop_assert!((0.0..=1.0).contains(&p));

        let xs = array![x].into_dyn();
        let zs = array![z].into_dyn();
        let c = Coords::new(xs.view(), zs.view(), zs.view()).unwrap();
        prop_assert!(f.bz(&c)[[0]].abs() <= 0.7 + 1e-12);
        prop_assert_eq!(f.by(&c)[[0]], 1.0);
    }
}

// ── Boundary Properties ──────────────────────────────────────────────

proptest! {
    /// The batch mask is the negation of `contains`, point by point.
    #[test]
    fn polygon_mask_matches_contains(
        pts in prop::collection::vec((-2.0f64..2.0, -2.0f64..2.0), 1..30),
    ) {
        let theta = Array1::<f64>::linspace(0.0, std::f64::consts::TAU, 13);
        let xs = theta.mapv(|t: f64| 1.2 * t.cos());
        let zs = theta.mapv(|t: f64| 0.8 * t.sin());
        let poly = PolygonBoundary::new(xs.view(), zs.view()).unwrap();

        let x: Array1<f64> = pts.iter().map(|p| p.0).collect();
        let z: Array1<f64> = pts.iter().map(|p| p.1).collect();
        let mask = poly.outside(&x.view().into_dyn(), &z.view().into_dyn()).unwrap();
        for (i, &(px, pz)) in pts.iter().enumerate() {
            prop_assert_eq!(mask[[i]], !poly.contains(px, pz));
            if px * px / 1.0 + pz * pz / 0.36 < 0.5 {
                prop_assert!(poly.contains(px, pz));
            }
        }
    }
}

// ── Coil Field Properties ────────────────────────────────────────────

#[cfg(feature = "autodiff")]
proptest! {
    /// Fields derived from a flux potential are divergence-free in-plane.
    #[test]
    fn coil_field_divergence_free(
        x in -0.3f64..0.3,
        z in -0.3f64..0.3,
        phi in 0.0f64..6.0,
    ) {
        use magfield_core::coils::StraightStellarator;
        use magfield_types::config::StellaratorConfig;

        let f = StraightStellarator::new(&StellaratorConfig::default()).unwrap();
        let h = 1e-5;
        let at = |px: f64, pz: f64| {
            let xs = array![px].into_dyn();
            let zs = array![pz].into_dyn();
            let ps = array![phi].into_dyn();
            let c = Coords::new(xs.view(), zs.view(), ps.view()).unwrap();
            (f.bx(&c)[[0]], f.bz(&c)[[0]])
        };
        let dbx = (at(x + h, z).0 - at(x - h, z).0) / (2.0 * h);
        let dbz = (at(x, z + h).1 - at(x, z - h).1) / (2.0 * h);
        prop_assert!((dbx + dbz).abs() < 1e-5, "div = {}", dbx + dbz);
    }
}
