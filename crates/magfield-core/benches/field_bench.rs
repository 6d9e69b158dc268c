// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Field Query Benchmarks
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use criterion::{criterion_group, criterion_main, Criterion};
use magfield_core::field::{field_direction_flat, DegeneracyPolicy, MagneticField};
use magfield_core::geqdsk::GeqdskField;
use magfield_core::slab::CurvedSlab;
use magfield_types::config::CurvedSlabConfig;
use magfield_types::state::NamedArrays;
use ndarray::{Array1, Array2};
use std::hint::black_box;

fn positions(n: usize, x0: f64, span: f64) -> Vec<f64> {
    (0..n)
        .flat_map(|k| {
            let t = k as f64 / n as f64;
            [x0 + span * t, -0.5 * span + span * (7.0 * t).fract()]
        })
        .collect()
}

fn bench_curved_slab(c: &mut Criterion) {
    let field = CurvedSlab::new(CurvedSlabConfig::default()).unwrap();
    let pos = positions(4096, 0.5, 1.0);
    c.bench_function("curved_slab_direction_4096", |b| {
        b.iter(|| {
            field_direction_flat(&field, black_box(&pos), 0.1, DegeneracyPolicy::Error).unwrap()
        })
    });
}

fn solovev_like() -> NamedArrays {
    let (nr, nz) = (65, 65);
    let r = Array1::<f64>::linspace(1.0, 3.0, nr);
    let z = Array1::<f64>::linspace(-1.5, 1.5, nz);
    let psi = Array2::from_shape_fn((nz, nr), |(j, i)| (r[i] - 2.0).powi(2) + z[j].powi(2));
    let theta = Array1::<f64>::linspace(0.0, std::f64::consts::TAU, 65);

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

fn bench_geqdsk(c: &mut Criterion) {
    let field = GeqdskField::from_named(&solovev_like()).unwrap();
    let pos = positions(1024, 1.5, 1.0);
    c.bench_function("geqdsk_direction_1024", |b| {
        b.iter(|| {
            field_direction_flat(&field, black_box(&pos), 0.0, DegeneracyPolicy::Error).unwrap()
        })
    });
    c.bench_function("geqdsk_construct_65x65", |b| {
        let named = solovev_like();
        b.iter(|| GeqdskField::from_named(black_box(&named)).unwrap().attributes().len())
    });
}

criterion_group!(benches, bench_curved_slab, bench_geqdsk);
criterion_main!(benches);
