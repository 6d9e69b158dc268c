// ─────────────────────────────────────────────────────────────────────
// SCPN MagField — Scattered Interpolation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Linear interpolation of scattered 2D samples.
//!
//! Points are de-duplicated, triangulated with the Bowyer–Watson algorithm,
//! and queries are answered with barycentric weights on the enclosing
//! triangle. Queries outside the triangulated hull receive a fill value.
//!
//! Building a [`ScatterInterpolator`] is the expensive part; the weights for a
//! fixed set of target points can be computed once with
//! [`ScatterInterpolator::stencil`] and applied to several sample sets.

use magfield_types::error::{FieldError, FieldResult};
use std::collections::HashMap;

/// Points closer than this fraction of the bounding-box extent are merged.
const MERGE_TOLERANCE: f64 = 1e-10;

/// Relative slack allowed on barycentric coordinates at triangle edges.
const BARYCENTRIC_EPS: f64 = 1e-10;

/// Size of the Bowyer–Watson super-triangle relative to the point extent.
const SUPER_TRIANGLE_SCALE: f64 = 100.0;

#[derive(Debug, Clone, Copy)]
pub struct Triangle2D {
    pub vertices: [usize; 3],
    circumcenter: (f64, f64),
    circumradius_sq: f64,
}

/// 2D Delaunay triangulation.
#[derive(Debug, Clone)]
pub struct Delaunay2D {
    pub points: Vec<(f64, f64)>,
    pub triangles: Vec<Triangle2D>,
}

impl Delaunay2D {
    /// Triangulate distinct points. Fewer than three points yield no triangles.
    pub fn triangulate(points: Vec<(f64, f64)>) -> Self {
        let mut delaunay = Self {
            points,
            triangles: Vec::new(),
        };
        if delaunay.points.len() >= 3 {
            delaunay.bowyer_watson();
        }
        delaunay
    }

    fn bowyer_watson(&mut self) {
        let (min_x, max_x, min_y, max_y) = bounding_box(&self.points);
        let d_max = (max_x - min_x).max(max_y - min_y).max(f64::MIN_POSITIVE) * SUPER_TRIANGLE_SCALE;
        let mid_x = 0.5 * (min_x + max_x);
        let mid_y = 0.5 * (min_y + max_y);

        let n = self.points.len();
        self.points.push((mid_x - d_max, mid_y - d_max));
        self.points.push((mid_x + d_max, mid_y - d_max));
        self.points.push((mid_x, mid_y + d_max));
        self.triangles.push(self.make_triangle(n, n + 1, n + 2));

        for i in 0..n {
            self.add_point(i);
        }

        self.triangles
            .retain(|t| t.vertices.iter().all(|&v| v < n));
        self.points.truncate(n);
    }

    fn add_point(&mut self, point_idx: usize) {
        let p = self.points[point_idx];

        let mut bad = vec![false; self.triangles.len()];
        for (i, tri) in self.triangles.iter().enumerate() {
            bad[i] = point_in_circumcircle(p, tri);
        }

        // Keep only the cavity component around the triangle holding `p`, so
        // round-off on cocircular points cannot split the cavity.
        if let Some(start) = (0..self.triangles.len())
            .find(|&i| bad[i] && self.triangle_contains(&self.triangles[i], p))
        {
            let mut edge_owners: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
            for (i, tri) in self.triangles.iter().enumerate() {
                if bad[i] {
                    for (a, b) in edges(tri) {
                        edge_owners.entry((a.min(b), a.max(b))).or_default().push(i);
                    }
                }
            }
            let mut in_cavity = vec![false; self.triangles.len()];
            let mut stack = vec![start];
            in_cavity[start] = true;
            while let Some(t) = stack.pop() {
                for (a, b) in edges(&self.triangles[t]) {
                    for &n in &edge_owners[&(a.min(b), a.max(b))] {
                        if !in_cavity[n] {
                            in_cavity[n] = true;
                            stack.push(n);
                        }
                    }
                }
            }
            bad = in_cavity;
        }

        let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();
        for (i, tri) in self.triangles.iter().enumerate() {
            if bad[i] {
                for (a, b) in edges(tri) {
                    *edge_count.entry((a.min(b), a.max(b))).or_insert(0) += 1;
                }
            }
        }

        // Boundary of the cavity: edges of bad triangles not shared with another bad one.
        let mut polygon = Vec::new();
        for (i, tri) in self.triangles.iter().enumerate() {
            if !bad[i] {
                continue;
            }
            for (a, b) in edges(tri) {
                if edge_count.get(&(a.min(b), a.max(b))) == Some(&1) {
                    polygon.push((a, b));
                }
            }
        }

        let mut idx = 0;
        self.triangles.retain(|_| {
            let keep = !bad[idx];
            idx += 1;
            keep
        });

        for (v0, v1) in polygon {
            let tri = self.make_triangle(v0, v1, point_idx);
            self.triangles.push(tri);
        }
    }

    /// Inclusive point-in-triangle test, independent of vertex orientation.
    fn triangle_contains(&self, tri: &Triangle2D, p: (f64, f64)) -> bool {
        let [a, b, c] = tri.vertices.map(|v| self.points[v]);
        let d1 = orient(a, b, p);
        let d2 = orient(b, c, p);
        let d3 = orient(c, a, p);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }

    fn make_triangle(&self, i0: usize, i1: usize, i2: usize) -> Triangle2D {
        let p0 = self.points[i0];
        let p1 = self.points[i1];
        let p2 = self.points[i2];

        let d = 2.0 * (p0.0 * (p1.1 - p2.1) + p1.0 * (p2.1 - p0.1) + p2.0 * (p0.1 - p1.1));
        let s0 = p0.0 * p0.0 + p0.1 * p0.1;
        let s1 = p1.0 * p1.0 + p1.1 * p1.1;
        let s2 = p2.0 * p2.0 + p2.1 * p2.1;

        let (cx, cy) = if d.abs() > f64::EPSILON * (s0 + s1 + s2).max(1.0) {
            (
                (s0 * (p1.1 - p2.1) + s1 * (p2.1 - p0.1) + s2 * (p0.1 - p1.1)) / d,
                (s0 * (p2.0 - p1.0) + s1 * (p0.0 - p2.0) + s2 * (p1.0 - p0.0)) / d,
            )
        } else {
            ((p0.0 + p1.0 + p2.0) / 3.0, (p0.1 + p1.1 + p2.1) / 3.0)
        };

        let dx = p0.0 - cx;
        let dy = p0.1 - cy;
        Triangle2D {
            vertices: [i0, i1, i2],
            circumcenter: (cx, cy),
            circumradius_sq: dx * dx + dy * dy,
        }
    }
}

fn edges(tri: &Triangle2D) -> [(usize, usize); 3] {
    let [a, b, c] = tri.vertices;
    [(a, b), (b, c), (c, a)]
}

fn orient(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> f64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

fn point_in_circumcircle(p: (f64, f64), tri: &Triangle2D) -> bool {
    let dx = p.0 - tri.circumcenter.0;
    let dy = p.1 - tri.circumcenter.1;
    dx * dx + dy * dy < tri.circumradius_sq
}

fn bounding_box(points: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(x0, x1, y0, y1), &(x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
    )
}

/// Barycentric weights of one target point on its enclosing triangle.
pub type StencilEntry = Option<([usize; 3], [f64; 3])>;

/// Uniform bucket grid over triangle bounding boxes.
#[derive(Debug, Clone)]
struct TriangleLocator {
    x0: f64,
    y0: f64,
    cell_x: f64,
    cell_y: f64,
    nbx: usize,
    nby: usize,
    buckets: Vec<Vec<usize>>,
}

impl TriangleLocator {
    fn new(tri: &Delaunay2D) -> Self {
        let (min_x, max_x, min_y, max_y) = bounding_box(&tri.points);
        let nb = ((tri.triangles.len() as f64 / 2.0).sqrt().ceil() as usize).max(1);
        let cell_x = ((max_x - min_x) / nb as f64).max(f64::MIN_POSITIVE);
        let cell_y = ((max_y - min_y) / nb as f64).max(f64::MIN_POSITIVE);
        let mut locator = TriangleLocator {
            x0: min_x,
            y0: min_y,
            cell_x,
            cell_y,
            nbx: nb,
            nby: nb,
            buckets: vec![Vec::new(); nb * nb],
        };
        for (t_idx, t) in tri.triangles.iter().enumerate() {
            let pts = t.vertices.map(|v| tri.points[v]);
            let (tx0, tx1, ty0, ty1) = bounding_box(&pts);
            let (i0, j0) = locator.cell(tx0, ty0);
            let (i1, j1) = locator.cell(tx1, ty1);
            for j in j0..=j1 {
                for i in i0..=i1 {
                    locator.buckets[j * locator.nbx + i].push(t_idx);
                }
            }
        }
        locator
    }

    fn cell(&self, x: f64, y: f64) -> (usize, usize) {
        let i = ((x - self.x0) / self.cell_x).floor().max(0.0) as usize;
        let j = ((y - self.y0) / self.cell_y).floor().max(0.0) as usize;
        (i.min(self.nbx - 1), j.min(self.nby - 1))
    }

    fn candidates(&self, x: f64, y: f64) -> &[usize] {
        let (i, j) = self.cell(x, y);
        &self.buckets[j * self.nbx + i]
    }
}

/// Piecewise-linear interpolant over a Delaunay triangulation of scattered points.
#[derive(Debug, Clone)]
pub struct ScatterInterpolator {
    tri: Delaunay2D,
    /// For each unique vertex, the index of the first input point that produced it.
    representative: Vec<usize>,
    n_input: usize,
    locator: TriangleLocator,
    bbox: (f64, f64, f64, f64),
}

impl ScatterInterpolator {
    pub fn new(points: &[(f64, f64)]) -> FieldResult<Self> {
        if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(FieldError::PhysicsViolation(
                "scattered points must be finite".to_string(),
            ));
        }
        let bbox = bounding_box(points);
        let extent = (bbox.1 - bbox.0).max(bbox.3 - bbox.2);
        if !(extent > 0.0) {
            return Err(FieldError::ShapeMismatch(format!(
                "scattered interpolation needs at least 3 distinct points, got {}",
                points.len()
            )));
        }

        let tol = extent * MERGE_TOLERANCE;
        let mut seen: HashMap<(i64, i64), usize> = HashMap::with_capacity(points.len());
        let mut unique = Vec::with_capacity(points.len());
        let mut representative = Vec::with_capacity(points.len());
        for (idx, &(x, y)) in points.iter().enumerate() {
            let key = (
                ((x - bbox.0) / tol).round() as i64,
                ((y - bbox.2) / tol).round() as i64,
            );
            if let std::collections::hash_map::Entry::Vacant(e) = seen.entry(key) {
                e.insert(unique.len());
                unique.push((x, y));
                representative.push(idx);
            }
        }

        let tri = Delaunay2D::triangulate(unique);
        if tri.triangles.is_empty() {
            return Err(FieldError::ShapeMismatch(format!(
                "scattered points are collinear or too few to triangulate ({} unique)",
                tri.points.len()
            )));
        }
        log::debug!(
            "triangulated {} scattered points ({} unique) into {} triangles",
            points.len(),
            tri.points.len(),
            tri.triangles.len()
        );
        let locator = TriangleLocator::new(&tri);

        Ok(ScatterInterpolator {
            tri,
            representative,
            n_input: points.len(),
            locator,
            bbox,
        })
    }

    pub fn triangulation(&self) -> &Delaunay2D {
        &self.tri
    }

    /// Enclosing triangle (as input point indices) and barycentric weights.
    pub fn locate(&self, x: f64, y: f64) -> StencilEntry {
        let (x0, x1, y0, y1) = self.bbox;
        if !(x0..=x1).contains(&x) || !(y0..=y1).contains(&y) {
            return None;
        }
        for &t_idx in self.locator.candidates(x, y) {
            let [ia, ib, ic] = self.tri.triangles[t_idx].vertices;
            let (a, b, c) = (self.tri.points[ia], self.tri.points[ib], self.tri.points[ic]);
            let det = (b.1 - c.1) * (a.0 - c.0) + (c.0 - b.0) * (a.1 - c.1);
            if det.abs() <= f64::EPSILON * ((a.0 - c.0).abs() + (a.1 - c.1).abs()).powi(2) {
                continue;
            }
            let l1 = ((b.1 - c.1) * (x - c.0) + (c.0 - b.0) * (y - c.1)) / det;
            let l2 = ((c.1 - a.1) * (x - c.0) + (a.0 - c.0) * (y - c.1)) / det;
            let l3 = 1.0 - l1 - l2;
            if l1 >= -BARYCENTRIC_EPS && l2 >= -BARYCENTRIC_EPS && l3 >= -BARYCENTRIC_EPS {
                return Some((
                    [
                        self.representative[ia],
                        self.representative[ib],
                        self.representative[ic],
                    ],
                    [l1, l2, l3],
                ));
            }
        }
        None
    }

    /// Weights for a fixed set of target points, reusable across sample sets.
    pub fn stencil(&self, targets: &[(f64, f64)]) -> Vec<StencilEntry> {
        targets.iter().map(|&(x, y)| self.locate(x, y)).collect()
    }

    /// Apply a stencil to samples given per input point.
    pub fn apply(
        &self,
        stencil: &[StencilEntry],
        values: &[f64],
        fill_value: f64,
    ) -> FieldResult<Vec<f64>> {
        if values.len() != self.n_input {
            return Err(FieldError::ShapeMismatch(format!(
                "scattered values length {} does not match {} input points",
                values.len(),
                self.n_input
            )));
        }
        Ok(stencil
            .iter()
            .map(|entry| match entry {
                Some((idx, w)) => w[0] * values[idx[0]] + w[1] * values[idx[1]] + w[2] * values[idx[2]],
                None => fill_value,
            })
            .collect())
    }

    /// One-shot interpolation of `values` at `targets`.
    pub fn interpolate(
        &self,
        values: &[f64],
        targets: &[(f64, f64)],
        fill_value: f64,
    ) -> FieldResult<Vec<f64>> {
        let stencil = self.stencil(targets);
        self.apply(&stencil, values, fill_value)
    }
}
