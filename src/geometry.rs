//! Triangle meshes for the scene bodies and the particle field.
//!
//! Parameters and vertex layouts follow the usual scene-graph conventions, so
//! a torus built here with `(1.0, 0.4, 16, 60)` has the same shape as one
//! built anywhere else with those numbers. Triangles wind counter-clockwise
//! when seen from outside.

use crate::math::{add, cross, normalize, scale, sub};
use rand::Rng;
use std::collections::BTreeSet;
use std::f64::consts::PI;

/// Indexed triangle mesh
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub positions: Vec<[f64; 3]>,
    pub triangles: Vec<[usize; 3]>,
}

impl Geometry {
    /// Unique undirected edges, for wireframe drawing
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = BTreeSet::new();
        for &[a, b, c] in &self.triangles {
            for (start, end) in [(a, b), (b, c), (c, a)] {
                edges.insert((start.min(end), start.max(end)));
            }
        }
        edges.into_iter().collect()
    }

    /// Pushes the two triangles of the quad `a b c d`
    fn push_quad(&mut self, a: usize, b: usize, c: usize, d: usize) {
        self.triangles.push([a, b, d]);
        self.triangles.push([b, c, d]);
    }
}

pub fn torus(radius: f64, tube: f64, radial_segments: usize, tubular_segments: usize) -> Geometry {
    let mut geometry = Geometry::default();

    for j in 0..=radial_segments {
        for i in 0..=tubular_segments {
            let u = i as f64 / tubular_segments as f64 * 2.0 * PI;
            let v = j as f64 / radial_segments as f64 * 2.0 * PI;
            geometry.positions.push([
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            ]);
        }
    }

    let row = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            geometry.push_quad(a, b, c, d);
        }
    }
    geometry
}

/// A (p, q) torus knot swept by a circular tube
pub fn torus_knot(
    radius: f64,
    tube: f64,
    tubular_segments: usize,
    radial_segments: usize,
    p: u32,
    q: u32,
) -> Geometry {
    let p = p as f64;
    let q = q as f64;
    let curve = |u: f64| {
        let quotient = q / p * u;
        let cs = quotient.cos();
        [
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * u.sin() * 0.5,
            radius * quotient.sin() * 0.5,
        ]
    };

    let mut geometry = Geometry::default();
    for i in 0..=tubular_segments {
        let u = i as f64 / tubular_segments as f64 * p * PI * 2.0;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        // Frenet-like frame around the curve
        let tangent = sub(&p2, &p1);
        let mut normal = add(&p2, &p1);
        let binormal = normalize(&cross(&tangent, &normal));
        normal = normalize(&cross(&binormal, &tangent));

        for j in 0..=radial_segments {
            let v = j as f64 / radial_segments as f64 * PI * 2.0;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            geometry
                .positions
                .push(add(&p1, &add(&scale(&normal, cx), &scale(&binormal, cy))));
        }
    }

    let row = radial_segments + 1;
    for j in 1..=tubular_segments {
        for i in 1..=radial_segments {
            let a = row * (j - 1) + (i - 1);
            let b = row * j + (i - 1);
            let c = row * j + i;
            let d = row * (j - 1) + i;
            geometry.push_quad(a, b, c, d);
        }
    }
    geometry
}

pub fn octahedron(radius: f64) -> Geometry {
    let vertices = [
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ];
    let triangles = [
        [0, 2, 4],
        [0, 4, 3],
        [0, 3, 5],
        [0, 5, 2],
        [1, 2, 5],
        [1, 5, 3],
        [1, 3, 4],
        [1, 4, 2],
    ];
    polyhedron(&vertices, &triangles, radius)
}

pub fn icosahedron(radius: f64) -> Geometry {
    let t = (1.0 + 5f64.sqrt()) / 2.0;
    let vertices = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];
    let triangles = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    polyhedron(&vertices, &triangles, radius)
}

/// Projects the seed vertices onto a sphere of `radius`
fn polyhedron(vertices: &[[f64; 3]], triangles: &[[usize; 3]], radius: f64) -> Geometry {
    Geometry {
        positions: vertices
            .iter()
            .map(|v| scale(&normalize(v), radius))
            .collect(),
        triangles: triangles.to_vec(),
    }
}

/// Points scattered uniformly in a cube of side `spread` centred on the origin
pub fn particle_field<R: Rng + ?Sized>(count: usize, spread: f64, rng: &mut R) -> Vec<[f64; 3]> {
    (0..count)
        .map(|_| {
            [
                (rng.random::<f64>() - 0.5) * spread,
                (rng.random::<f64>() - 0.5) * spread,
                (rng.random::<f64>() - 0.5) * spread,
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{calculate_normal, dot};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// True when every triangle's normal points away from `inside(vertex)`
    fn faces_outward(geometry: &Geometry, inside: impl Fn(&[f64; 3]) -> [f64; 3]) -> bool {
        geometry.triangles.iter().all(|&[a, b, c]| {
            let (pa, pb, pc) = (
                &geometry.positions[a],
                &geometry.positions[b],
                &geometry.positions[c],
            );
            let normal = calculate_normal(pa, pb, pc);
            let centroid = scale(&add(&add(pa, pb), pc), 1.0 / 3.0);
            dot(&normal, &sub(&centroid, &inside(&centroid))) > 0.0
        })
    }

    #[test]
    fn torus_counts_and_winding() {
        let g = torus(1.0, 0.4, 16, 60);
        assert_eq!(g.positions.len(), 17 * 61);
        assert_eq!(g.triangles.len(), 16 * 60 * 2);
        assert!(faces_outward(&g, |p| normalize(&[p[0], p[1], 0.0])));
    }

    #[test]
    fn torus_knot_counts() {
        let g = torus_knot(0.8, 0.35, 100, 16, 2, 3);
        assert_eq!(g.positions.len(), 101 * 17);
        assert_eq!(g.triangles.len(), 100 * 16 * 2);
        assert!(g.triangles.iter().flatten().all(|&i| i < g.positions.len()));
    }

    #[test]
    fn platonic_solids_face_outward() {
        let octa = octahedron(1.0);
        assert_eq!(octa.triangles.len(), 8);
        assert!(faces_outward(&octa, |_| [0.0; 3]));

        let ico = icosahedron(1.0);
        assert_eq!(ico.triangles.len(), 20);
        assert!(faces_outward(&ico, |_| [0.0; 3]));
        for p in &ico.positions {
            assert!((dot(p, p).sqrt() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn edges_are_shared_between_neighbours() {
        assert_eq!(octahedron(1.0).edges().len(), 12);
        assert_eq!(icosahedron(1.0).edges().len(), 30);
    }

    #[test]
    fn particles_stay_inside_spread() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = particle_field(700, 10.0, &mut rng);
        assert_eq!(points.len(), 700);
        assert!(points.iter().flatten().all(|c| (-5.0..5.0).contains(c)));
    }
}
