//! Small named triangulations used by tests, benches and the CLI.
//!
//! All constructors go through `Triangulation::from_gluings`, so a typo in a
//! table shows up as a `Gluing` error rather than an asymmetric gluing.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::perm::Perm4;

use super::Triangulation;

/// No tetrahedra.
pub fn empty() -> Triangulation {
    Triangulation::new(0)
}

/// One tetrahedron with all four faces on the boundary.
pub fn ball() -> Triangulation {
    Triangulation::new(1)
}

/// Layered loop of `len` tetrahedra. The untwisted loop of length 1 is a
/// one-tetrahedron 3-sphere with two vertices; length 2 is the closed
/// manifold C(2) (real projective space). Twisted loops have a single
/// vertex; the twisted loop of length `n` is the quaternionic space
/// S³/Q₄ₙ.
pub fn layered_loop(len: usize, twisted: bool) -> Result<Triangulation> {
    let mut gluings = Vec::with_capacity(2 * len);
    for i in 0..len {
        let next = (i + 1) % len;
        if next == 0 && twisted {
            gluings.push((i, 0, 0, [2, 3, 1, 0]));
            gluings.push((i, 3, 0, [3, 2, 0, 1]));
        } else {
            gluings.push((i, 0, next, [1, 0, 2, 3]));
            gluings.push((i, 3, next, [0, 1, 3, 2]));
        }
    }
    Triangulation::from_gluings(len, &gluings)
}

/// Two-tetrahedron ideal triangulation of the figure-eight knot complement.
pub fn figure_eight() -> Result<Triangulation> {
    Triangulation::from_gluings(
        2,
        &[
            (0, 0, 1, [1, 3, 0, 2]),
            (0, 1, 1, [2, 0, 3, 1]),
            (0, 2, 1, [0, 3, 2, 1]),
            (0, 3, 1, [2, 1, 0, 3]),
        ],
    )
}

/// One-tetrahedron ideal triangulation of the Gieseking manifold
/// (non-orientable).
pub fn gieseking() -> Result<Triangulation> {
    Triangulation::from_gluings(1, &[(0, 0, 0, [1, 2, 0, 3]), (0, 2, 0, [0, 2, 3, 1])])
}

/// Two-tetrahedron, two-vertex triangulation of the lens space L(3,1).
/// Besides the two vertex links it holds normal spheres that are not
/// vertex linking, so it is not 0-efficient.
pub fn lens_3_1() -> Result<Triangulation> {
    Triangulation::from_gluings(
        2,
        &[
            (0, 0, 1, [1, 3, 0, 2]),
            (0, 1, 1, [1, 2, 3, 0]),
            (0, 2, 1, [1, 2, 3, 0]),
            (0, 3, 1, [1, 2, 3, 0]),
        ],
    )
}

/// Three-tetrahedron twisted I-bundle over the Klein bottle, with Klein
/// bottle boundary.
pub fn twisted_kxi() -> Result<Triangulation> {
    Triangulation::from_gluings(
        3,
        &[
            (0, 0, 1, [0, 1, 2, 3]),
            (0, 1, 2, [2, 1, 0, 3]),
            (0, 2, 2, [1, 3, 2, 0]),
            (1, 1, 2, [0, 3, 2, 1]),
            (1, 2, 2, [3, 1, 0, 2]),
        ],
    )
}

/// Seeded random closed orientable gluing of `n` tetrahedra.
///
/// Faces are paired at random and glued by odd permutations, so every
/// gluing reverses orientation and the result is orientable with valid
/// edges. Vertex links may still fail to be spheres (ideal vertices).
pub fn random_closed(n: usize, seed: u64) -> Triangulation {
    let mut rng = StdRng::seed_from_u64(seed);
    let odd: Vec<Perm4> = Perm4::all().filter(|p| p.sign() < 0).collect();
    let mut faces: Vec<(usize, usize)> = (0..n).flat_map(|t| (0..4).map(move |f| (t, f))).collect();
    faces.shuffle(&mut rng);
    let mut tri = Triangulation::new(n);
    for pair in faces.chunks(2) {
        let &[(tet, face), (adj, adj_face)] = pair else {
            continue;
        };
        // Any odd permutation sending `face` to `adj_face`.
        let choices: Vec<Perm4> = odd.iter().copied().filter(|p| p.at(face) == adj_face).collect();
        let perm = choices[rng.gen_range(0..choices.len())];
        if tri.join(tet, face, adj, perm).is_err() {
            tracing::warn!(tet, face, adj, "random gluing rejected");
        }
    }
    tri
}
