//! Combinatorial tables for normal discs inside a single tetrahedron.
//!
//! Vertex labels are 0..3. Edge `e` joins `EDGE_VERTEX[e]`. Quad type `k`
//! splits the vertices into the pairs `QUAD_DEFN[k][0..2]` and
//! `QUAD_DEFN[k][2..4]`; octagon type `k` meets both edges of that split
//! twice and behaves, for arcs and edge weights, like quads `k+1` and `k+2`
//! (mod 3) together.

use crate::perm::Perm4;

/// Endpoints of each tetrahedron edge.
pub const EDGE_VERTEX: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// Edge number joining two distinct vertices (diagonal unused).
pub const EDGE_NUMBER: [[usize; 4]; 4] = [[0, 0, 1, 2], [0, 0, 3, 4], [1, 3, 0, 5], [2, 4, 5, 0]];

/// Vertex pairs kept together by each quad type.
pub const QUAD_DEFN: [[usize; 4]; 3] = [[0, 1, 2, 3], [0, 2, 1, 3], [0, 3, 1, 2]];

/// Quad type that keeps vertices `i` and `j` on the same side (diagonal unused).
pub const QUAD_SEPARATING: [[usize; 4]; 4] = [[0, 0, 1, 2], [0, 0, 2, 1], [1, 2, 0, 0], [2, 1, 0, 0]];

/// The two quad types that cross the edge joining `i` and `j`.
pub const QUAD_MEETING: [[[usize; 2]; 4]; 4] = [
    [[0, 0], [1, 2], [0, 2], [0, 1]],
    [[1, 2], [0, 0], [0, 1], [0, 2]],
    [[0, 2], [0, 1], [0, 0], [1, 2]],
    [[0, 1], [0, 2], [1, 2], [0, 0]],
];

/// Quad types whose sum has the arcs and edge weights of octagon type `k`.
#[inline]
pub fn octagon_quads(k: usize) -> [usize; 2] {
    [(k + 1) % 3, (k + 2) % 3]
}

/// Vertex embedding for an edge: images 0, 1 are the endpoints and the
/// permutation is even.
pub fn edge_ordering(edge: usize) -> Perm4 {
    let [a, b] = EDGE_VERTEX[edge];
    let mut rest = (0..4).filter(|&v| v != a && v != b);
    let c = rest.next().unwrap_or(0);
    let d = rest.next().unwrap_or(0);
    let p = Perm4::from_images([a as u8, b as u8, c as u8, d as u8]).unwrap_or_default();
    if p.sign() < 0 {
        p * Perm4::transposition(2, 3)
    } else {
        p
    }
}

/// Vertex embedding for a face: images 0..3 are the face vertices in
/// increasing order and image 3 is the opposite vertex.
pub fn triangle_ordering(face: usize) -> Perm4 {
    let mut images = [0u8; 4];
    let mut next = 0;
    for v in (0..4).filter(|&v| v != face) {
        images[next] = v as u8;
        next += 1;
    }
    images[3] = face as u8;
    Perm4::from_images(images).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_tables_are_consistent() {
        for (k, defn) in QUAD_DEFN.iter().enumerate() {
            assert_eq!(QUAD_SEPARATING[defn[0]][defn[1]], k);
            assert_eq!(QUAD_SEPARATING[defn[2]][defn[3]], k);
        }
        for i in 0..4 {
            for j in 0..4 {
                if i == j {
                    continue;
                }
                let meet = QUAD_MEETING[i][j];
                assert!(!meet.contains(&QUAD_SEPARATING[i][j]));
                assert_ne!(meet[0], meet[1]);
                assert_eq!(EDGE_VERTEX[EDGE_NUMBER[i][j]], [i.min(j), i.max(j)]);
            }
        }
    }

    #[test]
    fn orderings_put_face_vertices_first() {
        for e in 0..6 {
            let p = edge_ordering(e);
            assert_eq!([p.at(0), p.at(1)], EDGE_VERTEX[e]);
            assert_eq!(p.sign(), 1);
        }
        for f in 0..4 {
            let p = triangle_ordering(f);
            assert_eq!(p.at(3), f);
            assert!(p.at(0) < p.at(1) && p.at(1) < p.at(2));
        }
    }
}
