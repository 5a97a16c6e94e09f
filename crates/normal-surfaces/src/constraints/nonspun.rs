//! Slope conditions that separate compact surfaces from spun ones.
//!
//! In quad coordinates the triangle counts are implicit. Crossing face `f`
//! from corner `(A, v)` to corner `(B, g v)` changes the number of
//! triangles at that corner by `q[A, sep(v, f)] - q[B, sep(g v, g f)]`
//! (the standard matching equation for the arc at `v`). A quad vector
//! extends to a finite standard vector exactly when these shifts sum to
//! zero around every cycle of every vertex link.

use std::collections::VecDeque;

use crate::coords::CoordinateSystem;
use crate::error::Result;
use crate::matching::{matching_equations, RowReducer};
use crate::tables::QUAD_SEPARATING;
use crate::triangulation::Triangulation;

/// Independent cycle functionals over quad coordinates (3 per
/// tetrahedron). Functionals implied by the quad matching equations are
/// dropped, so closed triangulations get none.
pub fn slope_functionals(tri: &Triangulation) -> Result<Vec<Vec<i64>>> {
    let n = tri.size();
    let mut reducer = RowReducer::new();
    for row in matching_equations(tri, CoordinateSystem::Quad)?.row_iter() {
        let row: Vec<i64> = row.iter().copied().collect();
        reducer.insert(&row);
    }

    let mut kept = Vec::new();
    let mut potential: Vec<Option<Vec<i64>>> = vec![None; 4 * n];
    for vertex in tri.vertices() {
        let start = vertex.embeddings[0];
        let root = 4 * start.tet + start.vertices.at(0);
        potential[root] = Some(vec![0; 3 * n]);
        let mut queue = VecDeque::from([(start.tet, start.vertices.at(0))]);
        while let Some((a, v)) = queue.pop_front() {
            let Some(here) = potential[4 * a + v].clone() else {
                continue;
            };
            for f in (0..4).filter(|&f| f != v) {
                let Some(g) = tri.adjacent(a, f) else {
                    continue;
                };
                let (b, w) = (g.tet, g.perm.at(v));
                let mut shifted = here.clone();
                shifted[3 * a + QUAD_SEPARATING[v][f]] += 1;
                shifted[3 * b + QUAD_SEPARATING[w][g.perm.at(f)]] -= 1;
                match &potential[4 * b + w] {
                    None => {
                        potential[4 * b + w] = Some(shifted);
                        queue.push_back((b, w));
                    }
                    Some(there) => {
                        let cycle: Vec<i64> = shifted.iter().zip(there).map(|(x, y)| x - y).collect();
                        if cycle.iter().any(|&x| x != 0) && reducer.insert(&cycle) {
                            kept.push(cycle);
                        }
                    }
                }
            }
        }
    }
    tracing::trace!(functionals = kept.len(), "slope functionals");
    Ok(kept)
}
