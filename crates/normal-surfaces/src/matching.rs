//! Matching equations, angle equations and integer row reduction.
//!
//! Equations are returned as dense `DMatrix<i64>`; entries stay within
//! `-2..=2` (angle scaling column aside, which is `-2` or `-1`). Rows are
//! grouped by the skeleton face that generates them, in skeleton order.

use nalgebra::DMatrix;

use crate::coords::CoordinateSystem;
use crate::error::{Error, Result};
use crate::integer::ExactInteger;
use crate::tables::QUAD_SEPARATING;
use crate::triangulation::Triangulation;

/// Column layout of a normal or almost normal system.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Layout {
    pub per_tet: usize,
    /// Offset of quad 0 inside a block.
    pub quad: usize,
    pub triangles: bool,
    pub octagons: bool,
}

impl Layout {
    pub(crate) fn of(coords: CoordinateSystem) -> Option<Self> {
        let per_tet = coords.per_tet()?;
        if !coords.stores_quads() {
            return None;
        }
        let triangles = coords.stores_triangles();
        Some(Self {
            per_tet,
            quad: if triangles { 4 } else { 0 },
            triangles,
            octagons: coords.stores_octagons(),
        })
    }

    pub(crate) fn standard() -> Self {
        Self {
            per_tet: 7,
            quad: 4,
            triangles: true,
            octagons: false,
        }
    }

    pub(crate) fn triangle(&self, tet: usize, vertex: usize) -> usize {
        self.per_tet * tet + vertex
    }

    pub(crate) fn quad(&self, tet: usize, kind: usize) -> usize {
        self.per_tet * tet + self.quad + kind
    }

    pub(crate) fn octagon(&self, tet: usize, kind: usize) -> usize {
        self.per_tet * tet + self.quad + 3 + kind
    }

    /// Adds `coeff` to quad `kind`, and to every octagon that contains a
    /// copy of that quad's arcs.
    fn add_quad(&self, row: &mut [i64], tet: usize, kind: usize, coeff: i64) {
        row[self.quad(tet, kind)] += coeff;
        if self.octagons {
            for oct in (0..3).filter(|&o| o != kind) {
                row[self.octagon(tet, oct)] += coeff;
            }
        }
    }
}

/// Matching equations for `coords` on `tri`.
///
/// Closed variants share the equations of their spun counterparts; their
/// slope conditions are imposed separately as LP constraints.
pub fn matching_equations(tri: &Triangulation, coords: CoordinateSystem) -> Result<DMatrix<i64>> {
    if coords == CoordinateSystem::Angle {
        return Ok(angle_equations(tri));
    }
    let layout = Layout::of(coords)
        .ok_or_else(|| Error::coords(coords, "no matching equations for a view-only system"))?;
    let cols = layout.per_tet * tri.size();
    let rows = if layout.triangles {
        standard_rows(tri, &layout, cols)
    } else {
        quad_rows(tri, &layout, cols)
    };
    Ok(to_matrix(rows, cols))
}

fn standard_rows(tri: &Triangulation, layout: &Layout, cols: usize) -> Vec<Vec<i64>> {
    let mut rows = Vec::new();
    for t in tri.triangles() {
        let [a, b] = t.embeddings[..] else {
            continue;
        };
        let (p, q) = (a.vertices, b.vertices);
        for i in 0..3 {
            let mut row = vec![0; cols];
            row[layout.triangle(a.tet, p.at(i))] += 1;
            row[layout.triangle(b.tet, q.at(i))] -= 1;
            layout.add_quad(&mut row, a.tet, QUAD_SEPARATING[p.at(i)][p.at(3)], 1);
            layout.add_quad(&mut row, b.tet, QUAD_SEPARATING[q.at(i)][q.at(3)], -1);
            rows.push(row);
        }
    }
    rows
}

fn quad_rows(tri: &Triangulation, layout: &Layout, cols: usize) -> Vec<Vec<i64>> {
    let mut rows = Vec::new();
    for e in tri.edges().iter().filter(|e| !e.boundary) {
        let mut row = vec![0; cols];
        for emb in &e.embeddings {
            let p = emb.vertices;
            layout.add_quad(&mut row, emb.tet, QUAD_SEPARATING[p.at(0)][p.at(2)], 1);
            layout.add_quad(&mut row, emb.tet, QUAD_SEPARATING[p.at(0)][p.at(3)], -1);
        }
        rows.push(row);
    }
    rows
}

/// Angle equations over `3n + 1` columns (the last is the scaling
/// coordinate): angles around each internal edge sum to `2·scaling`, and
/// the three angles of each tetrahedron sum to `scaling`.
pub fn angle_equations(tri: &Triangulation) -> DMatrix<i64> {
    let n = tri.size();
    let cols = 3 * n + 1;
    let mut rows = Vec::new();
    for e in tri.edges().iter().filter(|e| !e.boundary) {
        let mut row = vec![0; cols];
        for emb in &e.embeddings {
            row[3 * emb.tet + QUAD_SEPARATING[emb.vertices.at(0)][emb.vertices.at(1)]] += 1;
        }
        row[3 * n] = -2;
        rows.push(row);
    }
    for tet in 0..n {
        let mut row = vec![0; cols];
        row[3 * tet..3 * tet + 3].fill(1);
        row[3 * n] = -1;
        rows.push(row);
    }
    to_matrix(rows, cols)
}

fn to_matrix(rows: Vec<Vec<i64>>, cols: usize) -> DMatrix<i64> {
    DMatrix::from_fn(rows.len(), cols, |r, c| rows[r][c])
}

/// Reorders the rows of `matrix` so the first `rank` rows form a basis of
/// its row space, and returns `rank`. Only whole original rows are moved.
pub fn row_basis(matrix: &mut DMatrix<i64>) -> usize {
    let cols = matrix.ncols();
    let mut echelon: Vec<Vec<ExactInteger>> = matrix
        .row_iter()
        .map(|r| r.iter().map(|&x| ExactInteger::from(x)).collect())
        .collect();
    let mut lead: Vec<usize> = (0..cols).collect();
    let mut rank = echelon.len();
    let mut done = 0;
    while done < rank {
        let Some(c) = (done..cols).find(|&c| !echelon[done][lead[c]].is_zero()) else {
            rank -= 1;
            if done < rank {
                echelon.swap(done, rank);
                matrix.swap_rows(done, rank);
            }
            continue;
        };
        lead.swap(done, c);
        let col = lead[done];
        let pivot = echelon[done][col].clone();
        for r in done + 1..rank {
            let coeff = echelon[r][col].clone();
            if coeff.is_zero() {
                continue;
            }
            let (upper, lower) = echelon.split_at_mut(r);
            reduce_against(&mut lower[0], &upper[done], &pivot, &coeff);
        }
        done += 1;
    }
    rank
}

/// `row ← pivot·row − coeff·src`, then strip the gcd.
fn reduce_against(row: &mut [ExactInteger], src: &[ExactInteger], pivot: &ExactInteger, coeff: &ExactInteger) {
    let mut g = ExactInteger::ZERO;
    for (x, s) in row.iter_mut().zip(src) {
        *x = &*x * pivot - coeff * s;
        g = g.gcd(x);
    }
    if g > 1 {
        for x in row.iter_mut() {
            *x = x.div_exact(&g);
        }
    }
}

/// Incremental echelon form: accepts rows that are independent of the
/// rows accepted so far.
#[derive(Clone, Debug, Default)]
pub struct RowReducer {
    rows: Vec<(usize, Vec<ExactInteger>)>,
}

impl RowReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rank(&self) -> usize {
        self.rows.len()
    }

    /// Reduces `row` against the accepted rows; keeps it and returns true
    /// if something non-zero remains.
    pub fn insert(&mut self, row: &[i64]) -> bool {
        let mut v: Vec<ExactInteger> = row.iter().map(|&x| ExactInteger::from(x)).collect();
        for (pivot_col, basis) in &self.rows {
            let coeff = v[*pivot_col].clone();
            if !coeff.is_zero() {
                let pivot = basis[*pivot_col].clone();
                reduce_against(&mut v, basis, &pivot, &coeff);
            }
        }
        match v.iter().position(|x| !x.is_zero()) {
            Some(col) => {
                self.rows.push((col, v));
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::examples;

    #[test]
    fn quad_equations_of_figure_eight() {
        let tri = examples::figure_eight().unwrap();
        let m = matching_equations(&tri, CoordinateSystem::Quad).unwrap();
        assert_eq!(m.shape(), (2, 6));
        // Each row sums to zero: every embedding adds +1 and -1.
        for r in m.row_iter() {
            assert_eq!(r.iter().sum::<i64>(), 0);
        }
        let mut basis = m.clone();
        assert_eq!(row_basis(&mut basis), 1);
    }

    #[test]
    fn standard_equations_count_internal_triangles() {
        let tri = examples::twisted_kxi().unwrap();
        let m = matching_equations(&tri, CoordinateSystem::Standard).unwrap();
        let internal = tri.triangles().iter().filter(|t| !t.is_boundary()).count();
        assert_eq!(m.shape(), (3 * internal, 21));
        assert!(m.iter().all(|x| (-2..=2).contains(x)));
    }

    #[test]
    fn octagons_count_as_two_quads() {
        let tri = examples::layered_loop(2, false).unwrap();
        let quad = matching_equations(&tri, CoordinateSystem::Quad).unwrap();
        let oct = matching_equations(&tri, CoordinateSystem::QuadOct).unwrap();
        for r in 0..quad.nrows() {
            for t in 0..2 {
                for k in 0..3 {
                    let expect = quad[(r, 3 * t + (k + 1) % 3)] + quad[(r, 3 * t + (k + 2) % 3)];
                    assert_eq!(oct[(r, 6 * t + 3 + k)], expect);
                }
            }
        }
    }

    #[test]
    fn view_only_systems_have_no_equations() {
        let tri = examples::ball();
        let err = matching_equations(&tri, CoordinateSystem::EdgeWeight).unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinateSystem { .. }));
    }

    #[test]
    fn angle_equations_shape() {
        let tri = examples::figure_eight().unwrap();
        let m = angle_equations(&tri);
        assert_eq!(m.shape(), (4, 7));
        assert_eq!(m[(3, 6)], -1);
        assert_eq!(m[(0, 6)], -2);
    }

    #[test]
    fn row_basis_moves_dependent_rows_last() {
        let mut m = DMatrix::from_row_slice(3, 3, &[1, 2, 3, 2, 4, 6, 0, 1, 1]);
        let rank = row_basis(&mut m);
        assert_eq!(rank, 2);
        assert_eq!(m.row(2).iter().copied().collect::<Vec<_>>(), vec![2, 4, 6]);
    }

    #[test]
    fn row_reducer_detects_dependence() {
        let mut rr = RowReducer::new();
        assert!(rr.insert(&[1, 1, 0]));
        assert!(rr.insert(&[0, 1, 1]));
        assert!(!rr.insert(&[1, 2, 1]));
        assert!(!rr.insert(&[0, 0, 0]));
        assert!(rr.insert(&[0, 0, 3]));
        assert_eq!(rr.rank(), 3);
    }
}
