use nalgebra::DMatrix;

use crate::constraints::LpConstraint;
use crate::coords::CoordinateSystem;
use crate::error::{Error, Result};
use crate::integer::{ExactInteger, LpInteger};
use crate::matching::{matching_equations, row_basis};
use crate::triangulation::Triangulation;

use super::LpMatrix;

/// One tableau column: matching-equation coefficients in sparse form plus
/// one coefficient per constraint row.
#[derive(Clone, Debug, Default)]
struct Column {
    entries: Vec<(usize, i64)>,
    extra: Vec<i64>,
}

/// The starting tableau shared by every `LpData` of one search.
///
/// Columns are the coordinates of the tableau system in a heuristic order
/// (`column_perm[c]` is the original coordinate of column `c`), followed by
/// one slack column per constraint row. Rows are a basis of the matching
/// equations followed by the constraint rows.
#[derive(Clone, Debug)]
pub struct InitialTableaux<'a> {
    tri: &'a Triangulation,
    system: CoordinateSystem,
    constraint: LpConstraint,
    eqns: DMatrix<i64>,
    rank: usize,
    extra: usize,
    coord_cols: usize,
    perm: Vec<usize>,
    columns: Vec<Column>,
    /// Coefficient of the angle scaling column in every row, or 0.
    scaling: i64,
}

impl<'a> InitialTableaux<'a> {
    /// Builds the tableau for `coords`. `enumeration` selects the column
    /// order used for vertex enumeration rather than single-solution
    /// searches (they differ only in standard coordinates).
    pub fn new(
        tri: &'a Triangulation,
        coords: CoordinateSystem,
        constraint: LpConstraint,
        enumeration: bool,
    ) -> Result<Self> {
        let system = coords.tableau_system();
        if !matches!(
            system,
            CoordinateSystem::Standard | CoordinateSystem::Quad | CoordinateSystem::Angle
        ) {
            return Err(Error::coords(coords, "not usable for tree traversal"));
        }
        if system != CoordinateSystem::Angle && !constraint.supported(coords) {
            return Err(Error::coords(coords, format!("constraint {constraint:?} is not supported")));
        }

        let mut eqns = matching_equations(tri, system)?;
        let mut scaling = 0;
        if system == CoordinateSystem::Angle {
            // Rescale so the scaling column reads -2 in every row.
            scaling = -2;
            for r in 0..eqns.nrows() {
                let last = eqns[(r, eqns.ncols() - 1)];
                if last != scaling && last != 0 {
                    let factor = scaling / last;
                    eqns.row_mut(r).iter_mut().for_each(|x| *x *= factor);
                }
            }
        }
        let rank = row_basis(&mut eqns);
        let coord_cols = eqns.ncols();

        let functionals = if system == CoordinateSystem::Angle {
            Vec::new()
        } else {
            constraint.functionals(tri)?
        };
        let extra = functionals.len();

        let perm = match system {
            CoordinateSystem::Angle => (0..coord_cols).collect(),
            CoordinateSystem::Standard if enumeration => {
                let quad = Self::new(tri, CoordinateSystem::Quad, LpConstraint::None, true)?;
                standard_from_quad_order(&quad.perm, tri.size())
            }
            _ => reorder(&eqns, rank, tri.size(), system == CoordinateSystem::Quad),
        };
        let eqns = DMatrix::from_fn(eqns.nrows(), coord_cols, |r, c| eqns[(r, perm[c])]);

        let mut columns = vec![Column::default(); coord_cols + extra];
        let sparse_cols = if scaling != 0 { coord_cols - 1 } else { coord_cols };
        for (c, column) in columns.iter_mut().enumerate().take(sparse_cols) {
            column.entries = (0..rank)
                .filter(|&r| eqns[(r, c)] != 0)
                .map(|r| (r, eqns[(r, c)]))
                .collect();
        }
        for (c, column) in columns.iter_mut().enumerate() {
            column.extra = if c < coord_cols {
                functionals.iter().map(|f| f[perm[c]]).collect()
            } else {
                (0..extra).map(|i| if c - coord_cols == i { -1 } else { 0 }).collect()
            };
        }

        tracing::trace!(system = %system, rank, extra, cols = coord_cols + extra, "initial tableaux");
        Ok(Self {
            tri,
            system,
            constraint,
            eqns,
            rank: rank + extra,
            extra,
            coord_cols,
            perm,
            columns,
            scaling,
        })
    }

    pub fn tri(&self) -> &'a Triangulation {
        self.tri
    }

    /// Standard, Quad or Angle.
    pub fn system(&self) -> CoordinateSystem {
        self.system
    }

    pub fn constraint(&self) -> LpConstraint {
        self.constraint
    }

    /// Rows, including one per constraint.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    pub fn coordinate_columns(&self) -> usize {
        self.coord_cols
    }

    pub fn extra_columns(&self) -> usize {
        self.extra
    }

    pub fn column_perm(&self) -> &[usize] {
        &self.perm
    }

    /// Matching rows (basis first) with columns in tableau order.
    pub fn equations(&self) -> &DMatrix<i64> {
        &self.eqns
    }

    /// Entry `(row, col)` of `ops · tableau`.
    pub fn multiply_row<I: LpInteger>(&self, ops: &LpMatrix<I>, row: usize, col: usize) -> I {
        self.multiply(ops, row, col, 0)
    }

    /// As [`Self::multiply_row`], with the constraint coefficients shifted
    /// by the octagon adjustment.
    pub fn multiply_row_oct<I: LpInteger>(&self, ops: &LpMatrix<I>, row: usize, col: usize) -> I {
        self.multiply(ops, row, col, self.constraint.octagon_adjustment())
    }

    fn multiply<I: LpInteger>(&self, ops: &LpMatrix<I>, row: usize, col: usize, adjust: i64) -> I {
        if self.scaling != 0 && col == self.coord_cols - 1 {
            return (0..self.rank).fold(I::zero(), |acc, i| acc.plus(&ops.entry(row, i).times_i64(self.scaling)));
        }
        let column = &self.columns[col];
        let base = self.rank - self.extra;
        column
            .extra
            .iter()
            .enumerate()
            .fold(ops.dot_sparse(row, &column.entries), |acc, (i, &coeff)| {
                acc.plus(&ops.entry(row, base + i).times_i64(coeff + adjust))
            })
    }

    /// Writes the dense `rank × columns` starting tableau into `m`.
    pub fn fill_initial<I: LpInteger>(&self, m: &mut LpMatrix<I>) {
        let base = self.rank - self.extra;
        for (c, column) in self.columns.iter().enumerate() {
            for &(r, v) in &column.entries {
                m.set(r, c, I::from_i64(v));
            }
            for (i, &v) in column.extra.iter().enumerate() {
                m.set(base + i, c, I::from_i64(v));
            }
        }
        if self.scaling != 0 {
            for r in 0..self.rank {
                m.set(r, self.coord_cols - 1, I::from_i64(self.scaling));
            }
        }
    }

    /// Conservative bound on every intermediate value a tableau for
    /// `coords` can reach, used to pick a native integer backend.
    pub fn worst_case_bound(&self, coords: CoordinateSystem) -> ExactInteger {
        let n = self.tri.size();
        let rank = self.rank - self.extra;
        let octagons = coords.stores_octagons();
        let max_cols_rhs = match (coords.stores_triangles(), octagons) {
            (true, false) => 5 * n,
            (true, true) => 5 * n + 1,
            (false, false) => n,
            (false, true) => n + 1,
        };
        let mut max_entry = 0i64;
        let mut max_col_sum = 0i64;
        let mut norms: Vec<i64> = Vec::with_capacity(self.coord_cols);
        for c in 0..self.coord_cols {
            let col = self.eqns.column(c);
            let rows = col.iter().take(rank);
            max_entry = max_entry.max(rows.clone().map(|x| x.abs()).max().unwrap_or(0));
            max_col_sum = max_col_sum.max(rows.clone().map(|x| x.abs()).sum());
            norms.push(rows.map(|x| x * x).sum());
        }
        norms.sort_unstable_by(|a, b| b.cmp(a));
        let mut hadamard_sq = norms
            .iter()
            .take(rank)
            .fold(ExactInteger::ONE, |acc, &x| acc * x);
        let mut col_sum = ExactInteger::from(max_col_sum);
        if octagons {
            hadamard_sq = hadamard_sq * 4;
            col_sum = col_sum * 2;
        }
        let max_rhs = ExactInteger::from(max_entry) * ExactInteger::from(max_cols_rhs);
        hadamard_sq * 2 * col_sum * ExactInteger::from(rank) * max_rhs * 4
    }
}

/// Standard columns that follow the quad column order: all quads first,
/// then the four triangles of each tetrahedron in the same tetrahedron
/// order.
fn standard_from_quad_order(quad_perm: &[usize], n: usize) -> Vec<usize> {
    let mut perm = vec![0; 7 * n];
    for i in 0..n {
        let k = quad_perm[3 * i] / 3;
        for j in 0..3 {
            perm[3 * i + j] = 7 * k + 4 + j;
        }
        for j in 0..4 {
            perm[3 * n + 4 * i + j] = 7 * k + j;
        }
    }
    perm
}

/// Column order that keeps the basis sparse: repeatedly take the unused
/// equation touching the fewest untouched tetrahedra and place those
/// tetrahedra at the back.
fn reorder(eqns: &DMatrix<i64>, rank: usize, n: usize, quad: bool) -> Vec<usize> {
    let (stride, quad_at) = if quad { (3, 0) } else { (7, 4) };
    let touches = |row: usize, k: usize| (0..3).any(|j| eqns[(row, stride * k + quad_at + j)] != 0);

    let mut perm = vec![0; stride * n];
    let mut used = vec![false; rank];
    let mut touched = vec![false; n];
    let mut n_touched = 0;
    let place = |k: usize, n_touched: &mut usize, perm: &mut Vec<usize>| {
        let pos = n - 1 - *n_touched;
        for j in 0..3 {
            perm[3 * pos + j] = stride * k + quad_at + j;
        }
        if !quad {
            for j in 0..4 {
                perm[3 * n + 4 * pos + j] = 7 * k + j;
            }
        }
        *n_touched += 1;
    };

    for _ in 0..rank {
        let mut best = n + 1;
        let mut best_row = 0;
        for row in (0..rank).filter(|&r| !used[r]) {
            let mut curr = 0;
            for k in (0..n).filter(|&k| !touched[k]) {
                if touches(row, k) {
                    curr += 1;
                }
                if curr >= best {
                    break;
                }
            }
            if curr < best {
                best = curr;
                best_row = row;
            }
        }
        used[best_row] = true;
        for k in 0..n {
            if !touched[k] && touches(best_row, k) {
                touched[k] = true;
                place(k, &mut n_touched, &mut perm);
            }
        }
    }
    for k in 0..n {
        if !touched[k] {
            touched[k] = true;
            place(k, &mut n_touched, &mut perm);
        }
    }
    perm
}
