use crate::coords::CoordinateSystem;
use crate::integer::{ExactInteger, LpInteger};

use super::{InitialTableaux, LpMatrix};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColState {
    Basic(usize),
    /// Active and non-basic.
    NonBasic,
    /// Constrained to zero.
    Inactive,
}

/// Working tableau in compact form.
///
/// Only the row operations (`row_ops`, an inverse basis scaled to integers)
/// and the right-hand side are stored; entry `(r, c)` is recomputed as
/// `row_ops[r] · column c` of the initial tableau. Whenever the tableau is
/// feasible, every basic value `rhs[r] / entry(r, basis[r])` is
/// non-negative and each row of `row_ops` has gcd 1.
#[derive(Clone, Debug)]
pub struct LpData<'a, I: LpInteger> {
    tableaux: &'a InitialTableaux<'a>,
    rhs: Vec<I>,
    row_ops: LpMatrix<I>,
    rank: usize,
    basis: Vec<usize>,
    state: Vec<ColState>,
    feasible: bool,
    /// `(primary, secondary)` quad columns standing in for an octagon.
    oct: Option<(usize, usize)>,
}

impl<'a, I: LpInteger> LpData<'a, I> {
    /// Uninitialised storage; call [`Self::init_start`] or
    /// [`Self::init_clone`] before use.
    pub fn new(tableaux: &'a InitialTableaux<'a>) -> Self {
        let rank = tableaux.rank();
        Self {
            tableaux,
            rhs: vec![I::zero(); rank],
            row_ops: LpMatrix::identity(rank),
            rank,
            basis: vec![0; rank],
            state: vec![ColState::NonBasic; tableaux.columns()],
            feasible: false,
            oct: None,
        }
    }

    pub fn tableaux(&self) -> &'a InitialTableaux<'a> {
        self.tableaux
    }

    /// Root of a search: no constraints beyond those of the tableau.
    pub fn init_start(&mut self) {
        let rank = self.tableaux.rank();
        self.row_ops = LpMatrix::identity(rank);
        self.rhs = vec![I::zero(); rank];
        self.rank = rank;
        self.oct = None;
        self.find_initial_basis();
        // A zero right-hand side is always feasible.
        self.feasible = true;
        let tableaux = self.tableaux;
        tableaux.constraint().constrain(self, tableaux.extra_columns());
    }

    /// Copies `parent` into this storage.
    pub fn init_clone(&mut self, parent: &Self) {
        self.feasible = parent.feasible;
        if !self.feasible {
            return;
        }
        self.rhs.clone_from(&parent.rhs);
        self.row_ops.clone_from(&parent.row_ops);
        self.rank = parent.rank;
        self.basis.clone_from(&parent.basis);
        self.state.clone_from(&parent.state);
        self.oct = parent.oct;
    }

    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    pub fn is_active(&self, col: usize) -> bool {
        self.state[col] != ColState::Inactive
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn octagon(&self) -> Option<(usize, usize)> {
        self.oct
    }

    /// Sign of the current value of `col` (0 unless basic).
    pub fn sign(&self, col: usize) -> i32 {
        match self.state[col] {
            ColState::Basic(r) => self.rhs[r].sign(),
            _ => 0,
        }
    }

    /// Entry `(row, col)` of the current tableau.
    pub fn entry(&self, row: usize, col: usize) -> I {
        match self.oct {
            Some((p, s)) if p == col => self
                .tableaux
                .multiply_row_oct(&self.row_ops, row, p)
                .plus(&self.tableaux.multiply_row_oct(&self.row_ops, row, s)),
            _ => self.tableaux.multiply_row(&self.row_ops, row, col),
        }
    }

    fn entry_sign(&self, row: usize, col: usize) -> i32 {
        self.entry(row, col).sign()
    }

    /// Largest-index active non-basic column whose entry in `row` passes
    /// `accept` (applied to the entry's sign).
    fn last_nonbasic(&self, row: usize, accept: impl Fn(i32) -> bool) -> Option<usize> {
        (0..self.tableaux.columns())
            .rev()
            .find(|&c| self.state[c] == ColState::NonBasic && accept(self.entry_sign(row, c)))
    }

    /// Constrains `col` to zero and deactivates it.
    pub fn constrain_zero(&mut self, col: usize) {
        if !self.is_active(col) || !self.feasible {
            return;
        }
        let mut perhaps_infeasible = false;
        if let ColState::Basic(r) = self.state[col] {
            if self.rhs[r].is_zero() {
                match self.last_nonbasic(r, |s| s != 0) {
                    Some(c) => self.pivot(col, c),
                    // The row reads x_col = 0: drop it.
                    None => self.drop_row(r),
                }
            } else {
                let Some(c) = self.last_nonbasic(r, |s| s > 0) else {
                    self.feasible = false;
                    return;
                };
                self.pivot(col, c);
                perhaps_infeasible = true;
            }
        }
        self.state[col] = ColState::Inactive;
        if perhaps_infeasible {
            self.make_feasible();
        }
    }

    /// Constrains `col` to be at least one, i.e. substitutes `x = 1 + x'`.
    pub fn constrain_positive(&mut self, col: usize) {
        if !self.is_active(col) {
            self.feasible = false;
            return;
        }
        if !self.feasible {
            return;
        }
        match self.state[col] {
            ColState::Basic(r) => {
                self.rhs[r] = self.rhs[r].minus(&self.entry(r, col));
                if self.rhs[r].sign() < 0 {
                    self.make_feasible();
                }
            }
            _ => {
                for r in 0..self.rank {
                    self.rhs[r] = self.rhs[r].minus(&self.entry(r, col));
                }
                self.make_feasible();
            }
        }
    }

    /// Replaces two quad columns by a single positive octagon column.
    pub fn constrain_oct(&mut self, quad1: usize, quad2: usize) {
        if !(self.is_active(quad1) && self.is_active(quad2)) {
            self.feasible = false;
            return;
        }
        if !self.feasible {
            return;
        }
        match (self.state[quad1], self.state[quad2]) {
            (ColState::Basic(row1), ColState::Basic(_)) => {
                self.oct = Some((quad1, quad2));
                let mut e1 = self.entry(row1, quad1);
                if !e1.is_zero() {
                    if e1.sign() < 0 {
                        e1.negate();
                        self.rhs[row1].negate();
                        self.row_ops.negate_row(row1);
                    }
                    self.eliminate(row1, quad1, &e1);
                    self.make_feasible();
                } else if let Some(c) = self.last_nonbasic(row1, |s| s != 0) {
                    self.pivot(quad1, c);
                    self.make_feasible();
                } else if !self.rhs[row1].is_zero() {
                    self.feasible = false;
                    return;
                } else {
                    self.drop_row(row1);
                    self.state[quad1] = ColState::NonBasic;
                }
                self.constrain_zero(quad2);
                self.constrain_positive(quad1);
            }
            (ColState::Basic(_), _) => {
                self.oct = Some((quad2, quad1));
                self.constrain_zero(quad1);
                self.constrain_positive(quad2);
            }
            (_, ColState::Basic(_)) => {
                self.oct = Some((quad1, quad2));
                self.constrain_zero(quad2);
                self.constrain_positive(quad1);
            }
            _ => {
                self.oct = Some((quad1, quad2));
                self.state[quad2] = ColState::Inactive;
                self.constrain_positive(quad1);
            }
        }
    }

    /// Primitive solution vector in the original coordinates of the
    /// tableau system, read from the current basis and the positivity
    /// implied by `types`.
    ///
    /// `types` follows the traversal layout: one slot per tetrahedron, then
    /// (standard systems) one per triangle type. Angle tableaux ignore it.
    pub fn extract_solution(&self, types: &[u8]) -> Vec<ExactInteger> {
        let perm = self.tableaux.column_perm();
        let coord_cols = self.tableaux.coordinate_columns();
        let n = self.tableaux.tri().size();

        let mut lcm = ExactInteger::ONE;
        for r in 0..self.rank {
            lcm = lcm.lcm(&self.entry(r, self.basis[r]).to_exact());
        }
        let mut v = vec![ExactInteger::ZERO; coord_cols];
        for r in 0..self.rank {
            let b = self.basis[r];
            if b >= coord_cols {
                continue;
            }
            let value = &lcm * &self.rhs[r].to_exact();
            v[perm[b]] = value.div_exact(&self.entry(r, b).to_exact());
        }

        if self.tableaux.system() == CoordinateSystem::Angle {
            v[3 * n] += &lcm;
        } else {
            for (i, &t) in types.iter().enumerate().take(n) {
                if (1..4).contains(&t) {
                    v[perm[3 * i + t as usize - 1]] += &lcm;
                }
            }
            for i in 3 * n..coord_cols {
                if types.get(i - 2 * n).is_some_and(|&t| t != 0) {
                    v[perm[i]] += &lcm;
                }
            }
            if let Some((p, s)) = self.oct {
                v[perm[p]] += &lcm;
                v[perm[s]] = v[perm[p]].clone();
            }
        }
        scale_down(&mut v);
        v
    }

    fn find_initial_basis(&mut self) {
        let cols = self.tableaux.columns();
        self.state.iter_mut().for_each(|s| *s = ColState::NonBasic);
        let mut tab = LpMatrix::<I>::zeros(self.rank, cols);
        self.tableaux.fill_initial(&mut tab);
        let mut ops = LpMatrix::<I>::identity(self.rank);

        let mut row = 0;
        while row < self.rank {
            let found = (0..cols).find(|&c| self.state[c] == ColState::NonBasic && !tab.entry(row, c).is_zero());
            let Some(c) = found else {
                // Dependent row: move it past the rank and retry this index.
                self.rank -= 1;
                tab.swap_rows(row, self.rank);
                ops.swap_rows(row, self.rank);
                continue;
            };
            self.basis[row] = c;
            self.state[c] = ColState::Basic(row);
            let mut base = tab.entry(row, c).clone();
            if base.sign() < 0 {
                base.negate();
                tab.negate_row(row);
                ops.negate_row(row);
            }
            for r in (0..self.rank).filter(|&r| r != row) {
                let coeff = tab.entry(r, c).clone();
                if !coeff.is_zero() {
                    let g = ops.comb_row_and_norm(&base, r, &coeff, row);
                    tab.comb_row(&base, r, &coeff, row, &g);
                }
            }
            row += 1;
        }
        self.row_ops = ops;
    }

    /// Removes basis row `r` (whose equation has become `x = 0`).
    fn drop_row(&mut self, r: usize) {
        self.rank -= 1;
        let last = self.rank;
        if r != last {
            self.rhs.swap(r, last);
            self.row_ops.swap_rows(r, last);
            self.basis[r] = self.basis[last];
            self.state[self.basis[r]] = ColState::Basic(r);
        }
    }

    /// Clears column `col` from every row but `def_row`, whose entry is
    /// `base > 0`.
    fn eliminate(&mut self, def_row: usize, col: usize, base: &I) {
        for r in (0..self.rank).filter(|&r| r != def_row) {
            let coeff = self.entry(r, col);
            if coeff.is_zero() {
                continue;
            }
            let g = self.row_ops.comb_row_and_norm(base, r, &coeff, def_row);
            let v = self.rhs[r].times(base).minus(&coeff.times(&self.rhs[def_row]));
            self.rhs[r] = v.div_exact(&g);
        }
    }

    fn pivot(&mut self, out_col: usize, in_col: usize) {
        let ColState::Basic(def_row) = self.state[out_col] else {
            debug_assert!(false, "pivot on a non-basic column");
            return;
        };
        self.state[out_col] = ColState::NonBasic;
        self.state[in_col] = ColState::Basic(def_row);
        self.basis[def_row] = in_col;

        let mut base = self.entry(def_row, in_col);
        if base.sign() < 0 {
            base.negate();
            self.rhs[def_row].negate();
            self.row_ops.negate_row(def_row);
        }
        self.eliminate(def_row, in_col, &base);
    }

    /// Dual simplex back to a feasible basis, or marks the tableau
    /// infeasible. Switches to the anti-cycling rule if a basis repeats.
    fn make_feasible(&mut self) {
        let cols = self.tableaux.columns();
        let mut curr = vec![false; cols];
        for &b in &self.basis[..self.rank] {
            curr[b] = true;
        }
        let mut old = curr.clone();
        let mut pow2: u64 = 1;
        let mut pivots: u64 = 0;
        loop {
            // Leave: the most negative basic value rhs / diagonal.
            let mut out: Option<(usize, I)> = None;
            for r in (0..self.rank).filter(|&r| self.rhs[r].sign() < 0) {
                let diag = self.entry(r, self.basis[r]);
                let better = match &out {
                    None => true,
                    Some((o, o_diag)) => self.rhs[r].times(o_diag) < self.rhs[*o].times(&diag),
                };
                if better {
                    out = Some((r, diag));
                }
            }
            let Some((out_row, _)) = out else {
                return;
            };
            let out_col = self.basis[out_row];
            let Some(in_col) = self.last_nonbasic(out_row, |s| s < 0) else {
                self.feasible = false;
                return;
            };
            self.pivot(out_col, in_col);
            curr[out_col] = false;
            curr[in_col] = true;
            if curr == old {
                tracing::trace!(pivots, "basis repeated, switching to anti-cycling");
                self.make_feasible_anti_cycling();
                return;
            }
            pivots += 1;
            if pivots == pow2 {
                old.clone_from(&curr);
                pow2 <<= 1;
            }
        }
    }

    /// Bland-style variant: leave on the largest basic column with a
    /// negative value.
    fn make_feasible_anti_cycling(&mut self) {
        loop {
            let out = (0..self.rank)
                .filter(|&r| self.rhs[r].sign() < 0)
                .max_by_key(|&r| self.basis[r]);
            let Some(out_row) = out else {
                return;
            };
            let Some(in_col) = self.last_nonbasic(out_row, |s| s < 0) else {
                self.feasible = false;
                return;
            };
            self.pivot(self.basis[out_row], in_col);
        }
    }
}

/// Divides by the gcd of all entries.
fn scale_down(v: &mut [ExactInteger]) {
    let g = v.iter().fold(ExactInteger::ZERO, |g, x| g.gcd(x));
    if g > 1 {
        for x in v.iter_mut() {
            *x = x.div_exact(&g);
        }
    }
}
