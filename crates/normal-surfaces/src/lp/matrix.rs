use nalgebra::DMatrix;

use crate::integer::LpInteger;

/// Dense integer matrix with the row operations the tableau needs.
#[derive(Clone, Debug, PartialEq)]
pub struct LpMatrix<I: LpInteger> {
    m: DMatrix<I>,
}

impl<I: LpInteger> LpMatrix<I> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            m: DMatrix::from_element(rows, cols, I::zero()),
        }
    }

    pub fn identity(n: usize) -> Self {
        Self {
            m: DMatrix::from_fn(n, n, |r, c| if r == c { I::one() } else { I::zero() }),
        }
    }

    pub fn rows(&self) -> usize {
        self.m.nrows()
    }

    pub fn cols(&self) -> usize {
        self.m.ncols()
    }

    #[inline]
    pub fn entry(&self, r: usize, c: usize) -> &I {
        &self.m[(r, c)]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, v: I) {
        self.m[(r, c)] = v;
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a != b {
            self.m.swap_rows(a, b);
        }
    }

    pub fn negate_row(&mut self, r: usize) {
        for x in self.m.row_mut(r).iter_mut() {
            x.negate();
        }
    }

    /// `row[dest] ← (dest_coeff·row[dest] − src_coeff·row[src]) / div`,
    /// where the division is known to be exact.
    pub fn comb_row(&mut self, dest_coeff: &I, dest: usize, src_coeff: &I, src: usize, div: &I) {
        debug_assert_ne!(dest, src);
        for c in 0..self.cols() {
            let v = self.m[(dest, c)].times(dest_coeff).minus(&self.m[(src, c)].times(src_coeff));
            self.m[(dest, c)] = v.div_exact(div);
        }
    }

    /// `row[dest] ← dest_coeff·row[dest] − src_coeff·row[src]`, then divides
    /// the row by the gcd of its entries. Returns that gcd (zero for a zero
    /// row); signs are never flipped.
    pub fn comb_row_and_norm(&mut self, dest_coeff: &I, dest: usize, src_coeff: &I, src: usize) -> I {
        debug_assert_ne!(dest, src);
        let mut g = I::zero();
        for c in 0..self.cols() {
            let v = self.m[(dest, c)].times(dest_coeff).minus(&self.m[(src, c)].times(src_coeff));
            if g != I::one() {
                g = g.gcd_with(&v);
            }
            self.m[(dest, c)] = v;
        }
        if g > I::one() {
            for c in 0..self.cols() {
                let v = self.m[(dest, c)].div_exact(&g);
                self.m[(dest, c)] = v;
            }
        }
        g
    }

    /// `row · column` for a sparse column given as `(row, coeff)` pairs.
    pub(crate) fn dot_sparse(&self, r: usize, column: &[(usize, i64)]) -> I {
        column
            .iter()
            .fold(I::zero(), |acc, &(k, coeff)| acc.plus(&self.m[(r, k)].times_i64(coeff)))
    }
}
