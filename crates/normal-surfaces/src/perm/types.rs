use std::cmp::Ordering;
use std::fmt;
use std::ops::Mul;

/// A permutation of `{0, .., N-1}`, `N <= 5`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Perm<const N: usize> {
    code: u16,
}

pub type Perm3 = Perm<3>;
pub type Perm4 = Perm<4>;
pub type Perm5 = Perm<5>;

const fn factorial(n: usize) -> usize {
    let mut acc = 1;
    let mut i = 2;
    while i <= n {
        acc *= i;
        i += 1;
    }
    acc
}

impl<const N: usize> Perm<N> {
    /// Number of permutations of N elements.
    pub const COUNT: usize = factorial(N);

    pub const fn identity() -> Self {
        let mut code = 0u16;
        let mut i = 0;
        while i < N {
            code |= (i as u16) << (3 * i);
            i += 1;
        }
        Self { code }
    }

    /// Builds a permutation from its images, or `None` if they are not a
    /// bijection of `{0, .., N-1}`.
    pub fn from_images(images: [u8; N]) -> Option<Self> {
        let mut seen = [false; N];
        for &img in &images {
            let i = img as usize;
            if i >= N || seen[i] {
                return None;
            }
            seen[i] = true;
        }
        Some(Self::pack(&images))
    }

    fn pack(images: &[u8; N]) -> Self {
        let code = images
            .iter()
            .enumerate()
            .fold(0u16, |acc, (i, &img)| acc | (u16::from(img) << (3 * i)));
        Self { code }
    }

    /// Image of `i`.
    #[inline]
    pub fn at(self, i: usize) -> usize {
        debug_assert!(i < N);
        ((self.code >> (3 * i)) & 7) as usize
    }

    pub fn images(self) -> [u8; N] {
        let mut out = [0u8; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.at(i) as u8;
        }
        out
    }

    /// Preimage of `i`.
    pub fn pre(self, i: usize) -> usize {
        (0..N).find(|&j| self.at(j) == i).unwrap_or(i)
    }

    pub fn inverse(self) -> Self {
        let mut out = [0u8; N];
        for i in 0..N {
            out[self.at(i)] = i as u8;
        }
        Self::pack(&out)
    }

    /// +1 for even permutations, -1 for odd.
    pub fn sign(self) -> i32 {
        let mut inversions = 0;
        for i in 0..N {
            for j in i + 1..N {
                if self.at(i) > self.at(j) {
                    inversions += 1;
                }
            }
        }
        if inversions % 2 == 0 {
            1
        } else {
            -1
        }
    }

    /// Position among all N! permutations in lexicographic order of images.
    pub fn index(self) -> usize {
        let mut idx = 0;
        for i in 0..N {
            let smaller_later = (i + 1..N).filter(|&j| self.at(j) < self.at(i)).count();
            idx += smaller_later * factorial(N - 1 - i);
        }
        idx
    }

    /// Inverse of [`Perm::index`].
    ///
    /// # Panics
    /// If `k >= N!`.
    pub fn at_index(k: usize) -> Self {
        assert!(k < Self::COUNT, "permutation index {k} out of range for S{N}");
        let mut remaining: Vec<u8> = (0..N as u8).collect();
        let mut out = [0u8; N];
        let mut k = k;
        for (i, slot) in out.iter_mut().enumerate() {
            let f = factorial(N - 1 - i);
            *slot = remaining.remove(k / f);
            k %= f;
        }
        Self::pack(&out)
    }

    /// Swaps `a` and `b`.
    pub fn transposition(a: usize, b: usize) -> Self {
        let mut out = Self::identity().images();
        out.swap(a, b);
        Self::pack(&out)
    }

    /// The same permutation acting on `{0, .., M-1}`, fixing `N..M`.
    pub fn extend<const M: usize>(self) -> Perm<M> {
        assert!(N <= M, "cannot extend S{N} into S{M}");
        let mut out = Perm::<M>::identity().images();
        for (i, slot) in out.iter_mut().enumerate().take(N) {
            *slot = self.at(i) as u8;
        }
        Perm::<M>::pack(&out)
    }

    /// All permutations in lexicographic order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self::at_index)
    }
}

impl<const N: usize> Default for Perm<N> {
    fn default() -> Self {
        Self::identity()
    }
}

/// Composition, right to left: `(p * q).at(i) == p.at(q.at(i))`.
impl<const N: usize> Mul for Perm<N> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [0u8; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.at(rhs.at(i)) as u8;
        }
        Self::pack(&out)
    }
}

impl<const N: usize> Ord for Perm<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.images().cmp(&other.images())
    }
}

impl<const N: usize> PartialOrd for Perm<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const N: usize> fmt::Display for Perm<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..N {
            write!(f, "{}", self.at(i))?;
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for Perm<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Perm<{N}>({self})")
    }
}
