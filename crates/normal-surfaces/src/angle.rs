//! Angle structures: three angles per tetrahedron, stored as integers over
//! a common scaling coordinate.

use std::fmt;
use std::sync::Arc;

use num_rational::BigRational;
use num_traits::Zero;

use crate::integer::ExactInteger;
use crate::triangulation::Triangulation;

/// `3n + 1` integers; angle `3·tet + k` sits opposite the edges kept
/// together by quad type `k`, and the last entry is the scaling coordinate.
#[derive(Clone, PartialEq)]
pub struct AngleStructure {
    tri: Arc<Triangulation>,
    vector: Vec<ExactInteger>,
}

impl AngleStructure {
    pub fn new(tri: Arc<Triangulation>, vector: Vec<ExactInteger>) -> Self {
        debug_assert_eq!(vector.len(), 3 * tri.size() + 1);
        Self { tri, vector }
    }

    pub fn triangulation(&self) -> &Arc<Triangulation> {
        &self.tri
    }

    pub fn vector(&self) -> &[ExactInteger] {
        &self.vector
    }

    pub fn scaling(&self) -> &ExactInteger {
        &self.vector[self.vector.len() - 1]
    }

    /// Angle `k` of `tet` as a multiple of π. Zero when the scaling
    /// coordinate is zero.
    pub fn angle(&self, tet: usize, k: usize) -> BigRational {
        let scale = self.scaling();
        if scale.is_zero() {
            return BigRational::zero();
        }
        BigRational::new(self.vector[3 * tet + k].to_bigint(), scale.to_bigint())
    }

    /// Every angle is 0 or π.
    pub fn is_taut(&self) -> bool {
        let scale = self.scaling();
        self.angles().iter().all(|a| a.is_zero() || a == scale)
    }

    /// Every angle lies strictly between 0 and π.
    pub fn is_strict(&self) -> bool {
        let scale = self.scaling();
        self.angles().iter().all(|a| !a.is_zero() && a < scale)
    }

    fn angles(&self) -> &[ExactInteger] {
        &self.vector[..self.vector.len() - 1]
    }
}

impl fmt::Debug for AngleStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AngleStructure({self})")
    }
}

/// Tetrahedron blocks separated by ` | `, then `; ` and the scaling.
impl fmt::Display for AngleStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.angles().chunks(3).enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{} {} {}", block[0], block[1], block[2])?;
        }
        write!(f, "; {}", self.scaling())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::examples;

    fn structure(v: &[i64]) -> AngleStructure {
        let tri = Arc::new(examples::ball());
        AngleStructure::new(tri, v.iter().map(|&x| ExactInteger::from(x)).collect())
    }

    #[test]
    fn taut_and_strict() {
        let taut = structure(&[0, 1, 0, 1]);
        assert!(taut.is_taut());
        assert!(!taut.is_strict());
        assert_eq!(taut.angle(0, 1), BigRational::from_integer(1.into()));

        let strict = structure(&[1, 1, 1, 3]);
        assert!(strict.is_strict());
        assert!(!strict.is_taut());
        assert_eq!(strict.angle(0, 2), BigRational::new(1.into(), 3.into()));
        assert_eq!(strict.to_string(), "1 1 1; 3");
    }
}
