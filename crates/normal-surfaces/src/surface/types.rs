use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::coords::CoordinateSystem;
use crate::error::{Error, Result};
use crate::integer::ExactInteger;
use crate::matching::{matching_equations, Layout};
use crate::triangulation::Triangulation;

#[derive(Clone)]
pub struct NormalSurface {
    pub(super) tri: Arc<Triangulation>,
    pub(super) coords: CoordinateSystem,
    pub(super) vector: Vec<ExactInteger>,
    /// Standard (or standard almost normal) vector; `None` when spun.
    pub(super) standard: OnceLock<Option<Vec<ExactInteger>>>,
    pub(super) euler: OnceLock<Option<ExactInteger>>,
}

impl NormalSurface {
    /// Wraps `vector`, which must have `coords.dimension(tri)` entries in a
    /// normal or almost normal system.
    pub fn new(tri: Arc<Triangulation>, coords: CoordinateSystem, vector: Vec<ExactInteger>) -> Self {
        debug_assert!(coords.stores_quads());
        debug_assert_eq!(vector.len(), coords.dimension(&tri));
        Self {
            tri,
            coords,
            vector,
            standard: OnceLock::new(),
            euler: OnceLock::new(),
        }
    }

    /// As [`Self::new`], checking the length and the coordinate system.
    pub fn try_new(tri: Arc<Triangulation>, coords: CoordinateSystem, vector: Vec<ExactInteger>) -> Result<Self> {
        if !coords.stores_quads() {
            return Err(Error::coords(coords, "not a normal surface coordinate system"));
        }
        let dim = coords.dimension(&tri);
        if vector.len() != dim {
            return Err(Error::coords(coords, format!("expected {dim} coordinates, got {}", vector.len())));
        }
        Ok(Self::new(tri, coords, vector))
    }

    pub fn triangulation(&self) -> &Arc<Triangulation> {
        &self.tri
    }

    pub fn coords(&self) -> CoordinateSystem {
        self.coords
    }

    pub fn vector(&self) -> &[ExactInteger] {
        &self.vector
    }

    pub(super) fn layout(&self) -> Layout {
        Layout::of(self.coords).unwrap_or_else(Layout::standard)
    }

    pub fn quads(&self, tet: usize, kind: usize) -> ExactInteger {
        self.vector[self.layout().quad(tet, kind)].clone()
    }

    /// Zero in systems without octagons.
    pub fn octs(&self, tet: usize, kind: usize) -> ExactInteger {
        let layout = self.layout();
        if layout.octagons {
            self.vector[layout.octagon(tet, kind)].clone()
        } else {
            ExactInteger::ZERO
        }
    }

    /// Triangle count at corner `vertex` of `tet`. Quad systems read it
    /// from the reconstructed standard vector.
    pub fn triangles(&self, tet: usize, vertex: usize) -> Result<ExactInteger> {
        let std = self.standard_vector().ok_or(Error::NonCompact)?;
        let per = if self.coords.stores_octagons() { 10 } else { 7 };
        Ok(std[per * tet + vertex].clone())
    }

    pub fn is_empty(&self) -> bool {
        self.vector.iter().all(ExactInteger::is_zero)
    }

    /// Whether `matching_equations(tri, coords) · v = 0`.
    pub fn satisfies_matching(&self) -> bool {
        let Ok(eqns) = matching_equations(&self.tri, self.coords) else {
            return false;
        };
        eqns.row_iter().all(|row| {
            row.iter()
                .zip(&self.vector)
                .filter(|(c, _)| **c != 0)
                .map(|(&c, x)| x.clone() * c)
                .sum::<ExactInteger>()
                .is_zero()
        })
    }
}

impl PartialEq for NormalSurface {
    fn eq(&self, other: &Self) -> bool {
        self.coords == other.coords && self.vector == other.vector && *self.tri == *other.tri
    }
}

impl fmt::Debug for NormalSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalSurface")
            .field("coords", &self.coords)
            .field("vector", &format_args!("{self}"))
            .finish()
    }
}

/// Tetrahedron blocks separated by ` | `.
impl fmt::Display for NormalSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let per = self.coords.per_tet().unwrap_or(self.vector.len().max(1));
        for (i, block) in self.vector.chunks(per).enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            for (j, x) in block.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{x}")?;
            }
        }
        Ok(())
    }
}
