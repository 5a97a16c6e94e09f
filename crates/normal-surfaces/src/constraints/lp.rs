use crate::coords::CoordinateSystem;
use crate::error::Result;
use crate::integer::LpInteger;
use crate::lp::LpData;
use crate::matching::Layout;
use crate::surface::NormalSurface;
use crate::tables::{QUAD_MEETING, QUAD_SEPARATING};
use crate::triangulation::Triangulation;

use super::nonspun::slope_functionals;

/// Additional linear constraint carried by the tableau.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LpConstraint {
    #[default]
    None,
    /// Euler characteristic strictly positive. In almost normal
    /// coordinates each octagon is counted one lower.
    EulerPositive,
    /// Euler characteristic exactly zero.
    EulerZero,
    /// Compact surfaces only: the accumulated triangle shift around every
    /// cycle of every vertex link vanishes.
    NonSpun,
}

impl LpConstraint {
    /// Whether the constraint can be expressed in `coords`.
    pub fn supported(self, coords: CoordinateSystem) -> bool {
        if !coords.supports_traversal() {
            return false;
        }
        match self {
            Self::None => true,
            Self::EulerPositive => coords.stores_triangles(),
            Self::EulerZero => coords == CoordinateSystem::Standard,
            Self::NonSpun => coords.tableau_system() == CoordinateSystem::Quad,
        }
    }

    /// Added to each constraint coefficient of the two quad columns that
    /// stand in for an octagon.
    pub fn octagon_adjustment(self) -> i64 {
        match self {
            Self::EulerPositive => -1,
            _ => 0,
        }
    }

    /// Constraint rows over the unpermuted columns of the tableau system.
    pub(crate) fn functionals(self, tri: &Triangulation) -> Result<Vec<Vec<i64>>> {
        Ok(match self {
            Self::None => Vec::new(),
            Self::EulerPositive | Self::EulerZero => vec![euler_functional(tri)],
            Self::NonSpun => slope_functionals(tri)?,
        })
    }

    /// Root hook: fixes the slack columns, which sit after every coordinate
    /// column.
    pub(crate) fn constrain<I: LpInteger>(self, lp: &mut LpData<'_, I>, extra: usize) {
        let cols = lp.tableaux().columns();
        match self {
            Self::None => {}
            Self::EulerPositive => lp.constrain_positive(cols - 1),
            Self::EulerZero => lp.constrain_zero(cols - 1),
            Self::NonSpun => {
                for i in 0..extra {
                    lp.constrain_zero(cols - 1 - i);
                }
            }
        }
    }

    /// Checks a surface produced under this constraint.
    pub fn verify(self, s: &NormalSurface) -> bool {
        match self {
            Self::None => true,
            Self::EulerPositive => s.euler_char().is_some_and(|x| x > 0),
            Self::EulerZero => s.euler_char().is_some_and(|x| x.is_zero()),
            Self::NonSpun => s.is_compact(),
        }
    }
}

/// Linear functional on standard coordinates (7 per tetrahedron) whose
/// value on a surface is its Euler characteristic.
///
/// Each disc is a face (+1); each normal arc is an edge, counted once from
/// the front embedding of its triangle (-1); each normal point is a vertex,
/// counted once from the front embedding of its edge (+1).
pub fn euler_functional(tri: &Triangulation) -> Vec<i64> {
    let layout = Layout::standard();
    let mut f = vec![1; 7 * tri.size()];
    for t in tri.triangles() {
        let emb = t.embeddings[0];
        let p = emb.vertices;
        for i in 0..3 {
            f[layout.triangle(emb.tet, p.at(i))] -= 1;
            f[layout.quad(emb.tet, QUAD_SEPARATING[p.at(i)][p.at(3)])] -= 1;
        }
    }
    for e in tri.edges() {
        let emb = e.embeddings[0];
        let (a, b) = (emb.vertices.at(0), emb.vertices.at(1));
        f[layout.triangle(emb.tet, a)] += 1;
        f[layout.triangle(emb.tet, b)] += 1;
        for k in QUAD_MEETING[a][b] {
            f[layout.quad(emb.tet, k)] += 1;
        }
    }
    f
}
