use crate::coords::CoordinateSystem;
use crate::error::{Error, Result};
use crate::integer::LpInteger;
use crate::lp::{InitialTableaux, LpData};
use crate::matching::Layout;
use crate::tables::QUAD_MEETING;
use crate::triangulation::Triangulation;

/// Disc types to exclude (and triangle types to mark) before the search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BanConstraint {
    #[default]
    None,
    /// Every disc type that touches a boundary triangle.
    Boundary,
    /// Disc types touching a real torus boundary component; triangles in
    /// the link of a vertex on such a torus are marked.
    TorusBoundary,
    /// Every disc type that meets one of the listed skeleton edges.
    Edges(Vec<usize>),
}

impl BanConstraint {
    pub fn supported(&self, coords: CoordinateSystem) -> bool {
        match self {
            Self::None => true,
            Self::Boundary | Self::TorusBoundary => coords.stores_triangles(),
            Self::Edges(_) => coords.stores_quads(),
        }
    }

    /// Rejects edge lists that name edges `tri` does not have.
    pub(crate) fn validate(&self, tri: &Triangulation) -> Result<()> {
        if let Self::Edges(edges) = self {
            let n = tri.edges().len();
            if let Some(bad) = edges.iter().find(|&&e| e >= n) {
                return Err(Error::InvalidBan {
                    reason: format!("edge {bad} out of range ({n} edges)"),
                });
            }
        }
        Ok(())
    }

    /// Evaluates the policy against the columns of `tableaux`.
    pub fn build(&self, tableaux: &InitialTableaux<'_>) -> BanList {
        let tri = tableaux.tri();
        let system = tableaux.system();
        let mut orig = BanList::none(system.dimension(tri));
        let Some(layout) = Layout::of(system) else {
            return orig;
        };
        match self {
            Self::None => {}
            Self::Boundary => {
                for tet in 0..tri.size() {
                    for face in (0..4).filter(|&f| tri.adjacent(tet, f).is_none()) {
                        orig.ban_around_face(&layout, tet, face);
                    }
                }
            }
            Self::TorusBoundary => {
                for bc in tri.boundary_components().iter().filter(|bc| bc.is_torus()) {
                    for &t in &bc.triangles {
                        let emb = tri.triangles()[t].embeddings[0];
                        orig.ban_around_face(&layout, emb.tet, emb.vertices.at(3));
                    }
                    for &v in &bc.vertices {
                        for emb in &tri.vertices()[v].embeddings {
                            orig.marked[layout.triangle(emb.tet, emb.vertices.at(0))] = true;
                        }
                    }
                }
            }
            Self::Edges(edges) => {
                for e in edges.iter().filter_map(|&e| tri.edges().get(e)) {
                    for emb in &e.embeddings {
                        let (a, b) = (emb.vertices.at(0), emb.vertices.at(1));
                        if layout.triangles {
                            orig.banned[layout.triangle(emb.tet, a)] = true;
                            orig.banned[layout.triangle(emb.tet, b)] = true;
                        }
                        for k in QUAD_MEETING[a][b] {
                            orig.banned[layout.quad(emb.tet, k)] = true;
                        }
                    }
                }
            }
        }
        // Re-index by tableau column.
        let perm = tableaux.column_perm();
        let cols = tableaux.coordinate_columns();
        BanList {
            banned: (0..cols).map(|c| orig.banned[perm[c]]).collect(),
            marked: (0..cols).map(|c| orig.marked[perm[c]]).collect(),
        }
    }
}

/// Banned and marked flags, indexed by tableau column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BanList {
    banned: Vec<bool>,
    marked: Vec<bool>,
}

impl BanList {
    pub fn none(cols: usize) -> Self {
        Self {
            banned: vec![false; cols],
            marked: vec![false; cols],
        }
    }

    pub fn is_banned(&self, col: usize) -> bool {
        self.banned.get(col).copied().unwrap_or(false)
    }

    pub fn marked(&self, col: usize) -> bool {
        self.marked.get(col).copied().unwrap_or(false)
    }

    pub fn count_banned(&self) -> usize {
        self.banned.iter().filter(|&&b| b).count()
    }

    pub fn count_marked(&self) -> usize {
        self.marked.iter().filter(|&&b| b).count()
    }

    /// Forces every banned column to zero.
    pub fn enforce<I: LpInteger>(&self, lp: &mut LpData<'_, I>) {
        for (col, _) in self.banned.iter().enumerate().filter(|(_, &b)| b) {
            lp.constrain_zero(col);
        }
    }

    fn ban_around_face(&mut self, layout: &Layout, tet: usize, face: usize) {
        for k in 0..3 {
            self.banned[layout.quad(tet, k)] = true;
        }
        if layout.triangles {
            for v in (0..4).filter(|&v| v != face) {
                self.banned[layout.triangle(tet, v)] = true;
            }
        }
    }
}
