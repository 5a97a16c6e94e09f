//! Topological and combinatorial properties.

use crate::constraints::euler_functional;
use crate::integer::ExactInteger;
use crate::tables::octagon_quads;

use super::NormalSurface;

impl NormalSurface {
    fn per_standard_tet(&self) -> usize {
        if self.coords.stores_octagons() {
            10
        } else {
            7
        }
    }

    /// Euler characteristic, or `None` for a spun surface.
    ///
    /// An octagon counts as the two quads whose arcs it shares, minus one
    /// face.
    pub fn euler_char(&self) -> Option<ExactInteger> {
        self.euler
            .get_or_init(|| {
                let std = self.standard_vector()?;
                let f = euler_functional(&self.tri);
                let per = self.per_standard_tet();
                let mut chi = ExactInteger::ZERO;
                for tet in 0..self.tri.size() {
                    for j in 0..7 {
                        chi += std[per * tet + j].clone() * f[7 * tet + j];
                    }
                    if per == 10 {
                        for k in 0..3 {
                            let [p, q] = octagon_quads(k);
                            let coeff = f[7 * tet + 4 + p] + f[7 * tet + 4 + q] - 1;
                            chi += std[per * tet + 7 + k].clone() * coeff;
                        }
                    }
                }
                Some(chi)
            })
            .clone()
    }

    /// Finitely many discs (always true outside quad systems).
    pub fn is_compact(&self) -> bool {
        self.standard_vector().is_some()
    }

    /// Only triangles: a union of vertex links.
    pub fn is_vertex_linking(&self) -> bool {
        (0..self.tri.size()).all(|tet| (0..3).all(|k| self.quads(tet, k).is_zero() && self.octs(tet, k).is_zero()))
    }

    /// The vertex whose link is a multiple of this surface, if any.
    pub fn is_vertex_link(&self) -> Option<usize> {
        if !self.is_vertex_linking() {
            return None;
        }
        let std = self.standard_vector()?;
        let per = self.per_standard_tet();
        let skeleton = self.tri.skeleton();
        let corners = (0..self.tri.size()).flat_map(|tet| (0..4).map(move |v| (tet, v)));
        let (tet, v) = corners.clone().find(|&(t, v)| !std[per * t + v].is_zero())?;
        let vertex = skeleton.tet_vertex(tet, v);
        let value = &std[per * tet + v];
        corners
            .into_iter()
            .all(|(t, w)| {
                let x = &std[per * t + w];
                if skeleton.tet_vertex(t, w) == vertex {
                    x == value
                } else {
                    x.is_zero()
                }
            })
            .then_some(vertex)
    }

    /// Number of discs, if every tetrahedron holds at most one of them.
    pub fn is_central(&self) -> Option<usize> {
        let std = self.standard_vector()?;
        let per = self.per_standard_tet();
        let mut total = 0;
        for block in std.chunks(per) {
            let discs: ExactInteger = block.iter().sum();
            if discs > 1 {
                return None;
            }
            if discs == 1 {
                total += 1;
            }
        }
        (total > 0).then_some(total)
    }

    /// Exactly one quad per tetrahedron and no other discs.
    pub fn is_splitting(&self) -> bool {
        let Some(std) = self.standard_vector() else {
            return false;
        };
        let per = self.per_standard_tet();
        std.chunks(per).all(|block| {
            let quads = &block[4..7];
            block[..4].iter().all(ExactInteger::is_zero)
                && block[7..].iter().all(ExactInteger::is_zero)
                && quads.iter().filter(|q| **q == 1).count() == 1
                && quads.iter().filter(|q| q.is_zero()).count() == 2
        })
    }

    /// Meets the boundary of the triangulation.
    pub fn has_real_boundary(&self) -> bool {
        let std = self.standard_vector();
        let per = self.per_standard_tet();
        self.tri.triangles().iter().filter(|t| t.is_boundary()).any(|t| {
            let emb = t.embeddings[0];
            let face = emb.vertices.at(3);
            (0..4).filter(|&v| v != face).any(|v| {
                !self.arc_discs(emb.tet, v, face).is_zero()
                    || std.is_some_and(|std| !std[per * emb.tet + v].is_zero())
            })
        })
    }

    /// Tetrahedron and type of the first non-zero octagon.
    pub fn octagon_position(&self) -> Option<(usize, usize)> {
        if !self.coords.stores_octagons() {
            return None;
        }
        (0..self.tri.size())
            .flat_map(|tet| (0..3).map(move |k| (tet, k)))
            .find(|&(tet, k)| !self.octs(tet, k).is_zero())
    }
}
