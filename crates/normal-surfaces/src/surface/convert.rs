//! Conversions between coordinate systems.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::coords::CoordinateSystem;
use crate::error::{Error, Result};
use crate::integer::ExactInteger;
use crate::tables::{octagon_quads, QUAD_MEETING, QUAD_SEPARATING};

use super::NormalSurface;

impl NormalSurface {
    /// Standard (or standard almost normal) vector, reconstructing it from
    /// quads when needed. `None` for spun surfaces.
    pub(crate) fn standard_vector(&self) -> Option<&[ExactInteger]> {
        if self.coords.stores_triangles() {
            return Some(&self.vector);
        }
        self.standard
            .get_or_init(|| self.reconstruct_vector())
            .as_deref()
    }

    /// Quad and octagon discs of `tet` that cut the arc at corner `v` of
    /// face `f`.
    pub(super) fn arc_discs(&self, tet: usize, v: usize, f: usize) -> ExactInteger {
        let sep = QUAD_SEPARATING[v][f];
        let mut n = self.quads(tet, sep);
        for k in (0..3).filter(|&k| k != sep) {
            n += self.octs(tet, k);
        }
        n
    }

    /// Propagates triangle counts around each vertex link: crossing face
    /// `f` keeps the arc count at the shared corner equal on both sides.
    /// The smallest count in each link is then set to zero.
    fn reconstruct_vector(&self) -> Option<Vec<ExactInteger>> {
        let tri = &self.tri;
        let n = tri.size();
        let mut tri_count: Vec<Option<ExactInteger>> = vec![None; 4 * n];
        for vertex in tri.vertices() {
            let start = vertex.embeddings[0];
            let root = (start.tet, start.vertices.at(0));
            tri_count[4 * root.0 + root.1] = Some(ExactInteger::ZERO);
            let mut queue = VecDeque::from([root]);
            let mut seen = vec![root];
            while let Some((a, v)) = queue.pop_front() {
                let here = tri_count[4 * a + v].clone()?;
                for f in (0..4).filter(|&f| f != v) {
                    let Some(g) = tri.adjacent(a, f) else {
                        continue;
                    };
                    let (b, w) = (g.tet, g.perm.at(v));
                    let there = &here + &self.arc_discs(a, v, f) - self.arc_discs(b, w, g.perm.at(f));
                    match &tri_count[4 * b + w] {
                        None => {
                            tri_count[4 * b + w] = Some(there);
                            queue.push_back((b, w));
                            seen.push((b, w));
                        }
                        Some(old) if *old != there => {
                            tracing::trace!(tet = b, vertex = w, "inconsistent vertex link potential");
                            return None;
                        }
                        Some(_) => {}
                    }
                }
            }
            let min = seen
                .iter()
                .filter_map(|&(t, v)| tri_count[4 * t + v].clone())
                .min()
                .unwrap_or(ExactInteger::ZERO);
            for &(t, v) in &seen {
                if let Some(x) = tri_count[4 * t + v].as_mut() {
                    *x -= &min;
                }
            }
        }

        let octagons = self.coords.stores_octagons();
        let per = if octagons { 10 } else { 7 };
        let mut out = vec![ExactInteger::ZERO; per * n];
        for tet in 0..n {
            for v in 0..4 {
                out[per * tet + v] = tri_count[4 * tet + v].clone().unwrap_or(ExactInteger::ZERO);
            }
            for k in 0..3 {
                out[per * tet + 4 + k] = self.quads(tet, k);
                if octagons {
                    out[per * tet + 7 + k] = self.octs(tet, k);
                }
            }
        }
        Some(out)
    }

    /// The same surface in standard (or standard almost normal)
    /// coordinates, with no vertex-linking components added.
    pub fn reconstruct(&self) -> Result<NormalSurface> {
        if self.coords.stores_triangles() {
            return Ok(self.clone());
        }
        let std = self.standard_vector().ok_or(Error::NonCompact)?;
        let coords = if self.coords.stores_octagons() {
            CoordinateSystem::AlmostNormal
        } else {
            CoordinateSystem::Standard
        };
        Ok(NormalSurface::new(Arc::clone(&self.tri), coords, std.to_vec()))
    }

    /// Drops triangle coordinates. Quad systems return a copy.
    pub fn project(&self) -> NormalSurface {
        if !self.coords.stores_triangles() {
            return self.clone();
        }
        let n = self.tri.size();
        let octagons = self.coords.stores_octagons();
        let per = if octagons { 6 } else { 3 };
        let mut out = Vec::with_capacity(per * n);
        for tet in 0..n {
            out.extend((0..3).map(|k| self.quads(tet, k)));
            if octagons {
                out.extend((0..3).map(|k| self.octs(tet, k)));
            }
        }
        NormalSurface::new(Arc::clone(&self.tri), self.coords.quad_counterpart(), out)
    }

    /// Number of times the surface meets skeleton edge `edge`.
    pub fn edge_weight(&self, edge: usize) -> Result<ExactInteger> {
        let e = self
            .tri
            .edges()
            .get(edge)
            .ok_or_else(|| Error::coords(CoordinateSystem::EdgeWeight, format!("no edge {edge}")))?;
        let emb = e.embeddings[0];
        let (a, b) = (emb.vertices.at(0), emb.vertices.at(1));
        let mut w = self.triangles(emb.tet, a)? + self.triangles(emb.tet, b)?;
        for k in QUAD_MEETING[a][b] {
            w += self.quads(emb.tet, k);
        }
        // Octagon k crosses the edges kept together by quad k twice.
        let sep = QUAD_SEPARATING[a][b];
        for k in 0..3 {
            let crossings = octagon_quads(k).iter().filter(|&&q| q != sep).count() as i64;
            w += self.octs(emb.tet, k) * crossings;
        }
        Ok(w)
    }

    /// Number of normal arcs in skeleton triangle `triangle` around its
    /// vertex `vertex` (0..3, in the triangle's own labelling).
    pub fn arcs(&self, triangle: usize, vertex: usize) -> Result<ExactInteger> {
        let t = self
            .tri
            .triangles()
            .get(triangle)
            .filter(|_| vertex < 3)
            .ok_or_else(|| Error::coords(CoordinateSystem::TriangleArcs, format!("no arc ({triangle}, {vertex})")))?;
        let emb = t.embeddings[0];
        let (v, f) = (emb.vertices.at(vertex), emb.vertices.at(3));
        Ok(self.triangles(emb.tet, v)? + self.arc_discs(emb.tet, v, f))
    }

    /// The coordinates of this surface in `coords`.
    pub fn in_system(&self, coords: CoordinateSystem) -> Result<Vec<ExactInteger>> {
        use CoordinateSystem::*;
        match coords {
            EdgeWeight => (0..self.tri.edges().len()).map(|e| self.edge_weight(e)).collect(),
            TriangleArcs => (0..self.tri.triangles().len())
                .flat_map(|t| (0..3).map(move |v| (t, v)))
                .map(|(t, v)| self.arcs(t, v))
                .collect(),
            Angle => Err(Error::coords(coords, "angle structures are not surfaces")),
            _ if coords == self.coords => Ok(self.vector.clone()),
            _ if !coords.stores_octagons() && self.octagon_position().is_some() => {
                Err(Error::coords(coords, "surface contains an octagon"))
            }
            _ => {
                let base = if coords.stores_triangles() {
                    self.reconstruct()?
                } else {
                    self.project()
                };
                let per = base.coords.per_tet().unwrap_or(1);
                Ok(match (base.coords.stores_octagons(), coords.stores_octagons()) {
                    (false, true) => base
                        .vector
                        .chunks(per)
                        .flat_map(|block| block.iter().cloned().chain(std::iter::repeat(ExactInteger::ZERO).take(3)))
                        .collect(),
                    (true, false) => base
                        .vector
                        .chunks(per)
                        .flat_map(|block| block[..per - 3].iter().cloned())
                        .collect(),
                    _ => base.vector,
                })
            }
        }
    }

    /// Sum of two surfaces in the same system on the same triangulation.
    pub fn add(&self, other: &NormalSurface) -> Result<NormalSurface> {
        if self.coords != other.coords {
            return Err(Error::coords(other.coords, format!("cannot add to a surface in {}", self.coords)));
        }
        if !Arc::ptr_eq(&self.tri, &other.tri) && *self.tri != *other.tri {
            return Err(Error::InvalidTriangulation {
                reason: "surfaces live in different triangulations".into(),
            });
        }
        let sum = self.vector.iter().zip(&other.vector).map(|(a, b)| a + b).collect();
        Ok(NormalSurface::new(Arc::clone(&self.tri), self.coords, sum))
    }

    /// `k` copies of this surface.
    pub fn scaled(&self, k: u64) -> NormalSurface {
        let k = ExactInteger::from(k);
        let v = self.vector.iter().map(|x| x * &k).collect();
        NormalSurface::new(Arc::clone(&self.tri), self.coords, v)
    }
}
