//! Skeleton computation: faces of each dimension, links and boundary.

use std::collections::VecDeque;

use crate::perm::Perm4;
use crate::tables::{edge_ordering, triangle_ordering, EDGE_NUMBER};

use super::Triangulation;

const UNSET: usize = usize::MAX;

/// A face of the skeleton seen from inside one tetrahedron.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Embedding {
    pub tet: usize,
    pub vertices: Perm4,
}

/// Topology of a vertex link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkType {
    Sphere,
    Disc,
    /// Closed but not a sphere.
    Ideal,
    /// Bounded but not a disc.
    Invalid,
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub embeddings: Vec<Embedding>,
    pub link: LinkType,
    pub link_euler: i64,
    pub boundary_component: Option<usize>,
}

impl Vertex {
    pub fn degree(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_ideal(&self) -> bool {
        self.link == LinkType::Ideal
    }

    pub fn link_closed(&self) -> bool {
        matches!(self.link, LinkType::Sphere | LinkType::Ideal)
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    /// Ordered around the edge; for a boundary edge the first embedding has
    /// boundary face `vertices[3]` and the last has boundary face `vertices[2]`.
    pub embeddings: Vec<Embedding>,
    pub boundary: bool,
    /// False if the edge is identified with itself in reverse.
    pub valid: bool,
    pub boundary_component: Option<usize>,
}

impl Edge {
    pub fn degree(&self) -> usize {
        self.embeddings.len()
    }
}

#[derive(Clone, Debug)]
pub struct Triangle {
    pub embeddings: Vec<Embedding>,
}

impl Triangle {
    pub fn is_boundary(&self) -> bool {
        self.embeddings.len() == 1
    }
}

/// A connected component of the real (triangle) boundary.
#[derive(Clone, Debug)]
pub struct BoundaryComponent {
    pub triangles: Vec<usize>,
    pub edges: Vec<usize>,
    pub vertices: Vec<usize>,
    pub euler: i64,
    pub orientable: bool,
}

impl BoundaryComponent {
    pub fn is_sphere(&self) -> bool {
        self.euler == 2
    }

    pub fn is_torus(&self) -> bool {
        self.euler == 0 && self.orientable
    }
}

#[derive(Clone, Debug)]
pub struct Skeleton {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    pub triangles: Vec<Triangle>,
    pub boundary_components: Vec<BoundaryComponent>,
    pub orientable: bool,
    tet_vertex: Vec<[usize; 4]>,
    tet_edge: Vec<[usize; 6]>,
    tet_triangle: Vec<[usize; 4]>,
    tet_component: Vec<usize>,
    n_components: usize,
}

impl Skeleton {
    pub(crate) fn build(tri: &Triangulation) -> Self {
        let (triangles, tet_triangle) = build_triangles(tri);
        let (edges, tet_edge) = build_edges(tri);
        let (vertices, tet_vertex) = build_vertices(tri);
        let (tet_component, n_components, orientable) = build_components(tri);
        let mut skel = Self {
            vertices,
            edges,
            triangles,
            boundary_components: Vec::new(),
            orientable,
            tet_vertex,
            tet_edge,
            tet_triangle,
            tet_component,
            n_components,
        };
        skel.classify_links();
        skel.build_boundary_components();
        tracing::trace!(
            vertices = skel.vertices.len(),
            edges = skel.edges.len(),
            triangles = skel.triangles.len(),
            "skeleton"
        );
        skel
    }

    /// Skeleton vertex at corner `v` of `tet`.
    pub fn tet_vertex(&self, tet: usize, v: usize) -> usize {
        self.tet_vertex[tet][v]
    }

    /// Skeleton edge for edge number `e` of `tet`.
    pub fn tet_edge(&self, tet: usize, e: usize) -> usize {
        self.tet_edge[tet][e]
    }

    /// Skeleton triangle for face `f` of `tet`.
    pub fn tet_triangle(&self, tet: usize, f: usize) -> usize {
        self.tet_triangle[tet][f]
    }

    pub fn tet_component(&self, tet: usize) -> usize {
        self.tet_component[tet]
    }

    pub fn count_components(&self) -> usize {
        self.n_components
    }

    pub fn is_valid(&self) -> bool {
        self.edges.iter().all(|e| e.valid) && self.vertices.iter().all(|v| v.link != LinkType::Invalid)
    }

    fn classify_links(&mut self) {
        let mut euler = vec![0i64; self.vertices.len()];
        let mut on_boundary = vec![false; self.vertices.len()];
        for e in &self.edges {
            let emb = e.embeddings[0];
            euler[self.tet_vertex[emb.tet][emb.vertices.at(0)]] += 1;
            euler[self.tet_vertex[emb.tet][emb.vertices.at(1)]] += 1;
        }
        for t in &self.triangles {
            let emb = t.embeddings[0];
            for i in 0..3 {
                let v = self.tet_vertex[emb.tet][emb.vertices.at(i)];
                euler[v] -= 1;
                on_boundary[v] |= t.is_boundary();
            }
        }
        for corners in &self.tet_vertex {
            for &v in corners {
                euler[v] += 1;
            }
        }
        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            vertex.link_euler = euler[i];
            vertex.link = match (on_boundary[i], euler[i]) {
                (false, 2) => LinkType::Sphere,
                (false, _) => LinkType::Ideal,
                (true, 1) => LinkType::Disc,
                (true, _) => LinkType::Invalid,
            };
        }
    }

    fn build_boundary_components(&mut self) {
        let boundary: Vec<usize> = (0..self.triangles.len())
            .filter(|&t| self.triangles[t].is_boundary())
            .collect();
        let mut local = vec![UNSET; self.triangles.len()];
        for (i, &t) in boundary.iter().enumerate() {
            local[t] = i;
        }
        // Neighbours across boundary edges, with the relative orientation
        // that keeps the shared edge traversed in opposite directions.
        let mut adj: Vec<Vec<(usize, i32)>> = vec![Vec::new(); boundary.len()];
        let mut edge_tri = Vec::new();
        for (eid, e) in self.edges.iter().enumerate() {
            if !e.boundary {
                continue;
            }
            let (Some(first), Some(last)) = (e.embeddings.first(), e.embeddings.last()) else {
                continue;
            };
            let a = local[self.tet_triangle[first.tet][first.vertices.at(3)]];
            let b = local[self.tet_triangle[last.tet][last.vertices.at(2)]];
            if a == UNSET || b == UNSET {
                continue;
            }
            let da = cyclic_direction(first.vertices.at(3), first.vertices.at(0), first.vertices.at(1));
            let db = cyclic_direction(last.vertices.at(2), last.vertices.at(0), last.vertices.at(1));
            adj[a].push((b, -da * db));
            adj[b].push((a, -da * db));
            edge_tri.push((eid, a));
        }

        let mut comp = vec![UNSET; boundary.len()];
        let mut orient = vec![0i32; boundary.len()];
        let mut comps: Vec<BoundaryComponent> = Vec::new();
        for start in 0..boundary.len() {
            if comp[start] != UNSET {
                continue;
            }
            let id = comps.len();
            let mut bc = BoundaryComponent {
                triangles: Vec::new(),
                edges: Vec::new(),
                vertices: Vec::new(),
                euler: 0,
                orientable: true,
            };
            comp[start] = id;
            orient[start] = 1;
            let mut queue = VecDeque::from([start]);
            while let Some(cur) = queue.pop_front() {
                bc.triangles.push(boundary[cur]);
                for &(nb, factor) in &adj[cur] {
                    let want = factor * orient[cur];
                    if comp[nb] == UNSET {
                        comp[nb] = id;
                        orient[nb] = want;
                        queue.push_back(nb);
                    } else if orient[nb] != want {
                        bc.orientable = false;
                    }
                }
            }
            comps.push(bc);
        }
        for (eid, a) in edge_tri {
            let c = comp[a];
            comps[c].edges.push(eid);
            self.edges[eid].boundary_component = Some(c);
            let emb = self.edges[eid].embeddings[0];
            for end in 0..2 {
                let v = self.tet_vertex[emb.tet][emb.vertices.at(end)];
                if self.vertices[v].boundary_component.is_none() {
                    self.vertices[v].boundary_component = Some(c);
                    comps[c].vertices.push(v);
                }
            }
        }
        for bc in &mut comps {
            bc.euler = bc.vertices.len() as i64 - bc.edges.len() as i64 + bc.triangles.len() as i64;
        }
        self.boundary_components = comps;
    }
}

/// +1 if `b` follows `a` in the increasing cyclic order of the three
/// vertices of face `face`, -1 otherwise.
fn cyclic_direction(face: usize, a: usize, b: usize) -> i32 {
    let labels: Vec<usize> = (0..4).filter(|&v| v != face).collect();
    let i = labels.iter().position(|&v| v == a).unwrap_or(0);
    if labels[(i + 1) % 3] == b {
        1
    } else {
        -1
    }
}

fn build_triangles(tri: &Triangulation) -> (Vec<Triangle>, Vec<[usize; 4]>) {
    let mut tet_triangle = vec![[UNSET; 4]; tri.size()];
    let mut triangles = Vec::new();
    for tet in 0..tri.size() {
        for face in 0..4 {
            if tet_triangle[tet][face] != UNSET {
                continue;
            }
            let id = triangles.len();
            let first = Embedding {
                tet,
                vertices: triangle_ordering(face),
            };
            tet_triangle[tet][face] = id;
            let mut embeddings = vec![first];
            if let Some(g) = tri.adjacent(tet, face) {
                tet_triangle[g.tet][g.perm.at(face)] = id;
                embeddings.push(Embedding {
                    tet: g.tet,
                    vertices: g.perm * first.vertices,
                });
            }
            triangles.push(Triangle { embeddings });
        }
    }
    (triangles, tet_triangle)
}

fn build_edges(tri: &Triangulation) -> (Vec<Edge>, Vec<[usize; 6]>) {
    let swap23 = Perm4::transposition(2, 3);
    let mut tet_edge = vec![[UNSET; 6]; tri.size()];
    let mut edges = Vec::new();
    for tet in 0..tri.size() {
        for e in 0..6 {
            if tet_edge[tet][e] != UNSET {
                continue;
            }
            let id = edges.len();
            let start = Embedding {
                tet,
                vertices: edge_ordering(e),
            };
            tet_edge[tet][e] = id;
            let mut embeddings = VecDeque::from([start]);
            let mut valid = true;
            let mut boundary = false;

            let mut cur = start;
            loop {
                let Some(g) = tri.adjacent(cur.tet, cur.vertices.at(2)) else {
                    boundary = true;
                    break;
                };
                let next = Embedding {
                    tet: g.tet,
                    vertices: g.perm * cur.vertices * swap23,
                };
                let ne = EDGE_NUMBER[next.vertices.at(0)][next.vertices.at(1)];
                if tet_edge[next.tet][ne] == id {
                    let closes = next.tet == start.tet
                        && ne == e
                        && next.vertices.at(0) == start.vertices.at(0);
                    valid &= closes;
                    break;
                }
                tet_edge[next.tet][ne] = id;
                embeddings.push_back(next);
                cur = next;
            }
            if boundary {
                let mut cur = start;
                while let Some(g) = tri.adjacent(cur.tet, cur.vertices.at(3)) {
                    let prev = Embedding {
                        tet: g.tet,
                        vertices: g.perm * cur.vertices * swap23,
                    };
                    let pe = EDGE_NUMBER[prev.vertices.at(0)][prev.vertices.at(1)];
                    if tet_edge[prev.tet][pe] == id {
                        valid = false;
                        break;
                    }
                    tet_edge[prev.tet][pe] = id;
                    embeddings.push_front(prev);
                    cur = prev;
                }
            }
            edges.push(Edge {
                embeddings: embeddings.into(),
                boundary,
                valid,
                boundary_component: None,
            });
        }
    }
    (edges, tet_edge)
}

fn build_vertices(tri: &Triangulation) -> (Vec<Vertex>, Vec<[usize; 4]>) {
    let mut tet_vertex = vec![[UNSET; 4]; tri.size()];
    let mut vertices = Vec::new();
    for tet in 0..tri.size() {
        for v in 0..4 {
            if tet_vertex[tet][v] != UNSET {
                continue;
            }
            let id = vertices.len();
            let mut embeddings = Vec::new();
            let mut stack = vec![(tet, v)];
            tet_vertex[tet][v] = id;
            while let Some((t, corner)) = stack.pop() {
                embeddings.push(Embedding {
                    tet: t,
                    vertices: Perm4::transposition(0, corner),
                });
                for face in (0..4).filter(|&f| f != corner) {
                    if let Some(g) = tri.adjacent(t, face) {
                        let c = g.perm.at(corner);
                        if tet_vertex[g.tet][c] == UNSET {
                            tet_vertex[g.tet][c] = id;
                            stack.push((g.tet, c));
                        }
                    }
                }
            }
            vertices.push(Vertex {
                embeddings,
                link: LinkType::Sphere,
                link_euler: 0,
                boundary_component: None,
            });
        }
    }
    (vertices, tet_vertex)
}

/// Component of each tetrahedron, component count, and orientability.
fn build_components(tri: &Triangulation) -> (Vec<usize>, usize, bool) {
    let n = tri.size();
    let mut comp = vec![UNSET; n];
    let mut orient = vec![0i32; n];
    let mut orientable = true;
    let mut count = 0;
    for start in 0..n {
        if comp[start] != UNSET {
            continue;
        }
        comp[start] = count;
        orient[start] = 1;
        let mut queue = VecDeque::from([start]);
        while let Some(t) = queue.pop_front() {
            for face in 0..4 {
                let Some(g) = tri.adjacent(t, face) else {
                    continue;
                };
                // Consistently oriented neighbours are glued by
                // orientation-reversing maps.
                let want = -g.perm.sign() * orient[t];
                if comp[g.tet] == UNSET {
                    comp[g.tet] = count;
                    orient[g.tet] = want;
                    queue.push_back(g.tet);
                } else if orient[g.tet] != want {
                    orientable = false;
                }
            }
        }
        count += 1;
    }
    (comp, count, orientable)
}
