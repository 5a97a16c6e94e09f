use std::fmt::Write as _;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::perm::Perm4;

use super::skeleton::{BoundaryComponent, Edge, Skeleton, Triangle, Vertex};

/// Destination of a face gluing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Gluing {
    pub tet: usize,
    pub perm: Perm4,
}

/// A 3-dimensional triangulation.
#[derive(Clone, Debug, Default)]
pub struct Triangulation {
    gluings: Vec<[Option<Gluing>; 4]>,
    skeleton: OnceLock<Skeleton>,
}

impl PartialEq for Triangulation {
    fn eq(&self, other: &Self) -> bool {
        self.gluings == other.gluings
    }
}

impl Triangulation {
    /// `n` tetrahedra with every face on the boundary.
    pub fn new(n: usize) -> Self {
        Self {
            gluings: vec![[None; 4]; n],
            skeleton: OnceLock::new(),
        }
    }

    /// Builds from `(tet, face, adjacent, images)` records.
    pub fn from_gluings(n: usize, gluings: &[(usize, usize, usize, [u8; 4])]) -> Result<Self> {
        let mut tri = Self::new(n);
        for &(tet, face, adj, images) in gluings {
            let perm = Perm4::from_images(images).ok_or_else(|| Error::Gluing {
                reason: format!("{images:?} is not a permutation"),
            })?;
            tri.join(tet, face, adj, perm)?;
        }
        Ok(tri)
    }

    pub fn size(&self) -> usize {
        self.gluings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gluings.is_empty()
    }

    pub fn add_tetrahedron(&mut self) -> usize {
        self.gluings.push([None; 4]);
        self.skeleton = OnceLock::new();
        self.gluings.len() - 1
    }

    pub fn adjacent(&self, tet: usize, face: usize) -> Option<Gluing> {
        self.gluings[tet][face]
    }

    /// Glues face `face` of `tet` to face `perm(face)` of `adj`.
    pub fn join(&mut self, tet: usize, face: usize, adj: usize, perm: Perm4) -> Result<()> {
        let n = self.size();
        if tet >= n || adj >= n || face >= 4 {
            return Err(Error::Gluing {
                reason: format!("face {face} of tetrahedron {tet} / {adj} out of range ({n})"),
            });
        }
        let adj_face = perm.at(face);
        if adj == tet && adj_face == face {
            return Err(Error::Gluing {
                reason: format!("face {face} of tetrahedron {tet} glued to itself"),
            });
        }
        if self.gluings[tet][face].is_some() || self.gluings[adj][adj_face].is_some() {
            return Err(Error::Gluing {
                reason: format!(
                    "face {face} of tetrahedron {tet} or face {adj_face} of {adj} is already glued"
                ),
            });
        }
        self.gluings[tet][face] = Some(Gluing { tet: adj, perm });
        self.gluings[adj][adj_face] = Some(Gluing {
            tet,
            perm: perm.inverse(),
        });
        self.skeleton = OnceLock::new();
        Ok(())
    }

    /// Makes a face boundary again, returning the old gluing.
    pub fn unjoin(&mut self, tet: usize, face: usize) -> Option<Gluing> {
        let old = self.gluings[tet][face].take()?;
        self.gluings[old.tet][old.perm.at(face)] = None;
        self.skeleton = OnceLock::new();
        Some(old)
    }

    /// Parses the line format written by [`Triangulation::to_text`].
    ///
    /// The first non-blank line holds the number of tetrahedra; each further
    /// line is `tet face adj images`, e.g. `0 0 1 1302`. `#` starts a comment.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.split('#').next().unwrap_or("").trim()))
            .filter(|(_, l)| !l.is_empty());
        let (first, header) = lines.next().ok_or(Error::ParseTriangulation {
            line: 1,
            reason: "missing tetrahedron count".into(),
        })?;
        let n: usize = header.parse().map_err(|_| Error::ParseTriangulation {
            line: first,
            reason: format!("bad tetrahedron count {header:?}"),
        })?;
        let mut tri = Self::new(n);
        for (line, body) in lines {
            let bad = |reason: String| Error::ParseTriangulation { line, reason };
            let fields: Vec<&str> = body.split_whitespace().collect();
            let [tet, face, adj, images] = fields.as_slice() else {
                return Err(bad(format!("expected 4 fields, got {}", fields.len())));
            };
            let parse = |s: &str| s.parse::<usize>().map_err(|_| bad(format!("bad index {s:?}")));
            let (tet, face, adj) = (parse(tet)?, parse(face)?, parse(adj)?);
            let digits: Vec<u8> = images
                .chars()
                .filter_map(|c| c.to_digit(10).map(|d| d as u8))
                .collect();
            let perm = <[u8; 4]>::try_from(digits.as_slice())
                .ok()
                .and_then(Perm4::from_images)
                .ok_or_else(|| bad(format!("bad permutation {images:?}")))?;
            let listed = tet < n && face < 4 && tri.adjacent(tet, face) == Some(Gluing { tet: adj, perm });
            if listed {
                // Reverse of a gluing seen earlier.
                continue;
            }
            tri.join(tet, face, adj, perm).map_err(|e| bad(e.to_string()))?;
        }
        Ok(tri)
    }

    /// One line per gluing, each listed once.
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n", self.size());
        for (tet, faces) in self.gluings.iter().enumerate() {
            for (face, g) in faces.iter().enumerate() {
                if let Some(g) = g {
                    if (g.tet, g.perm.at(face)) >= (tet, face) {
                        let _ = writeln!(out, "{tet} {face} {} {}", g.tet, g.perm);
                    }
                }
            }
        }
        out
    }

    pub fn skeleton(&self) -> &Skeleton {
        self.skeleton.get_or_init(|| Skeleton::build(self))
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.skeleton().vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.skeleton().edges
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.skeleton().triangles
    }

    pub fn boundary_components(&self) -> &[BoundaryComponent] {
        &self.skeleton().boundary_components
    }

    pub fn count_boundary_triangles(&self) -> usize {
        self.triangles().iter().filter(|t| t.is_boundary()).count()
    }

    pub fn has_boundary_triangles(&self) -> bool {
        self.gluings.iter().flatten().any(Option::is_none)
    }

    pub fn is_valid(&self) -> bool {
        self.skeleton().is_valid()
    }

    pub fn is_ideal(&self) -> bool {
        self.vertices().iter().any(Vertex::is_ideal)
    }

    /// No real boundary and no ideal vertices.
    pub fn is_closed(&self) -> bool {
        !self.has_boundary_triangles() && !self.is_ideal()
    }

    pub fn is_orientable(&self) -> bool {
        self.skeleton().orientable
    }

    pub fn is_connected(&self) -> bool {
        self.skeleton().count_components() <= 1
    }
}
