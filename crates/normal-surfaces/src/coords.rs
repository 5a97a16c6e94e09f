//! Coordinate systems for normal and almost normal surfaces.
//!
//! Every system lays its coordinates out tetrahedron by tetrahedron (or edge
//! by edge, triangle by triangle for the view-only systems). Within a
//! tetrahedron block the order is triangles `0..4`, quads `0..3`, octagons
//! `0..3`, skipping whatever the system does not store.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::triangulation::Triangulation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoordinateSystem {
    /// 4 triangles and 3 quads per tetrahedron.
    Standard,
    /// 3 quads per tetrahedron; allows spun surfaces.
    Quad,
    /// Quad coordinates restricted to compact surfaces in ideal triangulations.
    QuadClosed,
    /// Standard almost normal: 4 triangles, 3 quads and 3 octagons.
    AlmostNormal,
    /// 3 quads and 3 octagons per tetrahedron.
    QuadOct,
    /// `QuadOct` restricted to compact surfaces.
    QuadOctClosed,
    /// One weight per skeleton edge. View only.
    EdgeWeight,
    /// Three arc counts per skeleton triangle. View only.
    TriangleArcs,
    /// Three angles per tetrahedron plus a scaling coordinate.
    Angle,
}

/// What a single coordinate counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Coordinate {
    Triangle { tet: usize, vertex: usize },
    Quad { tet: usize, kind: usize },
    Octagon { tet: usize, kind: usize },
    EdgeWeight { edge: usize },
    Arc { triangle: usize, vertex: usize },
    Angle { tet: usize, kind: usize },
    Scaling,
}

impl CoordinateSystem {
    pub const ALL: [CoordinateSystem; 9] = [
        Self::Standard,
        Self::Quad,
        Self::QuadClosed,
        Self::AlmostNormal,
        Self::QuadOct,
        Self::QuadOctClosed,
        Self::EdgeWeight,
        Self::TriangleArcs,
        Self::Angle,
    ];

    /// Coordinates per tetrahedron, or `None` when the block is not
    /// tetrahedron based.
    pub fn per_tet(self) -> Option<usize> {
        match self {
            Self::Standard => Some(7),
            Self::Quad | Self::QuadClosed | Self::Angle => Some(3),
            Self::AlmostNormal => Some(10),
            Self::QuadOct | Self::QuadOctClosed => Some(6),
            Self::EdgeWeight | Self::TriangleArcs => None,
        }
    }

    /// Total number of coordinates for `tri`.
    pub fn dimension(self, tri: &Triangulation) -> usize {
        match self {
            Self::EdgeWeight => tri.edges().len(),
            Self::TriangleArcs => 3 * tri.triangles().len(),
            Self::Angle => 3 * tri.size() + 1,
            _ => self.per_tet().unwrap_or(0) * tri.size(),
        }
    }

    pub fn stores_triangles(self) -> bool {
        matches!(self, Self::Standard | Self::AlmostNormal)
    }

    pub fn stores_quads(self) -> bool {
        !matches!(self, Self::EdgeWeight | Self::TriangleArcs | Self::Angle)
    }

    pub fn stores_octagons(self) -> bool {
        matches!(self, Self::AlmostNormal | Self::QuadOct | Self::QuadOctClosed)
    }

    pub fn stores_angles(self) -> bool {
        self == Self::Angle
    }

    pub fn is_almost_normal(self) -> bool {
        self.stores_octagons()
    }

    /// Non-compact (spun) vertex surfaces are possible.
    pub fn allows_spun(self) -> bool {
        matches!(self, Self::Quad | Self::QuadOct)
    }

    /// The closed variants add the slope conditions for compactness.
    pub fn is_closed_variant(self) -> bool {
        matches!(self, Self::QuadClosed | Self::QuadOctClosed)
    }

    /// Only normal and almost normal surfaces can be enumerated; the
    /// view-only systems describe existing surfaces.
    pub fn supports_traversal(self) -> bool {
        self.stores_quads()
    }

    /// System whose matching equations drive the tableau: octagons are
    /// carried as pairs of quad columns, and closed variants use the plain
    /// quad equations.
    pub fn tableau_system(self) -> Self {
        match self {
            Self::Standard | Self::AlmostNormal => Self::Standard,
            Self::Quad | Self::QuadClosed | Self::QuadOct | Self::QuadOctClosed => Self::Quad,
            other => other,
        }
    }

    /// Same surfaces with triangles dropped (or added back).
    pub fn quad_counterpart(self) -> Self {
        match self {
            Self::Standard => Self::Quad,
            Self::AlmostNormal => Self::QuadOct,
            Self::Quad | Self::QuadClosed => Self::Standard,
            Self::QuadOct | Self::QuadOctClosed => Self::AlmostNormal,
            other => other,
        }
    }

    /// Meaning of coordinate `index` in `tri`.
    pub fn coordinate(self, tri: &Triangulation, index: usize) -> Result<Coordinate> {
        if index >= self.dimension(tri) {
            return Err(Error::coords(self, format!("no coordinate {index}")));
        }
        Ok(match self {
            Self::EdgeWeight => Coordinate::EdgeWeight { edge: index },
            Self::TriangleArcs => Coordinate::Arc {
                triangle: index / 3,
                vertex: index % 3,
            },
            Self::Angle if index == 3 * tri.size() => Coordinate::Scaling,
            Self::Angle => Coordinate::Angle {
                tet: index / 3,
                kind: index % 3,
            },
            _ => {
                let per = self.per_tet().unwrap_or(1);
                let (tet, mut k) = (index / per, index % per);
                if self.stores_triangles() {
                    if k < 4 {
                        return Ok(Coordinate::Triangle { tet, vertex: k });
                    }
                    k -= 4;
                }
                if k < 3 {
                    Coordinate::Quad { tet, kind: k }
                } else {
                    Coordinate::Octagon { tet, kind: k - 3 }
                }
            }
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Quad => "quad",
            Self::QuadClosed => "quad-closed",
            Self::AlmostNormal => "almost-normal",
            Self::QuadOct => "quad-oct",
            Self::QuadOctClosed => "quad-oct-closed",
            Self::EdgeWeight => "edge-weight",
            Self::TriangleArcs => "triangle-arcs",
            Self::Angle => "angle",
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoordinateSystem {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|c| c.name() == key)
            .ok_or_else(|| format!("unknown coordinate system {s:?}"))
    }
}
