//! JSON shapes written by the subcommands.

use normal_surfaces::angle::AngleStructure;
use normal_surfaces::surface::NormalSurface;
use normal_surfaces::traversal::Outcome;
use serde::Serialize;

/// Integers are written as decimal strings; they may exceed 64 bits.
#[derive(Debug, Serialize)]
pub struct SurfaceRecord {
    pub vector: Vec<String>,
    pub euler: Option<String>,
    pub compact: bool,
    pub vertex_link: Option<usize>,
    pub real_boundary: bool,
    pub octagon: Option<(usize, usize)>,
}

impl From<&NormalSurface> for SurfaceRecord {
    fn from(s: &NormalSurface) -> Self {
        Self {
            vector: s.vector().iter().map(|x| x.to_string()).collect(),
            euler: s.euler_char().map(|x| x.to_string()),
            compact: s.is_compact(),
            vertex_link: s.is_vertex_link(),
            real_boundary: s.has_real_boundary(),
            octagon: s.octagon_position(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AngleRecord {
    pub angles: Vec<String>,
    pub scaling: String,
}

impl From<&AngleStructure> for AngleRecord {
    fn from(a: &AngleStructure) -> Self {
        let v = a.vector();
        Self {
            angles: v[..v.len() - 1].iter().map(|x| x.to_string()).collect(),
            scaling: a.scaling().to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct OutcomeRecord {
    pub count: usize,
    pub cancelled: bool,
    pub visited: u64,
    /// The `--limit` cut the search short.
    pub truncated: bool,
}

impl OutcomeRecord {
    pub fn new(o: Outcome, truncated: bool) -> Self {
        Self {
            count: o.count,
            cancelled: o.cancelled,
            visited: o.visited,
            truncated,
        }
    }
}

/// Document written by `enumerate`, `single` and `taut`.
#[derive(Debug, Serialize)]
pub struct Report<T> {
    pub triangulation: String,
    pub tetrahedra: usize,
    pub coords: String,
    pub outcome: OutcomeRecord,
    pub solutions: Vec<T>,
}
