//! Error taxonomy for the library.

use thiserror::Error;

use crate::coords::CoordinateSystem;
use crate::integer::ParseIntegerError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The coordinate system (or a policy combined with it) is not usable
    /// for the requested operation.
    #[error("coordinate system {coords} is not supported here: {reason}")]
    InvalidCoordinateSystem {
        coords: CoordinateSystem,
        reason: String,
    },

    #[error("invalid triangulation: {reason}")]
    InvalidTriangulation { reason: String },

    /// Facade construction failed (bad indices or an already glued face).
    #[error("cannot glue: {reason}")]
    Gluing { reason: String },

    #[error("invalid ban: {reason}")]
    InvalidBan { reason: String },

    /// Triangle coordinates do not exist for a spun surface.
    #[error("surface is spun (non-compact) and has no standard representation")]
    NonCompact,

    #[error(transparent)]
    Parse(#[from] ParseIntegerError),

    #[error("line {line}: {reason}")]
    ParseTriangulation { line: usize, reason: String },
}

impl Error {
    pub(crate) fn coords(coords: CoordinateSystem, reason: impl Into<String>) -> Self {
        Self::InvalidCoordinateSystem {
            coords,
            reason: reason.into(),
        }
    }
}
