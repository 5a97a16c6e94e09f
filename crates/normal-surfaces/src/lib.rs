//! Normal and almost normal surface enumeration in 3-manifold
//! triangulations, by tree traversal over exact-arithmetic tableaux.
//!
//! Layout (leaves first)
//! - `integer`, `perm`, `tables`: exact integers, permutations of four
//!   labels, disc tables inside one tetrahedron.
//! - `triangulation`: gluings, skeleton, named examples.
//! - `coords`, `matching`: coordinate systems and their matching equations.
//! - `constraints`, `lp`, `trie`: extra tableau rows, ban policies, the
//!   tableau engine and the domination trie.
//! - `traversal`: enumeration, single-solution and taut searches.
//! - `surface`, `angle`: decoded solutions.
//! - `api`, `recognition`: entry points for callers.
//!
//! API Policy
//! - `api` and `prelude` are the intended entry points. The search types in
//!   `traversal` are public for callers that want to drive a search by
//!   hand (`next`, `percent`); expect them to change more often.

pub mod angle;
pub mod api;
pub mod constraints;
pub mod coords;
pub mod error;
pub mod integer;
pub mod lp;
pub mod matching;
pub mod perm;
pub mod recognition;
pub mod surface;
pub mod tables;
pub mod traversal;
pub mod triangulation;
pub mod trie;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::angle::AngleStructure;
    pub use crate::api::{
        enumerate, enumerate_taut, enumerate_vertex_surfaces, find_single_solution, recreate_matching_equations,
        EulerTarget, SurfaceList, TriHandle,
    };
    pub use crate::constraints::{BanConstraint, LpConstraint};
    pub use crate::coords::CoordinateSystem;
    pub use crate::error::{Error, Result};
    pub use crate::integer::ExactInteger;
    pub use crate::recognition::{ball_recognition, is_zero_efficient, sphere_recognition, Recognition};
    pub use crate::surface::NormalSurface;
    pub use crate::traversal::{Backend, Outcome, SearchCommand, TraversalCfg};
    pub use crate::triangulation::{examples, Triangulation};
}
