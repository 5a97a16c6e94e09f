//! Tree traversal over type vectors.
//!
//! Purpose
//! - `TreeEnumeration`: every vertex solution of a normal or almost normal
//!   system, in a deterministic order.
//! - `TreeSingleSoln`: one solution that is not a union of vertex links,
//!   with a fail-first branching heuristic.
//! - `TautEnumeration`: taut angle structures.
//!
//! Why this design
//! - Each search node fixes one *type*: which quad (or octagon, or angle)
//!   of a tetrahedron may be non-zero, or whether a triangle coordinate is
//!   zero. The LP at the node is feasible iff the partial choice extends to
//!   a solution, so infeasible subtrees are pruned without enumerating
//!   their contents.
//! - The searches are explicit state machines rather than recursion so
//!   they can stop at a solution and resume later (`next`), and so that
//!   tableaux are reused from a fixed pool instead of being reallocated.
//! - Modes share `TraversalCore` by composition; the integer backend is a
//!   type parameter chosen at the API boundary.

mod cfg;
mod state;
mod enumeration;
mod single;
mod taut;
mod types;

pub use enumeration::TreeEnumeration;
pub use single::TreeSingleSoln;
pub use taut::TautEnumeration;
pub use types::{Backend, CancelFlag, Outcome, SearchCommand, TraversalCfg};

#[cfg(test)]
mod tests;
