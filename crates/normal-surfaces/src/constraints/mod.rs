//! Extra linear constraints and ban/mark policies for tree traversal.
//!
//! Purpose
//! - `LpConstraint` appends rows (and one slack column per row) to the
//!   initial tableau: Euler characteristic bounds, or the slope conditions
//!   that exclude spun surfaces.
//! - `BanConstraint` names disc types that are forced to zero before the
//!   search starts, and marks triangle types that single-solution mode
//!   should ignore.
//!
//! Why this design
//! - Both are closed enums. The traversal only needs a handful of hooks
//!   (functionals, a root `constrain`, `verify`, `supported`), so a `match`
//!   per hook stays small and keeps the generic surface to the integer
//!   backend alone.
//! - Policies are pure functions of the triangulation; they are evaluated
//!   once when the initial tableau is built.

mod ban;
mod lp;
mod nonspun;

pub use ban::{BanConstraint, BanList};
pub use lp::{euler_functional, LpConstraint};
pub use nonspun::slope_functionals;

#[cfg(test)]
mod tests;
