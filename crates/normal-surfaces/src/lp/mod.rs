//! Exact-integer dual simplex used by tree traversal.
//!
//! Purpose
//! - `InitialTableaux`: the starting tableau for one search. It holds a row
//!   basis of the matching equations (plus any constraint rows) with the
//!   columns reordered so that early branching decisions touch few rows.
//! - `LpData`: one node of the search tree. It stores only the row
//!   operations applied so far and the right-hand side, and supports the
//!   three branching moves: force a column to zero, force it positive, or
//!   merge two quad columns into one octagon column.
//! - `LpMatrix`: dense integer matrix with the fraction-free row
//!   combinations the pivots use.
//!
//! Why this design
//! - Every node keeps its own `LpData`, cloned from its parent, so
//!   backtracking is free. Entries are recomputed from the shared initial
//!   tableau on demand, which keeps each node at `rank²` integers.
//! - All arithmetic goes through `LpInteger`; the same code runs on `i64`,
//!   `i128` or `ExactInteger` depending on the caller's overflow bound.

mod data;
mod matrix;
mod tableaux;

pub use data::LpData;
pub use matrix::LpMatrix;
pub use tableaux::InitialTableaux;

#[cfg(test)]
mod tests;
