//! Exact integer arithmetic for the tableau engine.
//!
//! Purpose
//! - `ExactInteger`: an integer that never wraps. Values live in an `i64`
//!   until an operation overflows, then move to `num_bigint::BigInt`.
//!   Results that fit back into an `i64` are demoted, so structural equality
//!   is value equality.
//! - `LpInteger`: the narrow arithmetic surface the LP engine needs. It is
//!   implemented for `i64`, `i128` and `ExactInteger`, which lets a traversal
//!   run on native words whenever a bound on intermediate values allows it.
//!
//! Preconditions
//! - Division by zero panics. Every other operation is total.

mod backend;
mod exact;

pub use backend::LpInteger;
pub use exact::{ExactInteger, ParseIntegerError};

#[cfg(test)]
mod tests;
