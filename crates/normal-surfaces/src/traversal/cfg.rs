//! Search defaults (internal).
//!
//! Policy
//! - Fixed constants. None of these change results, only how much work the
//!   search does or how finely progress is reported.

/// `percent()` stops refining once the unexplored range is below this.
pub(crate) const PROGRESS_PRECISION: f64 = 0.01;
/// Starting value for the fail-first minimum; larger than any branch count.
pub(crate) const FAIL_FIRST_INITIAL: usize = 5;
/// Temporary tableaux used by `feasible_branches`.
pub(crate) const SCRATCH_TABLEAUX: usize = 4;
/// Branch counts per slot (enumeration, single solution, taut).
pub(crate) const ENUM_QUAD_BRANCHES: usize = 4;
pub(crate) const ENUM_OCT_BRANCHES: usize = 7;
pub(crate) const SINGLE_QUAD_BRANCHES: usize = 3;
pub(crate) const SINGLE_OCT_BRANCHES: usize = 6;
pub(crate) const TRIANGLE_BRANCHES: usize = 2;
pub(crate) const TAUT_BRANCHES: usize = 3;
