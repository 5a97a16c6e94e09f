//! Small value types shared by the search modes and the API.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::constraints::{BanConstraint, LpConstraint};

/// Cooperative cancellation handle, polled once per search node.
///
/// The flag is owned by the caller; any thread may set it.
#[derive(Clone, Copy, Debug)]
pub struct CancelFlag<'a> {
    flag: &'a AtomicBool,
}

impl<'a> CancelFlag<'a> {
    pub fn new(flag: &'a AtomicBool) -> Self {
        Self { flag }
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Returned by a solution sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchCommand {
    Continue,
    Stop,
}

/// Summary of a finished (or interrupted) search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Solutions handed to the sink.
    pub count: usize,
    /// The cancellation flag was seen before the search finished.
    pub cancelled: bool,
    /// Search nodes visited, including the root.
    pub visited: u64,
}

/// Integer type used for tableau arithmetic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Native words when a bound on intermediate values proves them safe.
    #[default]
    Auto,
    Native64,
    Native128,
    Exact,
}

/// Traversal configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TraversalCfg {
    pub constraint: LpConstraint,
    pub ban: BanConstraint,
    pub backend: Backend,
}

/// Who holds the octagon of an almost normal search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OctagonToken {
    /// Not an almost normal search.
    Unavailable,
    /// No level has claimed the octagon yet.
    Free,
    /// The slot at this level holds the octagon.
    At(usize),
}
