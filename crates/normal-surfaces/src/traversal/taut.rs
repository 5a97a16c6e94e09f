//! Taut angle structure enumeration.

use std::sync::Arc;

use crate::angle::AngleStructure;
use crate::constraints::BanList;
use crate::coords::CoordinateSystem;
use crate::integer::LpInteger;
use crate::lp::InitialTableaux;
use crate::triangulation::Triangulation;

use super::cfg::TAUT_BRANCHES;
use super::state::TraversalCore;
use super::types::{CancelFlag, Outcome, SearchCommand};

/// Enumerates taut angle structures: one angle of each tetrahedron equals
/// π and the other two are zero. Type `k` (1..3) puts the π at angle
/// `k - 1`; there is no zero type, so every leaf is a solution.
pub struct TautEnumeration<'a, I: LpInteger> {
    core: TraversalCore<'a, I>,
    solutions: usize,
    started: bool,
    finished: bool,
    cancelled: bool,
}

impl<'a, I: LpInteger> TautEnumeration<'a, I> {
    /// `tableaux` must be built for angle coordinates.
    pub fn new(tableaux: &'a InitialTableaux<'a>, tri: Arc<Triangulation>, cancel: Option<CancelFlag<'a>>) -> Self {
        debug_assert_eq!(tableaux.system(), CoordinateSystem::Angle);
        let bans = BanList::none(tableaux.coordinate_columns());
        Self {
            core: TraversalCore::new(tableaux, tri, CoordinateSystem::Angle, bans, TAUT_BRANCHES, 0, cancel),
            solutions: 0,
            started: false,
            finished: false,
            cancelled: false,
        }
    }

    pub fn solutions(&self) -> usize {
        self.solutions
    }

    pub fn visited(&self) -> u64 {
        self.core.visited
    }

    pub fn percent(&self) -> f64 {
        self.core.percent()
    }

    pub fn build_structure(&self) -> AngleStructure {
        self.core.build_structure()
    }

    pub fn outcome(&self) -> Outcome {
        Outcome {
            count: self.solutions,
            cancelled: self.cancelled,
            visited: self.core.visited,
        }
    }

    pub fn run(&mut self, mut sink: impl FnMut(AngleStructure) -> SearchCommand) -> Outcome {
        while self.next() {
            let structure = self.build_structure();
            tracing::trace!(n = self.solutions, types = ?self.core.types, "taut structure");
            if sink(structure) == SearchCommand::Stop {
                break;
            }
        }
        self.outcome()
    }

    pub fn next(&mut self) -> bool {
        if self.finished {
            return false;
        }
        let found = self.advance();
        if !found {
            self.finished = true;
        }
        found
    }

    fn advance(&mut self) -> bool {
        let c = &mut self.core;
        if !self.started {
            self.started = true;
            let scaling = c.tableaux.coordinate_columns() - 1;
            let empty = c.n_types == 0;
            let root = c.init_root();
            root.constrain_positive(scaling);
            if !root.is_feasible() || empty {
                return false;
            }
        } else {
            let idx = c.order[c.level];
            c.types[idx] += 1;
        }

        loop {
            if c.cancelled() {
                tracing::info!(visited = c.visited, solutions = self.solutions, "taut enumeration cancelled");
                self.cancelled = true;
                return false;
            }
            let level = c.level;
            let idx = c.order[level];
            if c.types[idx] == 4 {
                c.types[idx] = 0;
                if level == 0 {
                    return false;
                }
                c.level -= 1;
                let up = c.order[c.level];
                c.types[up] += 1;
                continue;
            }

            c.visited += 1;
            if c.types[idx] == 0 {
                c.types[idx] = 1;
                c.slot[level + 1] = c.slot[level];
                let next = c.next_slot[level];
                c.next_slot[level + 1] = next + 2;
                c.clone_level(next, level);
                c.lp_at(level).constrain_zero(3 * idx + 1);
                c.clone_level(next + 1, level);
                c.lp_at(level).constrain_zero(3 * idx + 2);
            } else {
                let s = c.next_slot[level] + usize::from(c.types[idx]) - 2;
                c.slot[level + 1] = s;
                let lp = &mut c.lps[s];
                lp.constrain_zero(3 * idx);
                if c.types[idx] == 2 {
                    lp.constrain_zero(3 * idx + 2);
                }
            }

            if c.lp_at(level + 1).is_feasible() {
                if level + 1 < c.n_types {
                    c.level += 1;
                } else {
                    self.solutions += 1;
                    return true;
                }
            } else {
                c.types[idx] += 1;
            }
        }
    }
}
