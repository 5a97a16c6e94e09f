//! Vertex enumeration by tree traversal.

use std::sync::Arc;

use crate::constraints::BanList;
use crate::coords::CoordinateSystem;
use crate::integer::LpInteger;
use crate::lp::InitialTableaux;
use crate::surface::NormalSurface;
use crate::trie::TypeTrie;
use crate::triangulation::Triangulation;

use super::cfg::{ENUM_OCT_BRANCHES, ENUM_QUAD_BRANCHES, TRIANGLE_BRANCHES};
use super::state::TraversalCore;
use super::types::{CancelFlag, OctagonToken, Outcome, SearchCommand};

/// Enumerates the vertex solutions of a normal or almost normal system.
///
/// The type order is fixed for the whole search: the domination test
/// relies on solutions being found in lexicographic order of types.
pub struct TreeEnumeration<'a, I: LpInteger> {
    core: TraversalCore<'a, I>,
    solns: TypeTrie<7>,
    last_non_zero: Option<usize>,
    solutions: usize,
    finished: bool,
    cancelled: bool,
}

impl<'a, I: LpInteger> TreeEnumeration<'a, I> {
    pub fn new(
        tableaux: &'a InitialTableaux<'a>,
        tri: Arc<Triangulation>,
        coords: CoordinateSystem,
        bans: BanList,
        cancel: Option<CancelFlag<'a>>,
    ) -> Self {
        let quad_branches = if coords.stores_octagons() {
            ENUM_OCT_BRANCHES
        } else {
            ENUM_QUAD_BRANCHES
        };
        Self {
            core: TraversalCore::new(tableaux, tri, coords, bans, quad_branches, TRIANGLE_BRANCHES, cancel),
            solns: TypeTrie::new(),
            last_non_zero: None,
            solutions: 0,
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

    /// Type vector of the current node.
    pub fn types(&self) -> &[u8] {
        &self.core.types
    }

    pub fn percent(&self) -> f64 {
        self.core.percent()
    }

    /// Solution at the current leaf. Only meaningful after `next` returned
    /// `true`.
    pub fn build_surface(&self) -> NormalSurface {
        self.core.build_surface()
    }

    pub fn outcome(&self) -> Outcome {
        Outcome {
            count: self.solutions,
            cancelled: self.cancelled,
            visited: self.core.visited,
        }
    }

    /// Hands every solution to `sink` until the search ends or the sink
    /// stops it.
    pub fn run(&mut self, mut sink: impl FnMut(NormalSurface) -> SearchCommand) -> Outcome {
        while self.next() {
            let surface = self.build_surface();
            tracing::trace!(n = self.solutions, types = ?self.core.types, "vertex solution");
            if sink(surface) == SearchCommand::Stop {
                break;
            }
        }
        self.outcome()
    }

    /// Advances to the next vertex solution. Returns `false` once the
    /// search is exhausted or cancelled.
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
        let n = c.n_tets;
        match self.last_non_zero {
            None => {
                if !c.init_root().is_feasible() || c.n_types == 0 {
                    return false;
                }
            }
            Some(l) => {
                // Any deeper change would only add trailing zeros.
                c.level = l;
                let idx = c.order[l];
                c.types[idx] += 1;
            }
        }

        loop {
            if c.cancelled() {
                tracing::info!(visited = c.visited, solutions = self.solutions, "enumeration cancelled");
                self.cancelled = true;
                return false;
            }
            let level = c.level;
            let idx = c.order[level];

            let out_of_range = match c.types[idx] {
                4 => {
                    if c.oct == OctagonToken::Free {
                        c.oct = OctagonToken::At(level);
                        false
                    } else {
                        true
                    }
                }
                7 => {
                    c.oct = OctagonToken::Free;
                    true
                }
                2 => idx >= n,
                _ => false,
            };
            if out_of_range {
                c.types[idx] = 0;
                if level == 0 {
                    return false;
                }
                c.level -= 1;
                let up = c.order[c.level];
                c.types[up] += 1;
                self.last_non_zero = Some(c.level);
                continue;
            }

            c.visited += 1;
            if c.types[idx] != 0 && self.solns.dominates(&c.types) {
                c.types[idx] += 1;
                self.last_non_zero = Some(level);
                continue;
            }

            if c.types[idx] == 0 {
                // First visit: spin off clones for every later sibling and
                // narrow this level's tableau to the zero branch in place.
                c.slot[level + 1] = c.slot[level];
                let next = c.next_slot[level];
                if idx < n {
                    if c.oct == OctagonToken::Free {
                        c.next_slot[level + 1] = next + 6;
                        c.clone_level(next, level);
                        c.clone_level(next + 4, level);
                        c.clone_level(next + 5, level);
                        c.lp_at(level).constrain_zero(3 * idx);
                        c.clone_level(next + 1, level);
                        c.clone_level(next + 3, level);
                        c.lp_at(level).constrain_zero(3 * idx + 1);
                        c.clone_level(next + 2, level);
                        c.lp_at(level).constrain_zero(3 * idx + 2);
                    } else {
                        c.next_slot[level + 1] = next + 3;
                        c.clone_level(next, level);
                        c.lp_at(level).constrain_zero(3 * idx);
                        c.clone_level(next + 1, level);
                        c.lp_at(level).constrain_zero(3 * idx + 1);
                        c.clone_level(next + 2, level);
                        c.lp_at(level).constrain_zero(3 * idx + 2);
                    }
                } else {
                    c.next_slot[level + 1] = next + 1;
                    c.clone_level(next, level);
                    c.lp_at(level).constrain_zero(2 * n + idx);
                }
            } else if idx < n {
                let s = c.next_slot[level] + usize::from(c.types[idx]) - 1;
                c.slot[level + 1] = s;
                let lp = &mut c.lps[s];
                match c.types[idx] {
                    1 => {
                        lp.constrain_zero(3 * idx + 1);
                        lp.constrain_zero(3 * idx + 2);
                        lp.constrain_positive(3 * idx);
                    }
                    2 => {
                        lp.constrain_zero(3 * idx + 2);
                        lp.constrain_positive(3 * idx + 1);
                    }
                    3 => lp.constrain_positive(3 * idx + 2),
                    4 => lp.constrain_oct(3 * idx + 1, 3 * idx + 2),
                    5 => {
                        lp.constrain_zero(3 * idx + 1);
                        lp.constrain_oct(3 * idx, 3 * idx + 2);
                    }
                    _ => {
                        lp.constrain_zero(3 * idx + 2);
                        lp.constrain_oct(3 * idx, 3 * idx + 1);
                    }
                }
            } else {
                let s = c.next_slot[level];
                c.slot[level + 1] = s;
                c.lps[s].constrain_positive(2 * n + idx);
            }

            // The all-zero type vector is never a solution.
            if self.last_non_zero.is_none() && level == c.n_types - 1 {
                c.types[idx] += 1;
                self.last_non_zero = Some(level);
                continue;
            }

            if c.lp_at(level + 1).is_feasible() {
                if level + 1 < c.n_types {
                    c.level += 1;
                } else {
                    self.solns.insert(&c.types);
                    self.solutions += 1;
                    return true;
                }
            } else {
                c.types[idx] += 1;
                self.last_non_zero = Some(level);
            }
        }
    }
}
