//! Search for one non-trivial solution, pruning with fail-first.

use std::sync::Arc;

use crate::constraints::BanList;
use crate::coords::CoordinateSystem;
use crate::integer::LpInteger;
use crate::lp::InitialTableaux;
use crate::surface::NormalSurface;
use crate::triangulation::Triangulation;

use super::cfg::{FAIL_FIRST_INITIAL, SINGLE_OCT_BRANCHES, SINGLE_QUAD_BRANCHES, TRIANGLE_BRANCHES};
use super::state::TraversalCore;
use super::types::{CancelFlag, OctagonToken, Outcome};

/// Finds a solution in which some unmarked triangle type is zero, in a
/// standard or almost normal standard system. On a one-vertex
/// triangulation such a solution is not a union of vertex links; with more
/// vertices it may be the link of another vertex, so callers filter those
/// through `find_with`.
///
/// Quad slot types differ from enumeration: type 1 means quads 2 and 3
/// are zero and quad 1 is unconstrained, so types 0 and 1 are merged.
/// The first levels fix triangle types; below that the quad slot with the
/// fewest feasible branches is decided next.
pub struct TreeSingleSoln<'a, I: LpInteger> {
    core: TraversalCore<'a, I>,
    next_zero_level: usize,
    started: bool,
    finished: bool,
    cancelled: bool,
    found: usize,
}

impl<'a, I: LpInteger> TreeSingleSoln<'a, I> {
    pub fn new(
        tableaux: &'a InitialTableaux<'a>,
        tri: Arc<Triangulation>,
        coords: CoordinateSystem,
        bans: BanList,
        cancel: Option<CancelFlag<'a>>,
    ) -> Self {
        let quad_branches = if coords.stores_octagons() {
            SINGLE_OCT_BRANCHES
        } else {
            SINGLE_QUAD_BRANCHES
        };
        Self {
            core: TraversalCore::new(tableaux, tri, coords, bans, quad_branches, TRIANGLE_BRANCHES, cancel),
            next_zero_level: 0,
            started: false,
            finished: false,
            cancelled: false,
            found: 0,
        }
    }

    pub fn visited(&self) -> u64 {
        self.core.visited
    }

    pub fn outcome(&self) -> Outcome {
        Outcome {
            count: self.found,
            cancelled: self.cancelled,
            visited: self.core.visited,
        }
    }

    /// Runs until the first solution. The solution is then available from
    /// [`Self::build_surface`].
    pub fn find(&mut self) -> bool {
        self.find_with(|_| true).is_some()
    }

    pub fn build_surface(&self) -> NormalSurface {
        self.core.build_surface()
    }

    /// Runs until a solution passes `accept`, resuming the search after
    /// each rejected candidate.
    pub fn find_with(&mut self, mut accept: impl FnMut(&NormalSurface) -> bool) -> Option<NormalSurface> {
        if self.finished {
            return None;
        }
        let result = self.search(&mut accept);
        if result.is_none() {
            self.finished = true;
        } else {
            self.found += 1;
        }
        result
    }

    /// First unmarked triangle slot at or after `start`.
    fn next_unmarked_triangle(&self, start: usize) -> Option<usize> {
        let c = &self.core;
        (start..c.n_types).find(|&t| !c.bans.marked(2 * c.n_tets + t))
    }

    fn search(&mut self, accept: &mut dyn FnMut(&NormalSurface) -> bool) -> Option<NormalSurface> {
        if !self.started {
            self.started = true;
            if !self.core.init_root().is_feasible() {
                return None;
            }
            let first = self.next_unmarked_triangle(self.core.n_tets)?;
            self.core.set_next_from(0, first);
            self.core.level = 0;
        } else {
            // Resume after a rejected leaf.
            let idx = self.core.order[self.core.level];
            self.core.types[idx] += 1;
        }

        let n = self.core.n_tets;
        loop {
            if self.core.cancelled() {
                tracing::info!(visited = self.core.visited, "single solution search cancelled");
                self.cancelled = true;
                return None;
            }
            let c = &mut self.core;
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
                    return None;
                }
                c.level -= 1;
                let up = c.order[c.level];
                c.types[up] += 1;
                continue;
            }

            c.visited += 1;
            if c.types[idx] == 0 {
                let next = c.next_slot[level];
                if idx < n {
                    c.types[idx] = 1;
                    if c.oct == OctagonToken::Free {
                        c.next_slot[level + 1] = next + 5;
                        c.clone_level(next + 1, level);
                        c.clone_level(next + 2, level);
                        c.clone_level(next + 3, level);
                        c.lp_at(level).constrain_zero(3 * idx + 2);
                        c.clone_level(next, level);
                        c.clone_level(next + 4, level);
                        c.lp_at(level).constrain_zero(3 * idx + 1);
                    } else {
                        c.next_slot[level + 1] = next + 2;
                        c.clone_level(next + 1, level);
                        c.lp_at(level).constrain_zero(3 * idx + 2);
                        c.clone_level(next, level);
                        c.lp_at(level).constrain_zero(3 * idx + 1);
                    }
                } else {
                    c.slot[level + 1] = c.slot[level];
                    c.next_slot[level + 1] = next + 1;
                    c.clone_level(next, level);
                    c.lp_at(level).constrain_zero(2 * n + idx);
                }
            }
            if c.types[idx] != 0 {
                if idx < n {
                    let t = c.types[idx];
                    let s = if t == 1 {
                        c.slot[level]
                    } else {
                        c.next_slot[level] + usize::from(t) - 2
                    };
                    c.slot[level + 1] = s;
                    let lp = &mut c.lps[s];
                    match t {
                        1 => {}
                        2 => {
                            lp.constrain_zero(3 * idx);
                            lp.constrain_positive(3 * idx + 1);
                        }
                        3 => {
                            lp.constrain_zero(3 * idx);
                            lp.constrain_zero(3 * idx + 1);
                            lp.constrain_positive(3 * idx + 2);
                        }
                        4 => {
                            lp.constrain_zero(3 * idx);
                            lp.constrain_oct(3 * idx + 1, 3 * idx + 2);
                        }
                        5 => {
                            lp.constrain_zero(3 * idx + 1);
                            lp.constrain_oct(3 * idx, 3 * idx + 2);
                        }
                        _ => lp.constrain_oct(3 * idx, 3 * idx + 1),
                    }
                } else {
                    let s = c.next_slot[level];
                    c.slot[level + 1] = s;
                    c.lps[s].constrain_positive(2 * n + idx);
                }
            }

            if !c.lp_at(level + 1).is_feasible() {
                c.types[idx] += 1;
                continue;
            }
            if level + 1 < c.n_types {
                if level == self.next_zero_level {
                    if self.core.types[idx] == 0 {
                        // Triangle forced to zero: decide its tetrahedron next.
                        self.core.set_next((idx - n) / 4);
                    } else {
                        let t = self.next_unmarked_triangle(idx + 1)?;
                        self.core.set_next(t);
                        self.next_zero_level += 1;
                    }
                } else if self.core.order[level + 1] < n {
                    self.fail_first();
                }
                self.core.level += 1;
                continue;
            }

            if let Some(surface) = self.leaf(accept) {
                return Some(surface);
            }
            let idx = self.core.order[self.core.level];
            self.core.types[idx] += 1;
        }
    }

    /// Decides next the remaining quad slot with the fewest feasible
    /// branches; ties keep the earliest in the current order.
    fn fail_first(&mut self) {
        let c = &mut self.core;
        let mut best = None;
        let mut min_branches = FAIL_FIRST_INITIAL;
        for i in c.level + 1..c.n_types {
            let quad = c.order[i];
            if quad >= c.n_tets {
                continue;
            }
            let branches = c.feasible_branches(quad);
            if branches < min_branches {
                min_branches = branches;
                best = Some(quad);
                if branches == 0 {
                    break;
                }
            }
        }
        if let Some(quad) = best {
            c.set_next(quad);
        }
    }

    /// Settles every type-1 quad at the leaf (zero if possible, else
    /// positive) and offers the surface to `accept`. The type vector is
    /// restored afterwards so the search can resume.
    fn leaf(&mut self, accept: &mut dyn FnMut(&NormalSurface) -> bool) -> Option<NormalSurface> {
        let saved = self.core.types.clone();
        let leaf = self.core.slot[self.core.n_types];
        for i in 0..self.core.n_tets {
            if self.core.types[i] != 1 {
                continue;
            }
            let scratch = self.core.scratch_from_leaf();
            scratch.constrain_zero(3 * i);
            if scratch.is_feasible() {
                self.core.lps[leaf].constrain_zero(3 * i);
                self.core.types[i] = 0;
            } else {
                self.core.lps[leaf].constrain_positive(3 * i);
            }
        }
        let surface = self.core.build_surface();
        self.core.types = saved;
        if accept(&surface) {
            tracing::trace!(visited = self.core.visited, "single solution");
            Some(surface)
        } else {
            tracing::trace!("candidate rejected");
            None
        }
    }
}
