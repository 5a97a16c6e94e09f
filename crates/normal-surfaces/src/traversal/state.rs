//! State shared by every search mode: type vector, type order, and the
//! pool of tableaux reused across levels.

use std::sync::Arc;

use crate::angle::AngleStructure;
use crate::constraints::BanList;
use crate::coords::CoordinateSystem;
use crate::integer::{ExactInteger, LpInteger};
use crate::lp::{InitialTableaux, LpData};
use crate::surface::NormalSurface;
use crate::triangulation::Triangulation;

use super::cfg::{PROGRESS_PRECISION, SCRATCH_TABLEAUX};
use super::types::{CancelFlag, OctagonToken};

/// Clones `lps[src]` into `lps[dst]`.
pub(super) fn clone_within<I: LpInteger>(lps: &mut [LpData<'_, I>], dst: usize, src: usize) {
    debug_assert_ne!(dst, src);
    if dst < src {
        let (lo, hi) = lps.split_at_mut(src);
        lo[dst].init_clone(&hi[0]);
    } else {
        let (lo, hi) = lps.split_at_mut(dst);
        hi[0].init_clone(&lo[src]);
    }
}

/// Slots `0..n` are quad (or angle) slots, one per tetrahedron; standard
/// systems add four triangle slots per tetrahedron after them. Triangle
/// slot `idx` controls tableau column `2n + idx`.
///
/// `slot[l]` is the pool index of the tableau that level `l` branches
/// from; `slot[n_types]` is the leaf. `next_slot[l]` is the first pool
/// index reserved for the sibling clones spun off at level `l`.
pub(super) struct TraversalCore<'a, I: LpInteger> {
    pub(super) tableaux: &'a InitialTableaux<'a>,
    tri: Arc<Triangulation>,
    coords: CoordinateSystem,
    pub(super) bans: BanList,
    pub(super) n_tets: usize,
    pub(super) n_types: usize,
    pub(super) types: Vec<u8>,
    pub(super) order: Vec<usize>,
    pub(super) level: usize,
    pub(super) oct: OctagonToken,
    pub(super) lps: Vec<LpData<'a, I>>,
    pub(super) slot: Vec<usize>,
    pub(super) next_slot: Vec<usize>,
    tmp: Vec<LpData<'a, I>>,
    pub(super) visited: u64,
    cancel: Option<CancelFlag<'a>>,
}

impl<'a, I: LpInteger> TraversalCore<'a, I> {
    /// `coords` is the system solutions are reported in; the tableau may
    /// use a smaller one (quads standing in for octagons).
    pub(super) fn new(
        tableaux: &'a InitialTableaux<'a>,
        tri: Arc<Triangulation>,
        coords: CoordinateSystem,
        bans: BanList,
        branches_per_quad: usize,
        branches_per_tri: usize,
        cancel: Option<CancelFlag<'a>>,
    ) -> Self {
        let n_tets = tableaux.tri().size();
        let triangles = coords.stores_triangles();
        let n_types = if triangles { 5 * n_tets } else { n_tets };
        let n_tableaux = if triangles {
            (branches_per_quad - 1) * n_tets + (branches_per_tri - 1) * 4 * n_tets + 1
        } else {
            (branches_per_quad - 1) * n_tets + 1
        };
        let mut slot = vec![0; n_types + 1];
        let mut next_slot = vec![0; n_types + 1];
        slot[0] = 0;
        next_slot[0] = 1;
        Self {
            tableaux,
            tri,
            coords,
            bans,
            n_tets,
            n_types,
            types: vec![0; n_types],
            order: (0..n_types).collect(),
            level: 0,
            oct: if coords.stores_octagons() {
                OctagonToken::Free
            } else {
                OctagonToken::Unavailable
            },
            lps: (0..n_tableaux).map(|_| LpData::new(tableaux)).collect(),
            slot,
            next_slot,
            tmp: (0..SCRATCH_TABLEAUX).map(|_| LpData::new(tableaux)).collect(),
            visited: 0,
            cancel,
        }
    }

    pub(super) fn cancelled(&self) -> bool {
        self.cancel.is_some_and(|c| c.is_set())
    }

    /// Tableau that level `l` branches from.
    pub(super) fn lp_at(&mut self, l: usize) -> &mut LpData<'a, I> {
        let s = self.slot[l];
        &mut self.lps[s]
    }

    /// Clones the tableau of level `l` into pool entry `dst`.
    pub(super) fn clone_level(&mut self, dst: usize, l: usize) {
        clone_within(&mut self.lps, dst, self.slot[l]);
    }

    /// Initialises the root tableau and applies the bans.
    pub(super) fn init_root(&mut self) -> &mut LpData<'a, I> {
        let root = &mut self.lps[0];
        root.init_start();
        self.bans.enforce(root);
        self.visited += 1;
        root
    }

    /// Moves `next` to position `start` of the type order, shifting the
    /// entries in between one place later.
    pub(super) fn set_next_from(&mut self, start: usize, next: usize) {
        if let Some(offset) = self.order[start..].iter().position(|&t| t == next) {
            self.order[start..=start + offset].rotate_right(1);
        }
    }

    /// Makes `next` the slot decided at the level after the current one.
    pub(super) fn set_next(&mut self, next: usize) {
        self.set_next_from(self.level + 1, next);
    }

    /// Number of feasible options for quad (or angle) slot `quad` below
    /// the current node, using scratch tableaux.
    pub(super) fn feasible_branches(&mut self, quad: usize) -> usize {
        let here = self.slot[self.level + 1];
        let count = |lps: &[LpData<'a, I>]| lps.iter().filter(|lp| lp.is_feasible()).count();
        if self.tableaux.system() == CoordinateSystem::Angle {
            // The angle equations already force one angle per tetrahedron
            // to be non-zero.
            self.tmp[0].init_clone(&self.lps[here]);
            clone_within(&mut self.tmp, 1, 0);
            self.tmp[1].constrain_zero(3 * quad);
            self.tmp[1].constrain_zero(3 * quad + 2);

            self.tmp[0].constrain_zero(3 * quad + 1);
            if !self.tmp[0].is_feasible() {
                return count(&self.tmp[1..2]);
            }
            clone_within(&mut self.tmp, 2, 0);
            self.tmp[2].constrain_zero(3 * quad);
            self.tmp[0].constrain_zero(3 * quad + 2);
            count(&self.tmp[..3])
        } else {
            self.tmp[0].init_clone(&self.lps[here]);
            clone_within(&mut self.tmp, 1, 0);
            self.tmp[1].constrain_zero(3 * quad + 1);
            self.tmp[1].constrain_zero(3 * quad + 2);
            self.tmp[1].constrain_positive(3 * quad);

            self.tmp[0].constrain_zero(3 * quad);
            if !self.tmp[0].is_feasible() {
                return count(&self.tmp[1..2]);
            }
            clone_within(&mut self.tmp, 2, 0);
            self.tmp[2].constrain_zero(3 * quad + 2);
            self.tmp[2].constrain_positive(3 * quad + 1);

            self.tmp[0].constrain_zero(3 * quad + 1);
            if !self.tmp[0].is_feasible() {
                return count(&self.tmp[1..3]);
            }
            clone_within(&mut self.tmp, 3, 0);
            self.tmp[3].constrain_positive(3 * quad + 2);
            self.tmp[0].constrain_zero(3 * quad + 2);
            count(&self.tmp[..4])
        }
    }

    /// Scratch tableau 0, for single leaf tests.
    pub(super) fn scratch_from_leaf(&mut self) -> &mut LpData<'a, I> {
        let leaf = self.slot[self.n_types];
        self.tmp[0].init_clone(&self.lps[leaf]);
        &mut self.tmp[0]
    }

    /// Rough fraction of the search tree already explored, in percent.
    pub(super) fn percent(&self) -> f64 {
        let mut percent = 0.0;
        let mut range = 100.0;
        let mut quads_remaining = self.n_tets;
        let angle = self.tableaux.system() == CoordinateSystem::Angle;
        for i in 0..self.n_types {
            if range <= PROGRESS_PRECISION {
                break;
            }
            let raw = self.types[self.order[i]];
            let t = f64::from(raw);
            if angle {
                range /= 3.0;
                if raw == 0 {
                    break;
                }
                percent += range * (t - 1.0);
            } else if self.order[i] >= self.n_tets {
                range /= 2.0;
                percent += range * t;
            } else {
                let den = (3 * quads_remaining + 4) as f64;
                let octagon_below = match self.oct {
                    OctagonToken::Free => true,
                    OctagonToken::At(l) => l > i,
                    OctagonToken::Unavailable => false,
                };
                if self.oct == OctagonToken::At(i) {
                    range /= den;
                    percent += range * ((den - 3.0) + (t - 4.0));
                } else if octagon_below {
                    range = range * (den - 3.0) / (4.0 * den);
                    percent += range * t;
                } else {
                    range /= 4.0;
                    percent += range * t;
                }
                quads_remaining -= 1;
            }
        }
        percent
    }

    /// Solution at the leaf, in the reporting coordinate system.
    pub(super) fn build_surface(&self) -> NormalSurface {
        let leaf = &self.lps[self.slot[self.n_types]];
        let v = leaf.extract_solution(&self.types);
        if !self.coords.stores_octagons() {
            return NormalSurface::new(Arc::clone(&self.tri), self.coords, v);
        }
        let n = self.n_tets;
        let (old, new, quad_at) = if self.coords.stores_triangles() {
            (7, 10, 4)
        } else {
            (3, 6, 0)
        };
        let mut an = vec![ExactInteger::ZERO; new * n];
        for i in 0..n {
            an[new * i..new * i + old].clone_from_slice(&v[old * i..old * (i + 1)]);
        }
        if let OctagonToken::At(l) = self.oct {
            let slot = self.order[l];
            let tet = self.tableaux.column_perm()[3 * slot] / old;
            let kind = usize::from(self.types[slot] - 4);
            an[new * tet + old + kind] = v[old * tet + quad_at + (kind + 1) % 3].clone();
            for j in 0..3 {
                an[new * tet + quad_at + j] = ExactInteger::ZERO;
            }
        }
        NormalSurface::new(Arc::clone(&self.tri), self.coords, an)
    }

    /// Angle structure at the leaf.
    pub(super) fn build_structure(&self) -> AngleStructure {
        let leaf = &self.lps[self.slot[self.n_types]];
        AngleStructure::new(Arc::clone(&self.tri), leaf.extract_solution(&self.types))
    }
}
