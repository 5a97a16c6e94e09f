//! Entry points for callers outside the crate.
//!
//! Every entry point validates its inputs, builds the initial tableau once,
//! picks an integer backend and runs one of the tree traversals. Results
//! hold an `Arc` to the triangulation, so a borrowed triangulation is
//! copied once into shared ownership.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use nalgebra::DMatrix;

use crate::angle::AngleStructure;
use crate::constraints::{BanConstraint, BanList, LpConstraint};
use crate::coords::CoordinateSystem;
use crate::error::{Error, Result};
use crate::integer::{ExactInteger, LpInteger};
use crate::lp::InitialTableaux;
use crate::matching::matching_equations;
use crate::surface::NormalSurface;
use crate::traversal::{
    Backend, CancelFlag, Outcome, SearchCommand, TautEnumeration, TraversalCfg, TreeEnumeration, TreeSingleSoln,
};
use crate::triangulation::Triangulation;

/// A triangulation that is either shared or borrowed for the duration of a
/// call.
#[derive(Clone, Debug)]
pub enum TriHandle<'a> {
    Owned(Arc<Triangulation>),
    Borrowed(&'a Triangulation),
}

impl TriHandle<'_> {
    pub fn get(&self) -> &Triangulation {
        match self {
            Self::Owned(tri) => tri,
            Self::Borrowed(tri) => tri,
        }
    }

    /// Shared ownership, cloning a borrowed triangulation.
    pub fn shared(&self) -> Arc<Triangulation> {
        match self {
            Self::Owned(tri) => Arc::clone(tri),
            Self::Borrowed(tri) => Arc::new((*tri).clone()),
        }
    }
}

impl From<Arc<Triangulation>> for TriHandle<'_> {
    fn from(tri: Arc<Triangulation>) -> Self {
        Self::Owned(tri)
    }
}

impl From<Triangulation> for TriHandle<'_> {
    fn from(tri: Triangulation) -> Self {
        Self::Owned(Arc::new(tri))
    }
}

impl<'a> From<&'a Triangulation> for TriHandle<'a> {
    fn from(tri: &'a Triangulation) -> Self {
        Self::Borrowed(tri)
    }
}

/// Sign condition on the Euler characteristic of a single solution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EulerTarget {
    Positive,
    Zero,
    #[default]
    Any,
}

impl EulerTarget {
    fn constraint(self) -> LpConstraint {
        match self {
            Self::Positive => LpConstraint::EulerPositive,
            Self::Zero => LpConstraint::EulerZero,
            Self::Any => LpConstraint::None,
        }
    }
}

fn check_triangulation(tri: &Triangulation) -> Result<()> {
    if tri.is_valid() {
        return Ok(());
    }
    let reason = if tri.edges().iter().any(|e| !e.valid) {
        "an edge is identified with itself in reverse"
    } else {
        "a vertex link is neither a sphere, a disc nor a closed surface"
    };
    Err(Error::InvalidTriangulation { reason: reason.into() })
}

/// The constraint actually used: closed variants always carry the slope
/// conditions.
fn effective_constraint(coords: CoordinateSystem, requested: LpConstraint) -> Result<LpConstraint> {
    let constraint = match (coords.is_closed_variant(), requested) {
        (true, LpConstraint::None) => LpConstraint::NonSpun,
        (_, c) => c,
    };
    if !constraint.supported(coords) {
        return Err(Error::coords(coords, format!("constraint {constraint:?} is not supported")));
    }
    Ok(constraint)
}

fn check_ban(tri: &Triangulation, coords: CoordinateSystem, ban: &BanConstraint) -> Result<()> {
    if !ban.supported(coords) {
        return Err(Error::coords(coords, format!("ban {ban:?} is not supported")));
    }
    ban.validate(tri)
}

/// Native words are used only without extra constraints, and only when the
/// tableau bound proves them safe.
fn resolve_backend(
    requested: Backend,
    constraint: LpConstraint,
    coords: CoordinateSystem,
    tableaux: &InitialTableaux<'_>,
) -> Backend {
    use CoordinateSystem::*;
    match requested {
        Backend::Auto if constraint == LpConstraint::None && matches!(coords, Standard | Quad | AlmostNormal | QuadOct) => {
            let bound = tableaux.worst_case_bound(coords);
            if bound <= i64::MAX {
                Backend::Native64
            } else if bound <= ExactInteger::from(i128::MAX) {
                Backend::Native128
            } else {
                Backend::Exact
            }
        }
        Backend::Auto => Backend::Exact,
        other => other,
    }
}

/// Outcome of a search with no nodes; a flag that is already set still
/// reports the search as cancelled.
fn empty_outcome(cancel: Option<&AtomicBool>) -> Outcome {
    Outcome {
        cancelled: cancel.map(CancelFlag::new).is_some_and(|c| c.is_set()),
        ..Outcome::default()
    }
}

/// Enumerates the vertex surfaces of `coords` on `tri`, handing each one to
/// `sink` in a deterministic order.
///
/// The closed quad systems add the non-spun constraint automatically. An
/// empty triangulation, or constraints that no surface satisfies, yield no
/// surfaces.
pub fn enumerate<'t>(
    tri: impl Into<TriHandle<'t>>,
    coords: CoordinateSystem,
    cfg: &TraversalCfg,
    sink: impl FnMut(NormalSurface) -> SearchCommand,
    cancel: Option<&AtomicBool>,
) -> Result<Outcome> {
    let handle = tri.into();
    let tri = handle.get();
    check_triangulation(tri)?;
    if !coords.supports_traversal() {
        return Err(Error::coords(coords, "view-only systems cannot be enumerated"));
    }
    let constraint = effective_constraint(coords, cfg.constraint)?;
    check_ban(tri, coords, &cfg.ban)?;
    if tri.is_empty() {
        tracing::debug!(%coords, "empty triangulation");
        return Ok(empty_outcome(cancel));
    }

    let tableaux = InitialTableaux::new(tri, coords, constraint, true)?;
    let bans = cfg.ban.build(&tableaux);
    let backend = resolve_backend(cfg.backend, constraint, coords, &tableaux);
    tracing::debug!(%coords, tets = tri.size(), rank = tableaux.rank(), ?backend, "enumeration start");
    let shared = handle.shared();
    let cancel = cancel.map(CancelFlag::new);
    let outcome = match backend {
        Backend::Native64 => run_enumeration::<i64>(&tableaux, shared, coords, bans, cancel, sink),
        Backend::Native128 => run_enumeration::<i128>(&tableaux, shared, coords, bans, cancel, sink),
        Backend::Auto | Backend::Exact => run_enumeration::<ExactInteger>(&tableaux, shared, coords, bans, cancel, sink),
    };
    tracing::debug!(
        %coords,
        count = outcome.count,
        visited = outcome.visited,
        cancelled = outcome.cancelled,
        "enumeration finished"
    );
    Ok(outcome)
}

fn run_enumeration<'a, I: LpInteger>(
    tableaux: &'a InitialTableaux<'a>,
    tri: Arc<Triangulation>,
    coords: CoordinateSystem,
    bans: BanList,
    cancel: Option<CancelFlag<'a>>,
    sink: impl FnMut(NormalSurface) -> SearchCommand,
) -> Outcome {
    TreeEnumeration::<I>::new(tableaux, tri, coords, bans, cancel).run(sink)
}

/// Searches for one surface that is not a union of vertex links and whose
/// Euler characteristic meets `target`, in `Standard` or `AlmostNormal`
/// coordinates. Candidates rejected by `accept` are skipped.
///
/// The search itself only zeroes some triangle type, which rules out
/// vertex links on one-vertex triangulations alone; with more vertices the
/// links of the other vertices come back as candidates and are skipped
/// here.
pub fn find_single_solution<'t>(
    tri: impl Into<TriHandle<'t>>,
    coords: CoordinateSystem,
    target: EulerTarget,
    mut accept: impl FnMut(&NormalSurface) -> bool,
    cancel: Option<&AtomicBool>,
) -> Result<(Option<NormalSurface>, Outcome)> {
    let handle = tri.into();
    let tri = handle.get();
    check_triangulation(tri)?;
    if !coords.stores_triangles() {
        return Err(Error::coords(coords, "single solutions need triangle coordinates"));
    }
    let constraint = effective_constraint(coords, target.constraint())?;
    if tri.is_empty() {
        return Ok((None, empty_outcome(cancel)));
    }

    let tableaux = InitialTableaux::new(tri, coords, constraint, false)?;
    let bans = BanConstraint::None.build(&tableaux);
    let backend = resolve_backend(Backend::Auto, constraint, coords, &tableaux);
    tracing::debug!(%coords, tets = tri.size(), ?target, ?backend, "single solution start");
    let shared = handle.shared();
    let cancel = cancel.map(CancelFlag::new);
    let accept = |s: &NormalSurface| !s.is_vertex_linking() && accept(s);
    let found = match backend {
        Backend::Native64 => run_single::<i64>(&tableaux, shared, coords, bans, cancel, accept),
        Backend::Native128 => run_single::<i128>(&tableaux, shared, coords, bans, cancel, accept),
        Backend::Auto | Backend::Exact => run_single::<ExactInteger>(&tableaux, shared, coords, bans, cancel, accept),
    };
    tracing::debug!(%coords, found = found.0.is_some(), visited = found.1.visited, "single solution finished");
    Ok(found)
}

fn run_single<'a, I: LpInteger>(
    tableaux: &'a InitialTableaux<'a>,
    tri: Arc<Triangulation>,
    coords: CoordinateSystem,
    bans: BanList,
    cancel: Option<CancelFlag<'a>>,
    accept: impl FnMut(&NormalSurface) -> bool,
) -> (Option<NormalSurface>, Outcome) {
    let mut search = TreeSingleSoln::<I>::new(tableaux, tri, coords, bans, cancel);
    let found = search.find_with(accept);
    (found, search.outcome())
}

/// Enumerates the taut angle structures of `tri`.
pub fn enumerate_taut<'t>(
    tri: impl Into<TriHandle<'t>>,
    sink: impl FnMut(AngleStructure) -> SearchCommand,
    cancel: Option<&AtomicBool>,
) -> Result<Outcome> {
    let handle = tri.into();
    let tri = handle.get();
    check_triangulation(tri)?;
    if tri.is_empty() {
        return Ok(empty_outcome(cancel));
    }
    let tableaux = InitialTableaux::new(tri, CoordinateSystem::Angle, LpConstraint::None, true)?;
    tracing::debug!(tets = tri.size(), rank = tableaux.rank(), "taut enumeration start");
    let cancel = cancel.map(CancelFlag::new);
    let outcome = TautEnumeration::<ExactInteger>::new(&tableaux, handle.shared(), cancel).run(sink);
    tracing::debug!(count = outcome.count, visited = outcome.visited, "taut enumeration finished");
    Ok(outcome)
}

/// The matching equations (or angle equations) of `coords` on `tri`.
pub fn recreate_matching_equations(tri: &Triangulation, coords: CoordinateSystem) -> Result<DMatrix<i64>> {
    matching_equations(tri, coords)
}

/// Every vertex surface, collected.
pub fn enumerate_vertex_surfaces<'t>(
    tri: impl Into<TriHandle<'t>>,
    coords: CoordinateSystem,
) -> Result<Vec<NormalSurface>> {
    Ok(SurfaceList::enumerate(tri, coords, &TraversalCfg::default())?.surfaces)
}

/// Vertex surfaces together with the triangulation they live in.
#[derive(Clone, Debug)]
pub struct SurfaceList {
    tri: Arc<Triangulation>,
    coords: CoordinateSystem,
    surfaces: Vec<NormalSurface>,
    outcome: Outcome,
}

impl SurfaceList {
    pub fn enumerate<'t>(tri: impl Into<TriHandle<'t>>, coords: CoordinateSystem, cfg: &TraversalCfg) -> Result<Self> {
        let handle: TriHandle<'t> = tri.into();
        let shared = TriHandle::Owned(handle.shared());
        let mut surfaces = Vec::new();
        let outcome = enumerate(
            shared.clone(),
            coords,
            cfg,
            |s| {
                surfaces.push(s);
                SearchCommand::Continue
            },
            None,
        )?;
        Ok(Self {
            tri: shared.shared(),
            coords,
            surfaces,
            outcome,
        })
    }

    pub fn triangulation(&self) -> &Arc<Triangulation> {
        &self.tri
    }

    pub fn coords(&self) -> CoordinateSystem {
        self.coords
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn surfaces(&self) -> &[NormalSurface] {
        &self.surfaces
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalSurface> {
        self.surfaces.iter()
    }
}

impl<'a> IntoIterator for &'a SurfaceList {
    type Item = &'a NormalSurface;
    type IntoIter = std::slice::Iter<'a, NormalSurface>;

    fn into_iter(self) -> Self::IntoIter {
        self.surfaces.iter()
    }
}
