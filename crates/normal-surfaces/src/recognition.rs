//! Normal surface screens for 0-efficiency, 3-spheres and 3-balls.
//!
//! These are the parts of recognition that need no crushing or
//! simplification: when a decision would require either, the answer is
//! [`Recognition::Undecided`].

use crate::api::{enumerate_vertex_surfaces, find_single_solution, EulerTarget, TriHandle};
use crate::coords::CoordinateSystem;
use crate::error::{Error, Result};
use crate::surface::NormalSurface;
use crate::triangulation::Triangulation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Recognition {
    Yes,
    No,
    Undecided,
}

/// A sphere, a disc, or (in orientable triangulations) a one-sided
/// projective plane whose double is a sphere.
fn sphere_like(s: &NormalSurface, orientable: bool) -> Option<NormalSurface> {
    if s.is_vertex_linking() {
        return None;
    }
    let chi = s.euler_char()?;
    if chi == 2 || (chi == 1 && s.has_real_boundary()) {
        return Some(s.clone());
    }
    (chi == 1 && orientable).then(|| s.scaled(2))
}

/// A normal sphere or disc that is not vertex linking, if there is one.
///
/// One-vertex triangulations use a single-solution search with positive
/// Euler characteristic; others scan the standard vertex surfaces.
pub fn has_non_trivial_sphere_or_disc<'t>(tri: impl Into<TriHandle<'t>>) -> Result<Option<NormalSurface>> {
    let handle = tri.into();
    let t = handle.get();
    if t.is_empty() {
        return Ok(None);
    }
    let orientable = t.is_orientable();
    if t.vertices().len() == 1 {
        let (found, _) = find_single_solution(
            handle.clone(),
            CoordinateSystem::Standard,
            EulerTarget::Positive,
            |s| sphere_like(s, orientable).is_some(),
            None,
        )?;
        return Ok(found.and_then(|s| sphere_like(&s, orientable)));
    }
    let surfaces = enumerate_vertex_surfaces(handle, CoordinateSystem::Standard)?;
    Ok(surfaces.iter().find_map(|s| sphere_like(s, orientable)))
}

/// Whether every normal sphere and disc is vertex linking and no boundary
/// component is a sphere.
pub fn is_zero_efficient<'t>(tri: impl Into<TriHandle<'t>>) -> Result<bool> {
    let handle = tri.into();
    if handle.get().boundary_components().iter().any(|b| b.is_sphere()) {
        return Ok(false);
    }
    Ok(has_non_trivial_sphere_or_disc(handle)?.is_none())
}

/// An almost normal sphere with one octagon.
///
/// Requires a closed, orientable, connected triangulation; the search is
/// conclusive only when the triangulation is also 0-efficient.
pub fn find_almost_normal_sphere<'t>(tri: impl Into<TriHandle<'t>>) -> Result<Option<NormalSurface>> {
    let handle = tri.into();
    let t = handle.get();
    if !(t.is_closed() && t.is_orientable() && t.is_connected()) {
        return Err(Error::InvalidTriangulation {
            reason: "octagonal spheres are only sought in closed orientable connected triangulations".into(),
        });
    }
    let (found, _) = find_single_solution(
        handle,
        CoordinateSystem::AlmostNormal,
        EulerTarget::Positive,
        |s| s.octagon_position().is_some(),
        None,
    )?;
    Ok(found)
}

fn closed_candidate(tri: &Triangulation) -> bool {
    tri.is_valid() && tri.is_closed() && tri.is_orientable() && tri.is_connected() && !tri.is_empty()
}

/// 3-sphere screen.
///
/// A 0-efficient closed orientable triangulation with more than one vertex
/// is a 3-sphere; with one vertex it is a 3-sphere exactly when it holds an
/// octagonal almost normal sphere. Triangulations that are not 0-efficient
/// would need crushing.
pub fn sphere_recognition<'t>(tri: impl Into<TriHandle<'t>>) -> Result<Recognition> {
    let handle = tri.into();
    if !closed_candidate(handle.get()) {
        return Ok(Recognition::No);
    }
    if !is_zero_efficient(handle.clone())? {
        tracing::debug!("not 0-efficient; crushing needed");
        return Ok(Recognition::Undecided);
    }
    if handle.get().vertices().len() > 1 {
        return Ok(Recognition::Yes);
    }
    Ok(match find_almost_normal_sphere(handle)? {
        Some(_) => Recognition::Yes,
        None => Recognition::No,
    })
}

/// 3-ball screen: one sphere boundary component on a valid, connected,
/// orientable, non-ideal triangulation.
pub fn ball_recognition<'t>(tri: impl Into<TriHandle<'t>>) -> Result<Recognition> {
    let handle = tri.into();
    let t = handle.get();
    let bcs = t.boundary_components();
    let shape_ok = t.is_valid()
        && t.has_boundary_triangles()
        && t.is_orientable()
        && t.is_connected()
        && !t.is_ideal()
        && bcs.len() == 1
        && bcs[0].is_sphere();
    if !shape_ok {
        return Ok(Recognition::No);
    }
    if t.size() == 1 && t.count_boundary_triangles() == 4 {
        return Ok(Recognition::Yes);
    }
    Ok(Recognition::Undecided)
}
