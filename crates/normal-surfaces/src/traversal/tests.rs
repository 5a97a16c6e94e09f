use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use proptest::prelude::*;

use super::*;
use crate::api::{enumerate, enumerate_taut, enumerate_vertex_surfaces, find_single_solution, EulerTarget};
use crate::constraints::{BanConstraint, LpConstraint};
use crate::coords::CoordinateSystem::{self, *};
use crate::error::Error;
use crate::integer::ExactInteger;
use crate::lp::InitialTableaux;
use crate::perm::Perm4;
use crate::surface::NormalSurface;
use crate::triangulation::{examples, Triangulation};

fn collect(tri: &Triangulation, coords: CoordinateSystem, cfg: &TraversalCfg) -> Vec<NormalSurface> {
    let mut out = Vec::new();
    enumerate(
        tri,
        coords,
        cfg,
        |s| {
            out.push(s);
            SearchCommand::Continue
        },
        None,
    )
    .unwrap();
    out
}

fn count(tri: &Triangulation, coords: CoordinateSystem) -> usize {
    enumerate_vertex_surfaces(tri, coords).unwrap().len()
}

fn taut_count(tri: &Triangulation) -> usize {
    enumerate_taut(tri, |_| SearchCommand::Continue, None).unwrap().count
}

fn is_primitive(s: &NormalSurface) -> bool {
    s.vector().iter().fold(ExactInteger::ZERO, |g, x| g.gcd(x)) == 1
}

/// At most one quad or octagon per tetrahedron, and at most one octagon
/// overall.
fn quad_constraint_holds(s: &NormalSurface) -> bool {
    let n = s.triangulation().size();
    let mut octagons = 0;
    for tet in 0..n {
        let quads = (0..3).filter(|&k| !s.quads(tet, k).is_zero()).count();
        let octs = (0..3).filter(|&k| !s.octs(tet, k).is_zero()).count();
        if quads + octs > 1 {
            return false;
        }
        octagons += octs;
    }
    octagons <= 1
}

fn check_surfaces(tri: &Triangulation, coords: CoordinateSystem) {
    for s in enumerate_vertex_surfaces(tri, coords).unwrap() {
        assert!(s.satisfies_matching(), "{coords}: {s}");
        assert!(is_primitive(&s), "{coords}: {s}");
        assert!(quad_constraint_holds(&s), "{coords}: {s}");
        assert!(s.vector().iter().all(|x| !x.is_negative()));
        assert!(!s.is_empty());
    }
}

fn named() -> Vec<(&'static str, Triangulation)> {
    vec![
        ("ball", examples::ball()),
        ("s3", examples::layered_loop(1, false).unwrap()),
        ("c2", examples::layered_loop(2, false).unwrap()),
        ("tw3", examples::layered_loop(3, true).unwrap()),
        ("fig8", examples::figure_eight().unwrap()),
        ("gieseking", examples::gieseking().unwrap()),
        ("kxi", examples::twisted_kxi().unwrap()),
    ]
}

#[test]
fn quad_vertex_counts() {
    let expected = [("ball", 3), ("s3", 1), ("c2", 3), ("tw3", 4), ("fig8", 4), ("gieseking", 0), ("kxi", 6)];
    for ((name, tri), (_, want)) in named().iter().zip(expected) {
        assert_eq!(count(tri, Quad), want, "{name}");
    }
}

#[test]
fn standard_vertex_counts() {
    let expected = [("ball", 7), ("s3", 3), ("c2", 5), ("fig8", 1), ("gieseking", 1), ("kxi", 8)];
    for (name, want) in expected {
        let tri = named().into_iter().find(|(n, _)| *n == name).map(|(_, t)| t).unwrap();
        assert_eq!(count(&tri, Standard), want, "{name}");
    }
}

#[test]
fn almost_normal_vertex_counts() {
    assert_eq!(count(&examples::ball(), AlmostNormal), 10);
    assert_eq!(count(&examples::layered_loop(1, false).unwrap(), AlmostNormal), 4);
    assert_eq!(count(&examples::layered_loop(2, false).unwrap(), AlmostNormal), 5);
    assert_eq!(count(&examples::twisted_kxi().unwrap(), AlmostNormal), 13);
}

#[test]
fn closed_quad_counts() {
    assert_eq!(count(&examples::figure_eight().unwrap(), QuadClosed), 0);
    assert_eq!(count(&examples::layered_loop(1, false).unwrap(), QuadClosed), 1);
}

#[test]
fn taut_counts() {
    assert_eq!(taut_count(&examples::empty()), 0);
    assert_eq!(taut_count(&examples::ball()), 3);
    assert_eq!(taut_count(&examples::layered_loop(2, false).unwrap()), 0);
    assert_eq!(taut_count(&examples::figure_eight().unwrap()), 3);
    assert_eq!(taut_count(&examples::gieseking().unwrap()), 3);
}

#[test]
fn taut_structures_are_taut() {
    let tri = examples::figure_eight().unwrap();
    enumerate_taut(
        &tri,
        |a| {
            assert!(a.is_taut(), "{a}");
            assert!(!a.is_strict());
            SearchCommand::Continue
        },
        None,
    )
    .unwrap();
}

#[test]
fn empty_triangulation_has_nothing() {
    let tri = examples::empty();
    for coords in [Standard, Quad, QuadClosed, AlmostNormal, QuadOct, QuadOctClosed] {
        assert_eq!(count(&tri, coords), 0, "{coords}");
    }
}

#[test]
fn vertex_surfaces_are_valid() {
    for (_, tri) in named() {
        for coords in [Standard, Quad, AlmostNormal, QuadOct] {
            check_surfaces(&tri, coords);
        }
    }
}

#[test]
fn octagonal_sphere_in_s3() {
    let tri = examples::layered_loop(1, false).unwrap();
    let with_oct: Vec<_> = enumerate_vertex_surfaces(&tri, AlmostNormal)
        .unwrap()
        .into_iter()
        .filter(|s| s.octagon_position().is_some())
        .collect();
    assert_eq!(with_oct.len(), 1);
    assert_eq!(with_oct[0].euler_char(), Some(2.into()));
    assert_eq!(with_oct[0].is_central(), Some(1));
}

#[test]
fn figure_eight_quads_are_spun() {
    let tri = examples::figure_eight().unwrap();
    let surfaces = enumerate_vertex_surfaces(&tri, Quad).unwrap();
    assert!(surfaces.iter().all(|s| !s.is_compact()));
    let std = enumerate_vertex_surfaces(&tri, Standard).unwrap();
    assert!(std[0].is_vertex_linking());
    assert_eq!(std[0].euler_char(), Some(ExactInteger::ZERO));
}

#[test]
fn quad_surfaces_match_standard_ones_on_closed_inputs() {
    for tri in [examples::layered_loop(1, false).unwrap(), examples::layered_loop(2, false).unwrap()] {
        let quads = enumerate_vertex_surfaces(&tri, Quad).unwrap();
        let std = enumerate_vertex_surfaces(&tri, Standard).unwrap();
        let non_links: Vec<_> = std.iter().filter(|s| !s.is_vertex_linking()).collect();
        assert_eq!(quads.len(), non_links.len());
        for q in &quads {
            let full = q.reconstruct().unwrap();
            assert_eq!(full.project().vector(), q.vector());
            assert!(std.contains(&full), "{full}");
        }
    }
}

#[test]
fn enumeration_is_deterministic() {
    let tri = examples::twisted_kxi().unwrap();
    for coords in [Standard, Quad, AlmostNormal] {
        let a = collect(&tri, coords, &TraversalCfg::default());
        let b = collect(&tri, coords, &TraversalCfg::default());
        assert_eq!(a, b);
    }
}

#[test]
fn backends_agree() {
    let tri = examples::twisted_kxi().unwrap();
    for coords in [Standard, Quad, AlmostNormal] {
        let lists: Vec<_> = [Backend::Native64, Backend::Native128, Backend::Exact]
            .into_iter()
            .map(|backend| {
                let cfg = TraversalCfg {
                    backend,
                    ..TraversalCfg::default()
                };
                collect(&tri, coords, &cfg)
            })
            .collect();
        assert_eq!(lists[0], lists[1]);
        assert_eq!(lists[0], lists[2]);
    }
}

#[test]
fn sink_can_stop_early() {
    let tri = examples::twisted_kxi().unwrap();
    let mut seen = 0;
    let outcome = enumerate(
        &tri,
        Standard,
        &TraversalCfg::default(),
        |_| {
            seen += 1;
            SearchCommand::Stop
        },
        None,
    )
    .unwrap();
    assert_eq!(seen, 1);
    assert_eq!(outcome.count, 1);
    assert!(!outcome.cancelled);
}

#[test]
fn cancelled_before_the_first_node() {
    let tri = examples::twisted_kxi().unwrap();
    let flag = AtomicBool::new(true);
    let outcome = enumerate(
        &tri,
        Standard,
        &TraversalCfg::default(),
        |_| SearchCommand::Continue,
        Some(&flag),
    )
    .unwrap();
    assert_eq!(outcome.count, 0);
    assert!(outcome.cancelled);

    let taut = enumerate_taut(&examples::figure_eight().unwrap(), |_| SearchCommand::Continue, Some(&flag)).unwrap();
    assert_eq!(taut.count, 0);
    assert!(taut.cancelled);
}

#[test]
fn cancelled_flag_is_reported_on_empty_input() {
    let flag = AtomicBool::new(true);
    let empty = examples::empty();
    let outcome = enumerate(&empty, Quad, &TraversalCfg::default(), |_| SearchCommand::Continue, Some(&flag)).unwrap();
    assert_eq!((outcome.count, outcome.cancelled), (0, true));
    let taut = enumerate_taut(&empty, |_| SearchCommand::Continue, Some(&flag)).unwrap();
    assert!(taut.cancelled);
    let (found, single) = find_single_solution(&empty, Standard, EulerTarget::Any, |_| true, Some(&flag)).unwrap();
    assert!(found.is_none() && single.cancelled);

    let unset = AtomicBool::new(false);
    let outcome = enumerate(&empty, Quad, &TraversalCfg::default(), |_| SearchCommand::Continue, Some(&unset)).unwrap();
    assert!(!outcome.cancelled);
}

#[test]
fn euler_positive_surfaces_verify() {
    let tri = examples::layered_loop(2, false).unwrap();
    let cfg = TraversalCfg {
        constraint: LpConstraint::EulerPositive,
        ..TraversalCfg::default()
    };
    let surfaces = collect(&tri, Standard, &cfg);
    assert!(!surfaces.is_empty());
    for s in &surfaces {
        assert!(LpConstraint::EulerPositive.verify(s), "{s}");
    }
}

#[test]
fn boundary_ban_leaves_nothing_in_a_ball() {
    let cfg = TraversalCfg {
        ban: BanConstraint::Boundary,
        ..TraversalCfg::default()
    };
    assert!(collect(&examples::ball(), Standard, &cfg).is_empty());
}

#[test]
fn api_rejects_bad_requests() {
    let ball = examples::ball();
    let cfg = TraversalCfg {
        ban: BanConstraint::Edges(vec![6]),
        ..TraversalCfg::default()
    };
    let err = enumerate(&ball, Quad, &cfg, |_| SearchCommand::Continue, None).unwrap_err();
    assert!(matches!(err, Error::InvalidBan { .. }));

    let err = enumerate(&ball, EdgeWeight, &TraversalCfg::default(), |_| SearchCommand::Continue, None).unwrap_err();
    assert!(matches!(err, Error::InvalidCoordinateSystem { .. }));

    let cfg = TraversalCfg {
        constraint: LpConstraint::EulerPositive,
        ..TraversalCfg::default()
    };
    let err = enumerate(&ball, Quad, &cfg, |_| SearchCommand::Continue, None).unwrap_err();
    assert!(matches!(err, Error::InvalidCoordinateSystem { .. }));

    let mut folded = Triangulation::new(1);
    folded.join(0, 0, 0, Perm4::from_images([1, 0, 3, 2]).unwrap()).unwrap();
    let err = enumerate(&folded, Quad, &TraversalCfg::default(), |_| SearchCommand::Continue, None).unwrap_err();
    assert!(matches!(err, Error::InvalidTriangulation { .. }));
}

#[test]
fn single_solution_avoids_vertex_links() {
    let tri = examples::layered_loop(1, false).unwrap();
    let (found, outcome) = find_single_solution(&tri, Standard, EulerTarget::Any, |_| true, None).unwrap();
    let s = found.unwrap();
    assert!(!s.is_vertex_linking());
    assert!(s.satisfies_matching());
    assert_eq!(outcome.count, 1);

    let (found, _) = find_single_solution(&tri, Standard, EulerTarget::Positive, |_| true, None).unwrap();
    let s = found.unwrap();
    assert!(!s.is_vertex_linking());
    assert!(s.euler_char().unwrap() > 0);
}

#[test]
fn single_solution_skips_links_of_other_vertices() {
    let tri = examples::lens_3_1().unwrap();
    assert_eq!(tri.vertices().len(), 2);
    let (found, outcome) = find_single_solution(&tri, Standard, EulerTarget::Positive, |_| true, None).unwrap();
    let s = found.unwrap();
    assert!(!s.is_vertex_linking(), "{s}");
    assert!(s.euler_char().unwrap() > 0);
    assert_eq!(outcome.count, 1);
}

#[test]
fn single_solution_may_find_nothing() {
    let tri = examples::figure_eight().unwrap();
    let (found, outcome) = find_single_solution(&tri, Standard, EulerTarget::Positive, |_| true, None).unwrap();
    assert!(found.is_none());
    assert!(!outcome.cancelled);
    assert!(find_single_solution(&tri, Quad, EulerTarget::Any, |_| true, None).is_err());
}

#[test]
fn single_solution_skips_rejected_candidates() {
    let tri = examples::layered_loop(1, false).unwrap();
    let mut seen = 0;
    let (found, _) = find_single_solution(
        &tri,
        AlmostNormal,
        EulerTarget::Any,
        |s| {
            seen += 1;
            s.octagon_position().is_some()
        },
        None,
    )
    .unwrap();
    assert!(seen >= 1);
    let s = found.unwrap();
    assert!(s.octagon_position().is_some());
    assert_eq!(s.euler_char(), Some(2.into()));
}

#[test]
fn driving_a_search_by_hand() {
    let tri = examples::layered_loop(2, false).unwrap();
    let tableaux = InitialTableaux::new(&tri, Quad, LpConstraint::None, true).unwrap();
    let bans = BanConstraint::None.build(&tableaux);
    let mut search = TreeEnumeration::<i64>::new(&tableaux, Arc::new(tri.clone()), Quad, bans, None);
    let mut found = Vec::new();
    while search.next() {
        assert!(search.types().iter().any(|&t| t != 0));
        let p = search.percent();
        assert!((0.0..=100.0).contains(&p), "{p}");
        found.push(search.build_surface());
    }
    assert_eq!(found.len(), 3);
    assert_eq!(search.solutions(), 3);
    assert!(!search.next());
    assert!(search.visited() > 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn random_closed_surfaces_are_valid(n in 1usize..4, seed in 0u64..1000) {
        let tri = examples::random_closed(n, seed);
        prop_assume!(tri.is_valid());
        for coords in [Quad, Standard] {
            for s in enumerate_vertex_surfaces(&tri, coords).unwrap() {
                prop_assert!(s.satisfies_matching());
                prop_assert!(is_primitive(&s));
                prop_assert!(quad_constraint_holds(&s));
            }
        }
    }

    #[test]
    fn native_and_exact_agree_on_random_inputs(n in 1usize..4, seed in 0u64..1000) {
        let tri = examples::random_closed(n, seed);
        prop_assume!(tri.is_valid());
        let exact = TraversalCfg { backend: Backend::Exact, ..TraversalCfg::default() };
        let native = TraversalCfg { backend: Backend::Native64, ..TraversalCfg::default() };
        prop_assert_eq!(collect(&tri, Quad, &exact), collect(&tri, Quad, &native));
    }
}
