use super::*;
use crate::coords::CoordinateSystem;
use crate::error::Error;
use crate::lp::{InitialTableaux, LpData};
use crate::triangulation::examples;
use crate::triangulation::Triangulation;

/// Standard vector of the link of each vertex.
fn vertex_links(tri: &Triangulation) -> Vec<Vec<i64>> {
    tri.vertices()
        .iter()
        .map(|v| {
            let mut x = vec![0; 7 * tri.size()];
            for emb in &v.embeddings {
                x[7 * emb.tet + emb.vertices.at(0)] += 1;
            }
            x
        })
        .collect()
}

fn dot(a: &[i64], b: &[i64]) -> i64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[test]
fn euler_functional_on_vertex_links() {
    let cases = [
        (examples::layered_loop(1, false).unwrap(), 2),
        (examples::layered_loop(2, false).unwrap(), 2),
        (examples::layered_loop(3, true).unwrap(), 2),
        (examples::figure_eight().unwrap(), 0),
        (examples::gieseking().unwrap(), 0),
        (examples::twisted_kxi().unwrap(), 1),
        (examples::ball(), 1),
    ];
    for (tri, chi) in cases {
        let f = euler_functional(&tri);
        for link in vertex_links(&tri) {
            assert_eq!(dot(&f, &link), chi, "{}", tri.to_text());
        }
    }
}

#[test]
fn euler_functional_on_single_quad_in_ball() {
    let f = euler_functional(&examples::ball());
    // A lone quad is a disc.
    assert_eq!(&f[4..7], &[1, 1, 1]);
}

#[test]
fn slope_functional_counts() {
    let cases = [
        (examples::figure_eight().unwrap(), 2),
        (examples::gieseking().unwrap(), 1),
        (examples::layered_loop(1, false).unwrap(), 0),
        (examples::layered_loop(3, true).unwrap(), 0),
        (examples::twisted_kxi().unwrap(), 0),
    ];
    for (tri, expected) in cases {
        let rows = slope_functionals(&tri).unwrap();
        assert_eq!(rows.len(), expected);
        assert!(rows.iter().all(|r| r.len() == 3 * tri.size()));
    }
}

#[test]
fn constraint_support_by_system() {
    use CoordinateSystem::*;
    assert!(LpConstraint::EulerPositive.supported(Standard));
    assert!(LpConstraint::EulerPositive.supported(AlmostNormal));
    assert!(!LpConstraint::EulerPositive.supported(Quad));
    assert!(LpConstraint::EulerZero.supported(Standard));
    assert!(!LpConstraint::EulerZero.supported(AlmostNormal));
    assert!(LpConstraint::NonSpun.supported(Quad));
    assert!(LpConstraint::NonSpun.supported(QuadOct));
    assert!(!LpConstraint::NonSpun.supported(Standard));
    assert!(!LpConstraint::None.supported(EdgeWeight));
    assert_eq!(LpConstraint::EulerPositive.octagon_adjustment(), -1);
    assert_eq!(LpConstraint::NonSpun.octagon_adjustment(), 0);
}

#[test]
fn nonspun_tableau_has_one_slack_per_functional() {
    let tri = examples::figure_eight().unwrap();
    let tab = InitialTableaux::new(&tri, CoordinateSystem::Quad, LpConstraint::NonSpun, true).unwrap();
    assert_eq!(tab.extra_columns(), 2);
    let mut lp = LpData::<i64>::new(&tab);
    lp.init_start();
    assert!(lp.is_feasible());
    // The slacks are pinned at zero from the root.
    assert!(!lp.is_active(tab.columns() - 1));
    assert!(!lp.is_active(tab.columns() - 2));
}

#[test]
fn boundary_ban_in_a_ball_bans_everything() {
    let tri = examples::ball();
    let tab = InitialTableaux::new(&tri, CoordinateSystem::Standard, LpConstraint::None, true).unwrap();
    let bans = BanConstraint::Boundary.build(&tab);
    assert_eq!(bans.count_banned(), 7);
    assert_eq!(bans.count_marked(), 0);

    let mut lp = LpData::<i64>::new(&tab);
    lp.init_start();
    bans.enforce(&mut lp);
    lp.constrain_positive(0);
    assert!(!lp.is_feasible());
}

#[test]
fn torus_ban_ignores_other_boundaries() {
    for tri in [examples::ball(), examples::twisted_kxi().unwrap()] {
        let tab = InitialTableaux::new(&tri, CoordinateSystem::Standard, LpConstraint::None, true).unwrap();
        let bans = BanConstraint::TorusBoundary.build(&tab);
        assert_eq!(bans.count_banned(), 0);
        assert_eq!(bans.count_marked(), 0);
    }
}

#[test]
fn edge_ban_covers_quads_meeting_the_edge() {
    let tri = examples::figure_eight().unwrap();
    let tab = InitialTableaux::new(&tri, CoordinateSystem::Quad, LpConstraint::None, true).unwrap();
    let bans = BanConstraint::Edges(vec![0]).build(&tab);
    // Every quad meets four of the six edges of its tetrahedron, and both
    // edges of the figure eight have degree six.
    assert!(bans.count_banned() > 0);
    assert!(bans.count_banned() <= 6);
    assert!(!bans.is_banned(99));
}

#[test]
fn edge_ban_rejects_unknown_edges() {
    let tri = examples::figure_eight().unwrap();
    assert!(BanConstraint::Edges(vec![0, 1]).validate(&tri).is_ok());
    let err = BanConstraint::Edges(vec![5]).validate(&tri).unwrap_err();
    assert!(matches!(err, Error::InvalidBan { .. }));
}

#[test]
fn ban_support_by_system() {
    assert!(BanConstraint::Boundary.supported(CoordinateSystem::Standard));
    assert!(!BanConstraint::Boundary.supported(CoordinateSystem::Quad));
    assert!(BanConstraint::Edges(vec![]).supported(CoordinateSystem::Quad));
    assert!(!BanConstraint::Edges(vec![]).supported(CoordinateSystem::Angle));
}
