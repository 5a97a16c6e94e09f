use super::*;
use crate::constraints::LpConstraint;
use crate::coords::CoordinateSystem;
use crate::integer::{ExactInteger, LpInteger};
use crate::matching::matching_equations;
use crate::triangulation::examples;
use crate::triangulation::Triangulation;

fn quad_tableaux(tri: &Triangulation) -> InitialTableaux<'_> {
    InitialTableaux::new(tri, CoordinateSystem::Quad, LpConstraint::None, true).unwrap()
}

fn satisfies_quad_equations(tri: &Triangulation, v: &[ExactInteger]) -> bool {
    let eqns = matching_equations(tri, CoordinateSystem::Quad).unwrap();
    (0..eqns.nrows()).all(|r| {
        let sum: ExactInteger = (0..eqns.ncols())
            .map(|c| v[c].clone() * eqns[(r, c)])
            .sum();
        sum.is_zero()
    })
}

/// Forces each quad column positive in turn and checks every feasible
/// answer against the matching equations.
fn check_single_positive<I: LpInteger>(tri: &Triangulation) -> Vec<bool> {
    let tab = quad_tableaux(tri);
    let n = tri.size();
    let mut feasible = Vec::new();
    for c in 0..3 * n {
        let mut lp = LpData::<I>::new(&tab);
        lp.init_start();
        assert!(lp.is_feasible());
        lp.constrain_positive(c);
        feasible.push(lp.is_feasible());
        if !lp.is_feasible() {
            continue;
        }
        let mut types = vec![0u8; n];
        types[c / 3] = (c % 3 + 1) as u8;
        let v = lp.extract_solution(&types);
        assert_eq!(v.len(), 3 * n);
        assert!(v.iter().all(|x| !x.is_negative()), "{v:?}");
        assert!(!v[tab.column_perm()[c]].is_zero());
        assert!(satisfies_quad_equations(tri, &v), "column {c}: {v:?}");
    }
    feasible
}

#[test]
fn root_is_feasible_with_zero_solution() {
    let tri = examples::figure_eight().unwrap();
    let tab = quad_tableaux(&tri);
    let mut lp = LpData::<i64>::new(&tab);
    lp.init_start();
    assert!(lp.is_feasible());
    assert_eq!(lp.rank(), 1);
    let v = lp.extract_solution(&[0, 0]);
    assert!(v.iter().all(|x| x.is_zero()));
    assert!((0..6).all(|c| lp.is_active(c) && lp.sign(c) == 0));
}

#[test]
fn positive_columns_give_matching_solutions() {
    for tri in [
        examples::figure_eight().unwrap(),
        examples::layered_loop(3, true).unwrap(),
        examples::twisted_kxi().unwrap(),
    ] {
        let native = check_single_positive::<i64>(&tri);
        let exact = check_single_positive::<ExactInteger>(&tri);
        assert_eq!(native, exact);
        assert!(native.iter().any(|&f| f));
    }
}

#[test]
fn gieseking_quad_solutions_mix_two_types() {
    // The only quad equation is 2·q0 + 2·q1 - 4·q2 = 0.
    let tri = examples::gieseking().unwrap();
    assert_eq!(check_single_positive::<i64>(&tri), vec![true; 3]);

    let tab = quad_tableaux(&tri);
    for c in 0..3 {
        let mut lp = LpData::<i64>::new(&tab);
        lp.init_start();
        lp.constrain_positive(c);
        let v = lp.extract_solution(&[(c + 1) as u8]);
        assert!(v.iter().filter(|x| !x.is_zero()).count() >= 2, "column {c}: {v:?}");

        // Under the quadrilateral constraint nothing survives.
        let mut single = LpData::<i64>::new(&tab);
        single.init_start();
        for other in (0..3).filter(|&o| o != c) {
            single.constrain_zero(other);
        }
        single.constrain_positive(c);
        assert!(!single.is_feasible(), "column {c}");
    }
}

#[test]
fn backends_agree_on_solutions() {
    let tri = examples::twisted_kxi().unwrap();
    let tab = quad_tableaux(&tri);
    let types = vec![1u8, 0, 0];
    let mut a = LpData::<i64>::new(&tab);
    let mut b = LpData::<i128>::new(&tab);
    let mut c = LpData::<ExactInteger>::new(&tab);
    a.init_start();
    b.init_start();
    c.init_start();
    a.constrain_positive(0);
    b.constrain_positive(0);
    c.constrain_positive(0);
    assert_eq!(a.is_feasible(), c.is_feasible());
    if a.is_feasible() {
        assert_eq!(a.extract_solution(&types), b.extract_solution(&types));
        assert_eq!(a.extract_solution(&types), c.extract_solution(&types));
    }
}

#[test]
fn zero_then_positive_is_infeasible() {
    let tri = examples::ball();
    let tab = quad_tableaux(&tri);
    let mut lp = LpData::<i64>::new(&tab);
    lp.init_start();
    lp.constrain_zero(1);
    assert!(!lp.is_active(1));
    lp.constrain_positive(1);
    assert!(!lp.is_feasible());

    let mut child = LpData::<i64>::new(&tab);
    child.init_clone(&lp);
    assert!(!child.is_feasible());
}

#[test]
fn lone_quad_in_a_ball() {
    let tri = examples::ball();
    let tab = quad_tableaux(&tri);
    assert_eq!(tab.rank(), 0);
    let mut lp = LpData::<i64>::new(&tab);
    lp.init_start();
    lp.constrain_zero(1);
    lp.constrain_zero(2);
    lp.constrain_positive(0);
    assert!(lp.is_feasible());
    let v = lp.extract_solution(&[1]);
    let at = |orig: usize| v[orig].to_i64();
    let p = tab.column_perm();
    assert_eq!(at(p[0]), Some(1));
    assert_eq!(at(p[1]), Some(0));
    assert_eq!(at(p[2]), Some(0));
}

#[test]
fn octagon_sets_both_quads() {
    let tri = examples::ball();
    let tab = quad_tableaux(&tri);
    let mut lp = LpData::<ExactInteger>::new(&tab);
    lp.init_start();
    lp.constrain_oct(0, 1);
    lp.constrain_zero(2);
    assert!(lp.is_feasible());
    assert_eq!(lp.octagon(), Some((0, 1)));
    let v = lp.extract_solution(&[4]);
    let p = tab.column_perm();
    assert_eq!(v[p[0]], 1i64);
    assert_eq!(v[p[1]], 1i64);
    assert_eq!(v[p[2]], 0i64);
}

#[test]
fn octagon_needs_active_quads() {
    let tri = examples::ball();
    let tab = quad_tableaux(&tri);
    let mut lp = LpData::<i64>::new(&tab);
    lp.init_start();
    lp.constrain_zero(0);
    lp.constrain_oct(0, 1);
    assert!(!lp.is_feasible());
}

#[test]
fn clone_is_independent_of_parent() {
    let tri = examples::figure_eight().unwrap();
    let tab = quad_tableaux(&tri);
    let mut root = LpData::<i64>::new(&tab);
    root.init_start();
    let mut child = LpData::<i64>::new(&tab);
    child.init_clone(&root);
    child.constrain_zero(0);
    assert!(!child.is_active(0));
    assert!(root.is_active(0));
}

#[test]
fn euler_row_adds_a_slack_column() {
    let tri = examples::layered_loop(1, false).unwrap();
    let tab = InitialTableaux::new(&tri, CoordinateSystem::Standard, LpConstraint::EulerPositive, true).unwrap();
    assert_eq!(tab.extra_columns(), 1);
    assert_eq!(tab.columns(), tab.coordinate_columns() + 1);
    let mut lp = LpData::<ExactInteger>::new(&tab);
    lp.init_start();
    assert!(lp.is_feasible());
}

#[test]
fn angle_tableau_has_scaling_column() {
    let tri = examples::figure_eight().unwrap();
    let tab = InitialTableaux::new(&tri, CoordinateSystem::Angle, LpConstraint::None, true).unwrap();
    assert_eq!(tab.coordinate_columns(), 3 * tri.size() + 1);
    let mut lp = LpData::<i64>::new(&tab);
    lp.init_start();
    lp.constrain_positive(3 * tri.size());
    assert!(lp.is_feasible());
    let v = lp.extract_solution(&[]);
    assert!(v.iter().all(|x| !x.is_negative()));
    assert!(!v[3 * tri.size()].is_zero());
}

#[test]
fn matrix_row_combination_normalises() {
    let mut m = LpMatrix::<i64>::zeros(2, 3);
    for (c, v) in [2, 4, 6].into_iter().enumerate() {
        m.set(0, c, v);
    }
    for (c, v) in [1, 3, 5].into_iter().enumerate() {
        m.set(1, c, v);
    }
    // 2·row1 - 1·row0 = [0, 2, 4], normalised to [0, 1, 2].
    let g = m.comb_row_and_norm(&2, 1, &1, 0);
    assert_eq!(g, 2);
    assert_eq!((0..3).map(|c| *m.entry(1, c)).collect::<Vec<_>>(), vec![0, 1, 2]);
}

#[test]
fn worst_case_bound_grows_with_size() {
    let small = examples::layered_loop(1, false).unwrap();
    let large = examples::random_closed(6, 3);
    let a = InitialTableaux::new(&small, CoordinateSystem::Quad, LpConstraint::None, true).unwrap();
    let b = InitialTableaux::new(&large, CoordinateSystem::Quad, LpConstraint::None, true).unwrap();
    assert!(a.worst_case_bound(CoordinateSystem::Quad) <= b.worst_case_bound(CoordinateSystem::Quad));
    assert!(b.worst_case_bound(CoordinateSystem::QuadOct) > b.worst_case_bound(CoordinateSystem::Quad));
}
