use super::*;
use crate::perm::Perm4;

fn degrees(tri: &Triangulation) -> Vec<usize> {
    tri.edges().iter().map(Edge::degree).collect()
}

#[test]
fn join_is_symmetric_and_rejects_reuse() {
    let mut tri = Triangulation::new(2);
    let g = Perm4::from_images([1, 3, 0, 2]).unwrap();
    tri.join(0, 0, 1, g).unwrap();
    assert_eq!(tri.adjacent(1, g.at(0)), Some(Gluing { tet: 0, perm: g.inverse() }));
    assert!(tri.join(1, 1, 0, Perm4::identity()).is_err());
    assert!(tri.join(0, 1, 0, Perm4::identity()).is_err(), "face glued to itself");
    assert!(tri.join(0, 1, 5, Perm4::identity()).is_err());
    // Seen from tet 1 the gluing runs the other way.
    assert_eq!(tri.unjoin(1, 1), Some(Gluing { tet: 0, perm: g.inverse() }));
    assert!(tri.adjacent(0, 0).is_none());
}

#[test]
fn figure_eight_skeleton() {
    let tri = examples::figure_eight().unwrap();
    assert_eq!(tri.vertices().len(), 1);
    assert_eq!(degrees(&tri), vec![6, 6]);
    assert_eq!(tri.triangles().len(), 4);
    assert!(tri.is_valid() && tri.is_orientable() && tri.is_connected());
    assert!(tri.is_ideal());
    assert!(!tri.is_closed());
    let v = &tri.vertices()[0];
    assert_eq!((v.link, v.link_euler), (LinkType::Ideal, 0));
    assert_eq!(v.degree(), 8);
}

#[test]
fn gieseking_is_non_orientable() {
    let tri = examples::gieseking().unwrap();
    assert_eq!(degrees(&tri), vec![6]);
    assert_eq!(tri.triangles().len(), 2);
    assert!(!tri.is_orientable());
    assert!(tri.is_valid() && tri.is_ideal());
}

#[test]
fn layered_loops() {
    let s3 = examples::layered_loop(1, false).unwrap();
    assert_eq!(s3.vertices().len(), 2);
    assert!(s3.vertices().iter().all(|v| v.link == LinkType::Sphere));
    assert_eq!(degrees(&s3), vec![1, 4, 1]);
    assert!(s3.is_closed() && s3.is_orientable());

    let c2 = examples::layered_loop(2, false).unwrap();
    assert_eq!(degrees(&c2), vec![2, 4, 4, 2]);
    assert!(c2.is_closed());

    let tw = examples::layered_loop(3, true).unwrap();
    assert_eq!(tw.vertices().len(), 1);
    assert_eq!(degrees(&tw), vec![6, 4, 4, 4]);
    assert!(tw.is_closed() && tw.is_valid() && tw.is_orientable());
}

#[test]
fn lone_tetrahedron_boundary() {
    let tri = examples::ball();
    assert_eq!(tri.count_boundary_triangles(), 4);
    assert!(tri.vertices().iter().all(|v| v.link == LinkType::Disc));
    let bcs = tri.boundary_components();
    assert_eq!(bcs.len(), 1);
    assert!(bcs[0].is_sphere() && bcs[0].orientable);
    assert_eq!((bcs[0].triangles.len(), bcs[0].edges.len(), bcs[0].vertices.len()), (4, 6, 4));
    for e in tri.edges() {
        assert!(e.boundary && e.boundary_component == Some(0));
    }
}

#[test]
fn twisted_kxi_has_klein_bottle_boundary() {
    let tri = examples::twisted_kxi().unwrap();
    assert!(!tri.is_orientable());
    assert!(tri.is_valid());
    assert_eq!(tri.vertices().len(), 1);
    assert_eq!(tri.vertices()[0].link, LinkType::Disc);
    assert_eq!(degrees(&tri), vec![3, 3, 4, 2, 6]);
    let bcs = tri.boundary_components();
    assert_eq!(bcs.len(), 1);
    assert_eq!(bcs[0].euler, 0);
    assert!(!bcs[0].orientable);
    assert!(!bcs[0].is_torus());
}

#[test]
fn boundary_edges_start_and_end_on_boundary_faces() {
    let tri = examples::twisted_kxi().unwrap();
    for e in tri.edges().iter().filter(|e| e.boundary) {
        let first = e.embeddings[0];
        let last = e.embeddings[e.embeddings.len() - 1];
        assert!(tri.adjacent(first.tet, first.vertices.at(3)).is_none());
        assert!(tri.adjacent(last.tet, last.vertices.at(2)).is_none());
    }
}

#[test]
fn self_reversed_edge_is_invalid() {
    // Fold face 0 onto face 1 so that edge 23 maps to itself reversed.
    let mut tri = Triangulation::new(1);
    tri.join(0, 0, 0, Perm4::from_images([1, 0, 3, 2]).unwrap()).unwrap();
    assert!(!tri.is_valid());
    assert!(tri.edges().iter().any(|e| !e.valid));
}

#[test]
fn embeddings_agree_with_face_maps() {
    let tri = examples::figure_eight().unwrap();
    let skel = tri.skeleton();
    for (id, t) in tri.triangles().iter().enumerate() {
        for emb in &t.embeddings {
            assert_eq!(skel.tet_triangle(emb.tet, emb.vertices.at(3)), id);
        }
    }
    for (id, v) in tri.vertices().iter().enumerate() {
        for emb in &v.embeddings {
            assert_eq!(skel.tet_vertex(emb.tet, emb.vertices.at(0)), id);
        }
    }
}

#[test]
fn text_round_trip() {
    let tri = examples::twisted_kxi().unwrap();
    let text = tri.to_text();
    assert_eq!(Triangulation::from_text(&text).unwrap(), tri);
    let with_reverse = "# figure eight, both directions listed\n2\n0 0 1 1302\n1 1 0 2031\n0 1 1 2031\n0 2 1 0321\n0 3 1 2103\n";
    assert_eq!(Triangulation::from_text(with_reverse).unwrap(), examples::figure_eight().unwrap());
}

#[test]
fn text_errors_carry_line_numbers() {
    let err = Triangulation::from_text("2\n0 0 1 1302\n0 1 1 1\n").unwrap_err();
    assert!(matches!(err, crate::Error::ParseTriangulation { line: 3, .. }));
    assert!(Triangulation::from_text("").is_err());
}

#[test]
fn random_closed_is_orientable_and_valid() {
    for seed in 0..8 {
        let tri = examples::random_closed(4, seed);
        assert!(!tri.has_boundary_triangles());
        assert!(tri.is_orientable());
        assert!(tri.edges().iter().all(|e| e.valid));
    }
}
