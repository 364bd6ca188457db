use glam::Vec3;
use tree_core::geometry::*;
use tree_core::OrnamentKind;

#[test]
fn every_mesh_is_a_valid_triangle_list() {
    for kind in MeshKind::ALL {
        let mesh = kind.build();
        assert!(!mesh.indices.is_empty(), "{kind:?}");
        assert_eq!(mesh.indices.len() % 3, 0, "{kind:?}");
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertices.len()));
        for v in &mesh.vertices {
            assert!((Vec3::from(v.normal).length() - 1.0).abs() < 1e-3, "{kind:?}");
        }
    }
}

#[test]
fn cube_has_flat_faces() {
    let mesh = cube(1.0);
    assert_eq!(mesh.vertices.len(), 24);
    assert_eq!(mesh.indices.len(), 36);
}

#[test]
fn sphere_vertices_lie_on_the_radius() {
    for v in uv_sphere(0.5, 16, 16).vertices {
        assert!((Vec3::from(v.position).length() - 0.5).abs() < 1e-4);
    }
}

#[test]
fn ornaments_map_to_meshes() {
    assert_eq!(MeshKind::for_ornament(OrnamentKind::Gift), MeshKind::Cube);
    assert_eq!(MeshKind::for_ornament(OrnamentKind::Light), MeshKind::Sphere);
    assert_eq!(MeshKind::for_ornament(OrnamentKind::Bow), MeshKind::Torus);
}
