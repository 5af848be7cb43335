//! Integration tests for weft-mesh.

use weft_mesh::generators::{
    quad_grid_graphical, quad_grid_physical, single_tetra_physical, single_triangle_physical,
};
use weft_mesh::{GraphicalSubmesh, PhysicalMesh, Tangents, Topology};
use weft_types::GroupMask;

// ─── PhysicalMesh Tests ───────────────────────────────────────

#[test]
fn basic_counts() {
    let mesh = quad_grid_physical(2, 2, 1.0, 1.0);
    assert_eq!(mesh.vertex_count(), 9); // 3×3 vertices
    assert_eq!(mesh.element_count(), 8); // 2×2 quads × 2 tris each
    assert!(!mesh.is_tetrahedral());
}

#[test]
fn element_access() {
    let mesh = single_triangle_physical();
    assert_eq!(mesh.element(0), &[0, 1, 2]);
}

#[test]
fn edge_statistics_of_single_triangle() {
    let mesh = single_triangle_physical();
    // edges 1, 1 and √2
    let expected_avg = (1.0 + 1.0 + 2.0f32.sqrt()) / 3.0;
    assert!((mesh.average_edge_length - expected_avg).abs() < 1e-5);
    assert!((mesh.shortest_edge_length - 1.0).abs() < 1e-5);
}

#[test]
fn validate_ok() {
    assert!(quad_grid_physical(3, 2, 2.0, 1.0).validate().is_ok());
    assert!(single_tetra_physical().validate().is_ok());
}

#[test]
fn validate_catches_oob_index() {
    let mut mesh = single_triangle_physical();
    mesh.indices[2] = 99;
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_bad_stride() {
    let mut mesh = single_triangle_physical();
    mesh.indices_per_element = 5;
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_inconsistent_normals() {
    let mut mesh = single_triangle_physical();
    mesh.skinning_normals.pop();
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_bad_partition_boundary() {
    let mut mesh = single_triangle_physical();
    mesh.num_simulated_vertices = 99;
    assert!(mesh.validate().is_err());
}

#[test]
fn tetra_mesh_counts() {
    let mesh = single_tetra_physical();
    assert!(mesh.is_tetrahedral());
    assert_eq!(mesh.element_count(), 1);
    assert_eq!(mesh.element(0).len(), 4);
}

#[test]
fn mesh_serialization() {
    let mesh = single_triangle_physical();
    let json = serde_json::to_string(&mesh).unwrap();
    let recovered: PhysicalMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.positions, mesh.positions);
    assert_eq!(recovered.indices, mesh.indices);
}

// ─── GraphicalSubmesh Tests ───────────────────────────────────

#[test]
fn graphical_counts() {
    let mesh = quad_grid_graphical(2, 2, 1.0, 1.0);
    assert_eq!(mesh.vertex_count(), 9);
    assert_eq!(mesh.triangle_count(), 8);
    assert!(mesh.validate().is_ok());
}

#[test]
fn tangent_access_drops_handedness() {
    let mut mesh = quad_grid_graphical(1, 1, 1.0, 1.0);
    assert!(mesh.tangent_vec3(0).is_none());

    mesh.tangents = Tangents::Vec4(vec![[1.0, 0.0, 0.0, -1.0]; mesh.vertex_count()]);
    let tangent = mesh.tangent_vec3(0).unwrap();
    assert_eq!(tangent.to_array(), [1.0, 0.0, 0.0]);
}

#[test]
fn empty_slave_mask_reads_as_all() {
    let mut mesh = quad_grid_graphical(1, 1, 1.0, 1.0);
    assert_eq!(mesh.slave_mask(0), GroupMask::ALL);

    let mut masks = vec![GroupMask(0b01); mesh.vertex_count()];
    masks[1] = GroupMask::NONE;
    mesh.slave_masks = Some(masks);
    assert_eq!(mesh.slave_mask(0), GroupMask(0b01));
    assert_eq!(mesh.slave_mask(1), GroupMask::ALL);
}

#[test]
fn validate_catches_mismatched_tangents() {
    let mut mesh = quad_grid_graphical(1, 1, 1.0, 1.0);
    mesh.tangents = Tangents::Vec3(vec![[1.0, 0.0, 0.0]]);
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_mismatched_masks() {
    let mut mesh = quad_grid_graphical(1, 1, 1.0, 1.0);
    mesh.slave_masks = Some(vec![GroupMask::ALL]);
    assert!(mesh.validate().is_err());
}

#[test]
fn graphical_serialization() {
    let mesh = quad_grid_graphical(1, 1, 1.0, 1.0);
    let json = serde_json::to_string(&mesh).unwrap();
    let recovered: GraphicalSubmesh = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.positions, mesh.positions);
}

// ─── Topology Tests ───────────────────────────────────────────

#[test]
fn vertex_triangle_fans() {
    // 1×1 grid: vertices 0..4, triangles (0,2,1) and (1,2,3)
    let mesh = quad_grid_physical(1, 1, 1.0, 1.0);
    let topology = Topology::of_mesh(&mesh);

    assert_eq!(topology.elements_of(0), &[0]);
    assert_eq!(topology.elements_of(1), &[0, 1]);
    assert_eq!(topology.elements_of(2), &[0, 1]);
    assert_eq!(topology.elements_of(3), &[1]);
}

#[test]
fn tetra_fan() {
    let mesh = single_tetra_physical();
    let topology = Topology::of_mesh(&mesh);
    for v in 0..4 {
        assert_eq!(topology.elements_of(v), &[0]);
    }
}
