//! Procedural mesh generators for tests and benchmarks.
//!
//! These generators produce deterministic, resolution-configurable
//! meshes with correct winding order, +Z normals, and precomputed
//! edge statistics.

use weft_types::GroupMask;

use crate::graphical::{GraphicalSubmesh, Tangents};
use crate::physical::PhysicalMesh;

fn grid_vertices(cols: usize, rows: usize, width: f32, height: f32) -> Vec<[f32; 3]> {
    let verts_x = cols + 1;
    let verts_y = rows + 1;
    let half_w = width / 2.0;
    let half_h = height / 2.0;

    let mut positions = Vec::with_capacity(verts_x * verts_y);
    for j in 0..verts_y {
        for i in 0..verts_x {
            let u = i as f32 / cols as f32;
            let v = j as f32 / rows as f32;
            positions.push([-half_w + u * width, half_h - v * height, 0.0]);
        }
    }
    positions
}

fn grid_indices(cols: usize, rows: usize) -> Vec<u32> {
    let verts_x = cols + 1;
    let mut indices = Vec::with_capacity(cols * rows * 6);
    for j in 0..rows {
        for i in 0..cols {
            let top_left = (j * verts_x + i) as u32;
            let top_right = top_left + 1;
            let bot_left = top_left + verts_x as u32;
            let bot_right = bot_left + 1;

            indices.extend_from_slice(&[top_left, bot_left, top_right]);
            indices.extend_from_slice(&[top_right, bot_left, bot_right]);
        }
    }
    indices
}

/// Generates a flat physical quad grid in the XY plane, all vertices
/// simulated, normals facing +Z.
///
/// The grid spans `[-width/2, width/2]` in X and `[-height/2, height/2]`
/// in Y, centered at the origin at Z=0.
///
/// # Example
/// ```
/// use weft_mesh::generators::quad_grid_physical;
/// let mesh = quad_grid_physical(2, 2, 1.0, 1.0);
/// assert_eq!(mesh.vertex_count(), 9);   // 3×3 vertices
/// assert_eq!(mesh.element_count(), 8);  // 2×2 quads × 2 tris each
/// ```
pub fn quad_grid_physical(cols: usize, rows: usize, width: f32, height: f32) -> PhysicalMesh {
    let positions = grid_vertices(cols, rows, width, height);
    let n = positions.len();
    let indices = grid_indices(cols, rows);
    let num_indices = indices.len() as u32;

    let mut mesh = PhysicalMesh {
        positions,
        skinning_normals: vec![[0.0, 0.0, 1.0]; n],
        indices,
        indices_per_element: 3,
        master_masks: vec![GroupMask::ALL; n],
        num_simulated_vertices: n as u32,
        num_simulated_indices: num_indices,
        average_edge_length: 0.0,
        shortest_edge_length: 0.0,
    };
    mesh.compute_edge_statistics();
    mesh
}

/// Generates a flat graphical quad grid matching [`quad_grid_physical`],
/// without tangents or slave masks.
pub fn quad_grid_graphical(cols: usize, rows: usize, width: f32, height: f32) -> GraphicalSubmesh {
    let positions = grid_vertices(cols, rows, width, height);
    let n = positions.len();

    GraphicalSubmesh {
        positions,
        normals: vec![[0.0, 0.0, 1.0]; n],
        tangents: Tangents::None,
        slave_masks: None,
        indices: grid_indices(cols, rows),
    }
}

/// A single right triangle `[(0,0,0), (1,0,0), (0,1,0)]` with +Z
/// skinning normals, all simulated.
pub fn single_triangle_physical() -> PhysicalMesh {
    let mut mesh = PhysicalMesh {
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        skinning_normals: vec![[0.0, 0.0, 1.0]; 3],
        indices: vec![0, 1, 2],
        indices_per_element: 3,
        master_masks: vec![GroupMask::ALL; 3],
        num_simulated_vertices: 3,
        num_simulated_indices: 3,
        average_edge_length: 0.0,
        shortest_edge_length: 0.0,
    };
    mesh.compute_edge_statistics();
    mesh
}

/// A single unit tetrahedron `[(0,0,0), (1,0,0), (0,1,0), (0,0,1)]`,
/// all simulated.
pub fn single_tetra_physical() -> PhysicalMesh {
    let mut mesh = PhysicalMesh {
        positions: vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
        skinning_normals: vec![
            [-0.577, -0.577, -0.577],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
        indices: vec![0, 1, 2, 3],
        indices_per_element: 4,
        master_masks: vec![GroupMask::ALL; 4],
        num_simulated_vertices: 4,
        num_simulated_indices: 4,
        average_edge_length: 0.0,
        shortest_edge_length: 0.0,
    };
    mesh.compute_edge_statistics();
    mesh
}
