//! The simulated (physical) mesh.
//!
//! A coarse triangle surface or tetrahedral volume whose vertices the
//! cloth solver moves every frame. The binder only reads it; the
//! cache-coherency reorder pass is the one mutation it ever sees, and
//! that pass rewrites every map that references it in the same step.

use serde::{Deserialize, Serialize};
use weft_math::Vec3;
use weft_types::{GroupMask, WeftError, WeftResult};

/// The coarse, dynamically simulated mesh driving deformation.
///
/// The index buffer is flat with a fixed stride: 3 for a triangle
/// surface, 4 for a tetrahedral volume. Vertices and elements are each
/// partitioned into a simulated prefix and a static suffix;
/// `num_simulated_vertices` / `num_simulated_indices` mark the
/// boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalMesh {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,

    /// Per-vertex skinning normals. These are the normals the runtime
    /// skinning path interpolates, not render normals.
    pub skinning_normals: Vec<[f32; 3]>,

    /// Flat element index buffer (stride `indices_per_element`).
    pub indices: Vec<u32>,

    /// 3 for triangles, 4 for tetrahedra.
    pub indices_per_element: u32,

    /// Per-vertex master group mask: the graphical slave groups this
    /// vertex may serve.
    pub master_masks: Vec<GroupMask>,

    /// Vertices below this index are actively simulated; the rest are
    /// static.
    pub num_simulated_vertices: u32,

    /// Index-buffer entries below this offset belong to simulated
    /// elements; the rest are static.
    pub num_simulated_indices: u32,

    /// Mean edge length over all elements. Derived, cached.
    pub average_edge_length: f32,

    /// Shortest edge length over all elements. Derived, cached.
    pub shortest_edge_length: f32,
}

impl PhysicalMesh {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of elements (triangles or tetrahedra).
    #[inline]
    pub fn element_count(&self) -> usize {
        self.indices.len() / self.indices_per_element as usize
    }

    /// Returns true for a tetrahedral volume mesh.
    #[inline]
    pub fn is_tetrahedral(&self) -> bool {
        self.indices_per_element == 4
    }

    /// Returns the indices of element `e`.
    #[inline]
    pub fn element(&self, e: usize) -> &[u32] {
        let stride = self.indices_per_element as usize;
        &self.indices[e * stride..(e + 1) * stride]
    }

    /// Returns the position of vertex `i` as a `Vec3`.
    #[inline]
    pub fn position_vec3(&self, i: usize) -> Vec3 {
        Vec3::from_array(self.positions[i])
    }

    /// Returns the skinning normal of vertex `i` as a `Vec3`.
    #[inline]
    pub fn normal_vec3(&self, i: usize) -> Vec3 {
        Vec3::from_array(self.skinning_normals[i])
    }

    /// Returns the master mask of vertex `i`, `ALL` when no masks were
    /// authored.
    #[inline]
    pub fn master_mask(&self, i: usize) -> GroupMask {
        self.master_masks.get(i).copied().unwrap_or(GroupMask::ALL)
    }

    /// Recomputes the cached average and shortest edge lengths from
    /// the element edges.
    pub fn compute_edge_statistics(&mut self) {
        let stride = self.indices_per_element as usize;
        let mut total = 0.0f64;
        let mut count = 0u32;
        let mut shortest = f32::MAX;

        for e in 0..self.element_count() {
            let base = e * stride;
            for j in 0..stride {
                for k in (j + 1)..stride {
                    let a = self.position_vec3(self.indices[base + j] as usize);
                    let b = self.position_vec3(self.indices[base + k] as usize);
                    let len = (a - b).length();
                    total += len as f64;
                    count += 1;
                    shortest = shortest.min(len);
                }
            }
        }

        if count > 0 {
            self.average_edge_length = (total / count as f64) as f32;
            self.shortest_edge_length = shortest;
        } else {
            self.average_edge_length = 0.0;
            self.shortest_edge_length = 0.0;
        }
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - Per-vertex arrays have matching lengths
    /// - The index buffer length is a multiple of the element stride
    /// - All indices are within bounds
    /// - The simulated partition boundaries are within range
    pub fn validate(&self) -> WeftResult<()> {
        let n = self.positions.len();

        if self.skinning_normals.len() != n {
            return Err(WeftError::InvalidMesh(format!(
                "Skinning normal count ({}) != vertex count ({})",
                self.skinning_normals.len(),
                n
            )));
        }
        if !self.master_masks.is_empty() && self.master_masks.len() != n {
            return Err(WeftError::InvalidMesh(format!(
                "Master mask count ({}) != vertex count ({})",
                self.master_masks.len(),
                n
            )));
        }

        if self.indices_per_element != 3 && self.indices_per_element != 4 {
            return Err(WeftError::InvalidMesh(format!(
                "Unsupported element stride {}",
                self.indices_per_element
            )));
        }
        if self.indices.len() % self.indices_per_element as usize != 0 {
            return Err(WeftError::InvalidMesh(format!(
                "Index buffer length ({}) is not a multiple of {}",
                self.indices.len(),
                self.indices_per_element
            )));
        }
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= n) {
            return Err(WeftError::InvalidMesh(format!(
                "Index {} out of bounds (vertex count {})",
                bad, n
            )));
        }

        if self.num_simulated_vertices as usize > n {
            return Err(WeftError::InvalidMesh(format!(
                "Simulated vertex boundary ({}) exceeds vertex count ({})",
                self.num_simulated_vertices, n
            )));
        }
        if self.num_simulated_indices as usize > self.indices.len() {
            return Err(WeftError::InvalidMesh(format!(
                "Simulated index boundary ({}) exceeds index count ({})",
                self.num_simulated_indices,
                self.indices.len()
            )));
        }

        Ok(())
    }
}
