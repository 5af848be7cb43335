//! Physical mesh adjacency queries.
//!
//! Built once from the flat element index buffer. The binder uses the
//! vertex-to-element fan to re-fit a graphical vertex against exactly
//! the elements incident on a hinted physical vertex, instead of
//! scanning the whole index buffer.

use crate::physical::PhysicalMesh;

/// Precomputed vertex-to-element adjacency for a physical mesh.
#[derive(Debug, Clone)]
pub struct Topology {
    /// For each vertex, the list of elements (triangles or tetrahedra)
    /// that contain it.
    pub vertex_elements: Vec<Vec<u32>>,
}

impl Topology {
    /// Build adjacency from a flat index buffer.
    pub fn build(indices: &[u32], indices_per_element: u32, vertex_count: usize) -> Self {
        let stride = indices_per_element as usize;
        let element_count = indices.len() / stride;

        let mut vertex_elements: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
        for e in 0..element_count {
            for &v in &indices[e * stride..(e + 1) * stride] {
                let fan = &mut vertex_elements[v as usize];
                // Guard against repeated indices inside one element
                if fan.last() != Some(&(e as u32)) {
                    fan.push(e as u32);
                }
            }
        }

        Self { vertex_elements }
    }

    /// Build adjacency for a physical mesh.
    pub fn of_mesh(mesh: &PhysicalMesh) -> Self {
        Self::build(&mesh.indices, mesh.indices_per_element, mesh.vertex_count())
    }

    /// Elements incident on vertex `v`.
    #[inline]
    pub fn elements_of(&self, v: usize) -> &[u32] {
        &self.vertex_elements[v]
    }
}
