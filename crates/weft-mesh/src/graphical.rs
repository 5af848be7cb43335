//! The rendered (graphical) submesh.
//!
//! The fine surface the binder maps onto the physical mesh. One
//! graphical LOD consists of one or more submeshes; vertex indices in
//! the produced maps are absolute across all submeshes of the LOD, in
//! submesh order.

use serde::{Deserialize, Serialize};
use weft_math::Vec3;
use weft_types::{GroupMask, WeftError, WeftResult};

/// Optional per-vertex tangent channel.
///
/// Four-float tangents carry a handedness sign in `w`; the binder only
/// needs the direction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum Tangents {
    /// No tangent channel.
    #[default]
    None,
    /// Three-float tangent vectors.
    Vec3(Vec<[f32; 3]>),
    /// Four-float tangent vectors (xyz direction + w handedness).
    Vec4(Vec<[f32; 4]>),
}

impl Tangents {
    /// Number of tangents in the channel, 0 when absent.
    pub fn len(&self) -> usize {
        match self {
            Tangents::None => 0,
            Tangents::Vec3(v) => v.len(),
            Tangents::Vec4(v) => v.len(),
        }
    }

    /// Returns true when no tangent channel is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One submesh of the rendered surface. Read-only input to the binder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicalSubmesh {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,

    /// Vertex normals.
    pub normals: Vec<[f32; 3]>,

    /// Optional tangent channel.
    pub tangents: Tangents,

    /// Optional per-vertex slave group mask: the physical master
    /// groups allowed to serve this vertex.
    pub slave_masks: Option<Vec<GroupMask>>,

    /// Triangle index buffer (stride 3).
    pub indices: Vec<u32>,
}

impl GraphicalSubmesh {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the three vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [
            self.indices[base],
            self.indices[base + 1],
            self.indices[base + 2],
        ]
    }

    /// Returns the position of vertex `i` as a `Vec3`.
    #[inline]
    pub fn position_vec3(&self, i: usize) -> Vec3 {
        Vec3::from_array(self.positions[i])
    }

    /// Returns the normal of vertex `i` as a `Vec3`.
    #[inline]
    pub fn normal_vec3(&self, i: usize) -> Vec3 {
        Vec3::from_array(self.normals[i])
    }

    /// Returns the tangent direction of vertex `i`, dropping the
    /// handedness component of four-float tangents.
    #[inline]
    pub fn tangent_vec3(&self, i: usize) -> Option<Vec3> {
        match &self.tangents {
            Tangents::None => None,
            Tangents::Vec3(v) => Some(Vec3::from_array(v[i])),
            Tangents::Vec4(v) => {
                let [x, y, z, _] = v[i];
                Some(Vec3::new(x, y, z))
            }
        }
    }

    /// Returns true when a tangent channel is present.
    #[inline]
    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty()
    }

    /// Returns the slave mask of vertex `i`. Unauthored and empty
    /// masks read as `ALL` so the vertex can match somewhere.
    #[inline]
    pub fn slave_mask(&self, i: usize) -> GroupMask {
        match &self.slave_masks {
            Some(masks) => masks[i].or_all(),
            None => GroupMask::ALL,
        }
    }

    /// Validates submesh integrity.
    ///
    /// Checks:
    /// - Position and normal buffers are present and the same length
    /// - Optional channels match the vertex count
    /// - Triangle indices are within bounds
    pub fn validate(&self) -> WeftResult<()> {
        let n = self.positions.len();

        if n == 0 {
            return Err(WeftError::InvalidMesh(
                "Submesh has no position buffer".into(),
            ));
        }
        if self.normals.len() != n {
            return Err(WeftError::InvalidMesh(format!(
                "Normal count ({}) != vertex count ({})",
                self.normals.len(),
                n
            )));
        }
        if !self.tangents.is_empty() && self.tangents.len() != n {
            return Err(WeftError::InvalidMesh(format!(
                "Tangent count ({}) != vertex count ({})",
                self.tangents.len(),
                n
            )));
        }
        if let Some(masks) = &self.slave_masks {
            if masks.len() != n {
                return Err(WeftError::InvalidMesh(format!(
                    "Slave mask count ({}) != vertex count ({})",
                    masks.len(),
                    n
                )));
            }
        }

        if self.indices.len() % 3 != 0 {
            return Err(WeftError::InvalidMesh(format!(
                "Index buffer length ({}) is not a multiple of 3",
                self.indices.len()
            )));
        }
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= n) {
            return Err(WeftError::InvalidMesh(format!(
                "Index {} out of bounds (vertex count {})",
                bad, n
            )));
        }

        Ok(())
    }
}
