//! Candidate elements and fit results.
//!
//! A candidate is the immutable geometry of one physical element,
//! prepared once before matching. Fit results are separate short-lived
//! values returned by the fitter, so no transient state leaks from one
//! candidate evaluation into the next.

use weft_math::{Aabb, Vec3};
use weft_mesh::PhysicalMesh;
use weft_types::GroupMask;

/// Validity of a barycentric fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitValidity {
    /// The element is degenerate (near-zero area/volume). Never
    /// selectable.
    Degenerate,
    /// The solve succeeded but the point lies well outside the
    /// element. Usable only as a last resort, with an error penalty.
    Poor,
    /// The in-plane coordinates lie within the element (after snapping
    /// into `[0, 1]` within tolerance).
    Valid,
}

/// Barycentric fit of one graphical vertex against one candidate
/// triangle.
///
/// Each triple is `(u, v, height)`: `u` weights the triangle's second
/// vertex, `v` the third, `1 - u - v` the first. `height` is the
/// signed distance from the triangle plane divided by the
/// offset-along-normal scale; it is never clamped, since legitimate
/// offsets can exceed the triangle's size.
#[derive(Debug, Clone, Copy)]
pub struct BaryFit {
    /// Fit of the vertex position.
    pub position: [f32; 3],
    /// Fit of the auxiliary point displaced along the vertex normal.
    pub normal: [f32; 3],
    /// Fit of the auxiliary point displaced along the vertex tangent.
    /// Mirrors `position` when the mesh carries no tangents.
    pub tangent: [f32; 3],
    /// Tri-state fit validity, judged on the position fit.
    pub validity: FitValidity,
}

impl BaryFit {
    /// A degenerate (rejected) fit.
    pub fn degenerate() -> Self {
        Self {
            position: [0.0; 3],
            normal: [0.0; 3],
            tangent: [0.0; 3],
            validity: FitValidity::Degenerate,
        }
    }
}

/// Immutable geometry of one physical triangle, prepared for matching.
#[derive(Debug, Clone)]
pub struct CandidateTriangle {
    /// Corner positions.
    pub vertices: [Vec3; 3],
    /// Corner skinning normals.
    pub normals: [Vec3; 3],
    /// Union of the corner master masks.
    pub master: GroupMask,
    /// Offset of the triangle's first index in the flat index buffer.
    pub face_offset: u32,
    /// Corner bounds fattened by the mesh's average edge length.
    pub bounds: Aabb,
    /// False when the corner normals disagree with the face normal
    /// badly enough that fits against this triangle are meaningless
    /// (a corner normal opposing the face, or every corner normal more
    /// than 60 degrees off it).
    pub usable: bool,
}

impl CandidateTriangle {
    /// Builds the candidate for element `e`, fattening its bounds by
    /// `margin`.
    pub fn build(mesh: &PhysicalMesh, e: usize, margin: f32) -> Self {
        let element = mesh.element(e);
        let mut vertices = [Vec3::ZERO; 3];
        let mut normals = [Vec3::ZERO; 3];
        let mut master = GroupMask::NONE;
        for j in 0..3 {
            let v = element[j] as usize;
            vertices[j] = mesh.position_vec3(v);
            normals[j] = mesh.normal_vec3(v);
            master = master.union(mesh.master_mask(v));
        }

        // bestDot and worstDot track how far the corner normals stray
        // from the face normal
        let face_normal = (vertices[1] - vertices[0])
            .cross(vertices[2] - vertices[0])
            .normalize_or_zero();
        let mut best_dot = -1.0f32;
        let mut worst_dot = 1.0f32;
        for normal in &normals {
            let dot = face_normal.dot(*normal);
            best_dot = best_dot.max(dot);
            worst_dot = worst_dot.min(dot);
        }
        let usable = worst_dot >= 0.0 && best_dot >= 0.5;

        let mut bounds = Aabb::from_point(vertices[0]);
        bounds.include(vertices[1]);
        bounds.include(vertices[2]);
        bounds.fatten(margin);

        Self {
            vertices,
            normals,
            master,
            face_offset: (e * 3) as u32,
            bounds,
            usable,
        }
    }

    /// Unit face normal, zero for a degenerate triangle.
    #[inline]
    pub fn face_normal(&self) -> Vec3 {
        (self.vertices[1] - self.vertices[0])
            .cross(self.vertices[2] - self.vertices[0])
            .normalize_or_zero()
    }

    /// Corner vertex indices, read back from the mesh.
    #[inline]
    pub fn vertex_indices(&self, mesh: &PhysicalMesh) -> [u32; 3] {
        let base = self.face_offset as usize;
        [
            mesh.indices[base],
            mesh.indices[base + 1],
            mesh.indices[base + 2],
        ]
    }
}

/// Immutable geometry of one physical tetrahedron, prepared for
/// matching.
#[derive(Debug, Clone)]
pub struct CandidateTetra {
    /// Corner positions.
    pub vertices: [Vec3; 4],
    /// Corner vertex indices.
    pub indices: [u32; 4],
    /// Corner bounds fattened by the mesh's average edge length.
    pub bounds: Aabb,
}

impl CandidateTetra {
    /// Builds the candidate for element `e`, fattening its bounds by
    /// `margin`.
    pub fn build(mesh: &PhysicalMesh, e: usize, margin: f32) -> Self {
        let element = mesh.element(e);
        let mut vertices = [Vec3::ZERO; 4];
        let mut indices = [0u32; 4];
        for j in 0..4 {
            indices[j] = element[j];
            vertices[j] = mesh.position_vec3(element[j] as usize);
        }

        let mut bounds = Aabb::from_point(vertices[0]);
        for v in &vertices[1..] {
            bounds.include(*v);
        }
        bounds.fatten(margin);

        Self {
            vertices,
            indices,
            bounds,
        }
    }

    /// Diagonal of the unfattened corner bounds, used to scale the
    /// auxiliary normal-fit offset.
    #[inline]
    pub fn tight_diagonal(&self) -> f32 {
        let mut bounds = Aabb::from_point(self.vertices[0]);
        for v in &self.vertices[1..] {
            bounds.include(*v);
        }
        bounds.diagonal()
    }
}
