//! Barycentric coordinate solves for triangles and tetrahedra.
//!
//! The triangle solve projects the query point onto the triangle's
//! plane and solves the 2×2 system with Cramer's rule; the signed
//! height above the plane is returned separately so callers can keep
//! offsets that legitimately exceed the triangle's size. The tetra
//! solve uses signed-volume ratios.

use glam::Vec3;
use weft_types::constants::{DEGENERATE_AREA_THRESHOLD, DEGENERATE_VOLUME_THRESHOLD};

/// Result of a triangle barycentric solve.
///
/// `u` weights vertex `b`, `v` weights vertex `c`; the weight of `a`
/// is the implied `1 - u - v`. `height` is the signed distance of the
/// query point from the triangle's plane (along the face normal),
/// in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleBary {
    pub u: f32,
    pub v: f32,
    pub height: f32,
}

impl TriangleBary {
    /// The implied weight of the first triangle vertex.
    #[inline]
    pub fn w(&self) -> f32 {
        1.0 - self.u - self.v
    }
}

/// Area of the triangle `(a, b, c)`.
#[inline]
pub fn triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    (b - a).cross(c - a).length() * 0.5
}

/// Solves barycentric coordinates of `p` with respect to the triangle
/// `(a, b, c)`.
///
/// Returns `None` when the triangle is degenerate (near-zero area).
pub fn triangle_barycentric(a: Vec3, b: Vec3, c: Vec3, p: Vec3) -> Option<TriangleBary> {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let normal = ab.cross(ac);
    let area2 = normal.length();
    if area2 < DEGENERATE_AREA_THRESHOLD {
        return None;
    }
    let normal = normal / area2;

    // Signed distance from point to triangle plane
    let height = ap.dot(normal);

    // Project point onto the triangle plane
    let ap_proj = ap - normal * height;

    // Barycentric coordinates using Cramer's rule
    let d00 = ab.dot(ab);
    let d01 = ab.dot(ac);
    let d11 = ac.dot(ac);
    let d20 = ap_proj.dot(ab);
    let d21 = ap_proj.dot(ac);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < DEGENERATE_AREA_THRESHOLD {
        return None;
    }
    let inv_denom = 1.0 / denom;

    let u = (d11 * d20 - d01 * d21) * inv_denom;
    let v = (d00 * d21 - d01 * d20) * inv_denom;

    Some(TriangleBary { u, v, height })
}

/// Signed volume of the tetrahedron `(p0, p1, p2, p3)`.
#[inline]
pub fn tetra_volume(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> f32 {
    (p1 - p0).cross(p2 - p0).dot(p3 - p0) * (1.0 / 6.0)
}

/// Solves barycentric coordinates of `p` with respect to the
/// tetrahedron `(p0, p1, p2, p3)`.
///
/// The four components weight the four corners in order and sum to 1.
/// Returns `None` when the tetrahedron is degenerate (near-zero
/// volume).
pub fn tetra_barycentric(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, p: Vec3) -> Option<[f32; 4]> {
    let vol = tetra_volume(p0, p1, p2, p3);
    if vol.abs() < DEGENERATE_VOLUME_THRESHOLD {
        return None;
    }
    let inv_vol = 1.0 / vol;

    let b0 = tetra_volume(p, p1, p2, p3) * inv_vol;
    let b1 = tetra_volume(p0, p, p2, p3) * inv_vol;
    let b2 = tetra_volume(p0, p1, p, p3) * inv_vol;
    let b3 = 1.0 - b0 - b1 - b2;

    Some([b0, b1, b2, b3])
}
