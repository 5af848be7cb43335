//! Fit scoring.
//!
//! Ranks candidate triangles for one graphical vertex. The score
//! combines how far the position fit strays outside the triangle, how
//! far the normal fit strays (weighted by normal disagreement), and
//! how far the vertex floats above the triangle (weighted harder when
//! the in-plane fit is already bad). Lower is better; zero means the
//! vertex sits inside the triangle on its surface.

use weft_math::Vec3;

use crate::candidate::{BaryFit, CandidateTriangle};

/// Quadratic out-of-triangle penalty for one barycentric pair.
///
/// Zero when all three implied coordinates lie in `[0, 1]`, growing
/// with the squared distance outside.
pub fn bary_error(u: f32, v: f32) -> f32 {
    let w = 1.0 - u - v;

    let eu = ((u - 0.5).abs() - 0.5).max(0.0);
    let ev = ((v - 0.5).abs() - 0.5).max(0.0);
    let ew = ((w - 0.5).abs() - 0.5).max(0.0);

    eu * eu + ev * ev + ew * ew
}

/// Scores `fit` against `triangle` for a graphical vertex with
/// `vertex_normal` (unit length).
pub fn fit_error(triangle: &CandidateTriangle, fit: &BaryFit, vertex_normal: Vec3) -> f32 {
    let position_error = bary_error(fit.position[0], fit.position[1]);

    let mut error = position_error;

    // 0 for aligned normals, 1 for opposed
    let normal_weight = 0.5 * (1.0 - triangle.face_normal().dot(vertex_normal));
    error += normal_weight.clamp(0.0, 1.0) * bary_error(fit.normal[0], fit.normal[1]);

    // A poorly in-plane match pays extra for floating off the surface
    let height_weight = 0.1 + 2.5 * position_error;
    error += height_weight * fit.position[2].abs();

    error
}
