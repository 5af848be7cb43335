//! Barycentric fitting of graphical vertices onto candidate triangles.
//!
//! Besides the plain position fit, the fitter solves two auxiliary
//! fits for points displaced along the vertex normal and tangent.
//! Skinning the displaced points through the same triangle lets the
//! runtime reconstruct the vertex frame without an in-plane direction
//! becoming ambiguous on flat geometry.

use weft_math::{triangle_barycentric, Vec3};
use weft_types::constants::BARY_CLAMP_TOLERANCE;

use crate::candidate::{BaryFit, CandidateTriangle, FitValidity};

/// Fits `position` (plus its displaced normal/tangent points) onto
/// `triangle`.
///
/// `offset` is the offset-along-normal scale: the displaced points are
/// `position + normal * offset` and `position + tangent * offset`, and
/// every stored height is the signed plane distance divided by
/// `offset`.
pub fn fit_triangle(
    triangle: &CandidateTriangle,
    position: Vec3,
    normal: Vec3,
    tangent: Option<Vec3>,
    offset: f32,
) -> BaryFit {
    let [a, b, c] = triangle.vertices;

    let Some(pos) = triangle_barycentric(a, b, c, position) else {
        return BaryFit::degenerate();
    };

    let inv_offset = 1.0 / offset;
    let position_bary = [pos.u, pos.v, pos.height * inv_offset];

    // The triangle was just solved once, so the auxiliary solves can
    // only fail with it.
    let normal_bary = match triangle_barycentric(a, b, c, position + normal * offset) {
        Some(fit) => [fit.u, fit.v, fit.height * inv_offset],
        None => return BaryFit::degenerate(),
    };

    let tangent_bary = match tangent {
        Some(t) => match triangle_barycentric(a, b, c, position + t * offset) {
            Some(fit) => [fit.u, fit.v, fit.height * inv_offset],
            None => return BaryFit::degenerate(),
        },
        None => position_bary,
    };

    let mut fit = BaryFit {
        position: position_bary,
        normal: normal_bary,
        tangent: tangent_bary,
        validity: FitValidity::Poor,
    };

    // Validity is judged on the in-plane pair of the position fit; the
    // height stays unclamped.
    let u = pos.u;
    let v = pos.v;
    let w = pos.w();
    let tol = BARY_CLAMP_TOLERANCE;
    let inside = |x: f32| x >= -tol && x <= 1.0 + tol;
    if inside(u) && inside(v) && inside(w) {
        fit.position[0] = u.clamp(0.0, 1.0);
        fit.position[1] = v.clamp(0.0, 1.0);
        fit.validity = FitValidity::Valid;
    }

    fit
}
