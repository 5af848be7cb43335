//! Integration tests for weft-math.

use weft_math::{tetra_barycentric, tetra_volume, triangle_area, triangle_barycentric, Aabb, Vec3};

const TOL: f32 = 1e-5;

// ─── Triangle Barycentric Tests ───────────────────────────────

fn unit_triangle() -> (Vec3, Vec3, Vec3) {
    (
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    )
}

#[test]
fn bary_interior_point() {
    let (a, b, c) = unit_triangle();
    let fit = triangle_barycentric(a, b, c, Vec3::new(0.25, 0.25, 0.0)).unwrap();
    assert!((fit.u - 0.25).abs() < TOL);
    assert!((fit.v - 0.25).abs() < TOL);
    assert!((fit.w() - 0.5).abs() < TOL);
    assert!(fit.height.abs() < TOL);
}

#[test]
fn bary_corners() {
    let (a, b, c) = unit_triangle();

    let at_a = triangle_barycentric(a, b, c, a).unwrap();
    assert!((at_a.w() - 1.0).abs() < TOL);

    let at_b = triangle_barycentric(a, b, c, b).unwrap();
    assert!((at_b.u - 1.0).abs() < TOL);

    let at_c = triangle_barycentric(a, b, c, c).unwrap();
    assert!((at_c.v - 1.0).abs() < TOL);
}

#[test]
fn bary_height_is_signed_and_unbounded() {
    let (a, b, c) = unit_triangle();

    let above = triangle_barycentric(a, b, c, Vec3::new(0.25, 0.25, 10.0)).unwrap();
    assert!((above.height - 10.0).abs() < 1e-4);
    assert!((above.u - 0.25).abs() < TOL);
    assert!((above.v - 0.25).abs() < TOL);

    let below = triangle_barycentric(a, b, c, Vec3::new(0.25, 0.25, -2.0)).unwrap();
    assert!((below.height + 2.0).abs() < TOL);
}

#[test]
fn bary_outside_point_goes_negative() {
    let (a, b, c) = unit_triangle();
    let fit = triangle_barycentric(a, b, c, Vec3::new(-1.0, 0.5, 0.0)).unwrap();
    assert!(fit.w() > 1.0);
    assert!(fit.u < 0.0);
}

#[test]
fn bary_rejects_degenerate_triangle() {
    let a = Vec3::new(0.0, 0.0, 0.0);
    let b = Vec3::new(1.0, 0.0, 0.0);
    let c = Vec3::new(2.0, 0.0, 0.0); // colinear
    assert!(triangle_barycentric(a, b, c, Vec3::ZERO).is_none());
}

#[test]
fn area_of_unit_right_triangle() {
    let (a, b, c) = unit_triangle();
    assert!((triangle_area(a, b, c) - 0.5).abs() < TOL);
}

// ─── Tetrahedron Tests ────────────────────────────────────────

fn unit_tetra() -> (Vec3, Vec3, Vec3, Vec3) {
    (
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
    )
}

#[test]
fn tetra_volume_of_unit_tetra() {
    let (p0, p1, p2, p3) = unit_tetra();
    assert!((tetra_volume(p0, p1, p2, p3) - 1.0 / 6.0).abs() < TOL);
}

#[test]
fn tetra_bary_center_point() {
    let (p0, p1, p2, p3) = unit_tetra();
    let bary = tetra_barycentric(p0, p1, p2, p3, Vec3::splat(0.25)).unwrap();
    for component in bary {
        assert!((component - 0.25).abs() < TOL);
    }
}

#[test]
fn tetra_bary_sums_to_one() {
    let (p0, p1, p2, p3) = unit_tetra();
    let bary = tetra_barycentric(p0, p1, p2, p3, Vec3::new(0.7, -0.3, 1.2)).unwrap();
    let sum: f32 = bary.iter().sum();
    assert!((sum - 1.0).abs() < 1e-4);
}

#[test]
fn tetra_bary_rejects_flat_tetra() {
    let p0 = Vec3::new(0.0, 0.0, 0.0);
    let p1 = Vec3::new(1.0, 0.0, 0.0);
    let p2 = Vec3::new(0.0, 1.0, 0.0);
    let p3 = Vec3::new(1.0, 1.0, 0.0); // coplanar
    assert!(tetra_barycentric(p0, p1, p2, p3, Vec3::ZERO).is_none());
}

// ─── Aabb Tests ───────────────────────────────────────────────

#[test]
fn aabb_include_and_contains() {
    let mut bounds = Aabb::from_point(Vec3::ZERO);
    bounds.include(Vec3::new(1.0, 2.0, 3.0));

    assert!(bounds.contains(Vec3::new(0.5, 1.0, 1.5)));
    assert!(bounds.contains(Vec3::ZERO));
    assert!(!bounds.contains(Vec3::new(-0.1, 1.0, 1.0)));
}

#[test]
fn aabb_fatten_grows_all_sides() {
    let mut bounds = Aabb::from_point(Vec3::ZERO);
    bounds.include(Vec3::ONE);
    bounds.fatten(0.5);

    assert!(bounds.contains(Vec3::new(-0.4, -0.4, -0.4)));
    assert!(bounds.contains(Vec3::new(1.4, 1.4, 1.4)));
    assert!(!bounds.contains(Vec3::new(1.6, 0.5, 0.5)));
}

#[test]
fn aabb_extents_and_center() {
    let mut bounds = Aabb::from_point(Vec3::ZERO);
    bounds.include(Vec3::new(2.0, 4.0, 6.0));

    assert_eq!(bounds.center(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(bounds.extents(), Vec3::new(1.0, 2.0, 3.0));
}
