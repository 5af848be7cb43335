//! # weft-math
//!
//! Geometry primitives for the Weft binding pipeline.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec3`, `Mat3`, etc.)
//! - Axis-aligned bounding box with fattening and containment tests
//! - Triangle barycentric solve (plane projection + Cramer's rule)
//! - Tetrahedral barycentric solve (signed-volume ratios)

pub mod aabb;
pub mod barycentric;

// Re-export glam types as the canonical math types for Weft.
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub use aabb::Aabb;
pub use barycentric::{
    tetra_barycentric, tetra_volume, triangle_area, triangle_barycentric, TriangleBary,
};
